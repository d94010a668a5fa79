//! Session and navigation errors.

use thiserror::Error;

use csvt_model::{IndexError, StoreError, UnknownTagError};

/// Errors returned by [`Navigator`](crate::Navigator) operations.
///
/// All of them are recoverable: the session is unchanged and the caller is
/// expected to re-prompt.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NavigationError {
    #[error(transparent)]
    Index(#[from] IndexError),

    #[error(transparent)]
    UnknownTag(#[from] UnknownTagError),

    /// The session is complete and no record is selected.
    #[error("no record is selected; the session is complete")]
    NoCurrentRecord,
}

impl From<StoreError> for NavigationError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Index(err) => Self::Index(err),
            StoreError::UnknownTag(err) => Self::UnknownTag(err),
        }
    }
}

/// Reasons a set of parts cannot form a [`SessionState`](crate::SessionState).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("the tag registry is empty")]
    EmptyRegistry,

    #[error("record {index} has {found} fields, schema has {expected} columns")]
    RecordWidth {
        index: usize,
        expected: usize,
        found: usize,
    },

    #[error("record {index} column '{column}' holds a value that is not a {kind}")]
    ValueKind {
        index: usize,
        column: String,
        kind: String,
    },

    #[error("record {index} is tagged '{tag}', which is not registered")]
    UnregisteredTag { index: usize, tag: String },

    #[error("cursor {cursor} is outside the {len} records")]
    CursorOutOfRange { cursor: usize, len: usize },

    #[error("session is marked complete but {remaining} records are untagged")]
    IncompleteCompletion { remaining: usize },
}
