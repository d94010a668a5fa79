//! Error types for the record model.

use thiserror::Error;

use crate::schema::ColumnKind;

/// Schema declaration and cell conversion errors.
///
/// Declaration errors (`EmptyColumnName`, `DuplicateColumn`, `TagColumnType`,
/// `UnknownColumn`) reject the schema as a whole. Row errors (`FieldCount`,
/// `InvalidCell`) are collected per row during import and never abort it.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SchemaError {
    #[error("column name at position {position} is empty")]
    EmptyColumnName { position: usize },

    #[error("duplicate column name '{name}'")]
    DuplicateColumn { name: String },

    #[error("tag column '{name}' must be a text column, found {kind}")]
    TagColumnType { name: String, kind: ColumnKind },

    #[error("column '{name}' is not present in the source header")]
    UnknownColumn { name: String },

    #[error("row {row}: expected {expected} fields, found {found}")]
    FieldCount {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("row {row}: cannot read '{raw}' in column '{column}' as a {kind}")]
    InvalidCell {
        row: usize,
        column: String,
        kind: ColumnKind,
        raw: String,
    },
}

impl SchemaError {
    /// Source row the error refers to, for per-row errors.
    pub fn row(&self) -> Option<usize> {
        match self {
            Self::FieldCount { row, .. } | Self::InvalidCell { row, .. } => Some(*row),
            _ => None,
        }
    }
}

/// A record index outside `[0, len)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("record index {index} is out of bounds (session has {len} records)")]
pub struct IndexError {
    pub index: usize,
    pub len: usize,
}

/// An attempt to assign a tag that is not in the registry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown tag '{tag}'")]
pub struct UnknownTagError {
    pub tag: String,
}

/// Errors raised by [`RecordStore`](crate::RecordStore) mutations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error(transparent)]
    Index(#[from] IndexError),

    #[error(transparent)]
    UnknownTag(#[from] UnknownTagError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SchemaError::InvalidCell {
            row: 4,
            column: "Debit".to_string(),
            kind: ColumnKind::Number,
            raw: "n/a".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "row 4: cannot read 'n/a' in column 'Debit' as a number"
        );
        assert_eq!(err.row(), Some(4));

        let err = IndexError { index: 7, len: 3 };
        assert_eq!(
            err.to_string(),
            "record index 7 is out of bounds (session has 3 records)"
        );
    }

    #[test]
    fn test_store_error_is_transparent() {
        let err: StoreError = UnknownTagError {
            tag: "joint".to_string(),
        }
        .into();
        assert_eq!(err.to_string(), "unknown tag 'joint'");
    }
}
