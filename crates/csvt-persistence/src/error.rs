//! Persistence error types.
//!
//! All persistence operations return structured errors that carry the path
//! involved, a user-friendly message and an optional remediation hint.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Persistence operation error.
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// File I/O error.
    #[error("failed to {operation} file: {}", path.display())]
    Io {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Malformed or inconsistent session document.
    #[error("corrupt session{}: {reason}", display_path(path))]
    CorruptSession {
        path: Option<PathBuf>,
        reason: String,
    },

    /// Session written by a newer version.
    #[error("session file version {found} is not supported (maximum: {max_supported})")]
    UnsupportedVersion {
        found: u32,
        max_supported: u32,
        path: Option<PathBuf>,
    },

    /// Serialization error.
    #[error("failed to serialize session data")]
    Serialization {
        #[source]
        source: serde_json::Error,
    },

    /// Atomic write failed (temp file couldn't be renamed).
    #[error("failed to replace {}", target_path.display())]
    AtomicWriteFailed {
        temp_path: PathBuf,
        target_path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

fn display_path(path: &Option<PathBuf>) -> String {
    path.as_ref()
        .map(|p| format!(" {}", p.display()))
        .unwrap_or_default()
}

impl PersistenceError {
    pub(crate) fn corrupt(reason: impl Into<String>) -> Self {
        Self::CorruptSession {
            path: None,
            reason: reason.into(),
        }
    }

    /// Attach the file path to a decoding error.
    #[must_use]
    pub fn with_path(self, file: &Path) -> Self {
        match self {
            Self::CorruptSession { reason, .. } => Self::CorruptSession {
                path: Some(file.to_path_buf()),
                reason,
            },
            Self::UnsupportedVersion {
                found,
                max_supported,
                ..
            } => Self::UnsupportedVersion {
                found,
                max_supported,
                path: Some(file.to_path_buf()),
            },
            other => other,
        }
    }

    /// Get a user-friendly message for this error.
    pub fn user_message(&self) -> String {
        match self {
            Self::Io {
                operation, path, ..
            } => {
                format!("Could not {} the file at {}", operation, path.display())
            }
            Self::CorruptSession { path, reason } => match path {
                Some(path) => format!(
                    "The file at {} is not a usable session: {}",
                    path.display(),
                    reason
                ),
                None => format!("The session data is not usable: {reason}"),
            },
            Self::UnsupportedVersion {
                found,
                max_supported,
                ..
            } => {
                format!(
                    "This session was saved by a newer csv-tagger \
                    (file version {found}, this version supports up to {max_supported})."
                )
            }
            Self::Serialization { .. } => {
                "An error occurred while encoding the session.".to_string()
            }
            Self::AtomicWriteFailed { target_path, .. } => {
                format!(
                    "Could not save the file to {}. The previous file was left in place.",
                    target_path.display()
                )
            }
        }
    }

    /// Get a suggestion for how to resolve this error.
    pub fn suggestion(&self) -> Option<String> {
        match self {
            Self::Io { operation, .. } => {
                if *operation == "read" {
                    Some("Check that the file exists and you have permission to read it.".into())
                } else {
                    Some("Check that you have permission to write to this location.".into())
                }
            }
            Self::CorruptSession { .. } => Some(
                "Start a new session from the source CSV with `csv-tagger new`.".into(),
            ),
            Self::UnsupportedVersion { .. } => Some("Update csv-tagger and try again.".into()),
            Self::Serialization { .. } => None,
            Self::AtomicWriteFailed { .. } => {
                Some("Free up disk space or choose a different location with --save.".into())
            }
        }
    }
}

/// Result type alias for persistence operations.
pub type Result<T> = std::result::Result<T, PersistenceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn corrupt_message_names_the_path() {
        let err = PersistenceError::corrupt("record 2 is tagged 'x'")
            .with_path(Path::new("/tmp/statement.csvt"));
        assert_eq!(
            err.to_string(),
            "corrupt session /tmp/statement.csvt: record 2 is tagged 'x'"
        );
        assert!(err.user_message().contains("/tmp/statement.csvt"));
        assert!(err.suggestion().is_some());
    }

    #[test]
    fn corrupt_without_path() {
        let err = PersistenceError::corrupt("not JSON");
        assert_eq!(err.to_string(), "corrupt session: not JSON");
    }

    #[test]
    fn with_path_keeps_other_errors() {
        let err = PersistenceError::Io {
            operation: "read",
            path: PathBuf::from("a.csvt"),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        }
        .with_path(Path::new("b.csvt"));
        assert_eq!(err.to_string(), "failed to read file: a.csvt");
    }
}
