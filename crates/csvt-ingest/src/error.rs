//! Error types for loading and writing delimited text.

use std::path::PathBuf;
use thiserror::Error;

use csvt_model::SchemaError;

/// Errors that abort an import or export.
///
/// Per-row conversion problems are not errors here; they are collected in
/// [`Imported::issues`](crate::Imported::issues).
#[derive(Debug, Error)]
pub enum IngestError {
    // === File System Errors ===
    /// CSV file not found.
    #[error("CSV file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Failed to read file.
    #[error("failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // === CSV Errors ===
    /// Malformed delimited text (bad quoting, invalid UTF-8).
    #[error("failed to parse CSV {path}: {message}")]
    CsvParse { path: PathBuf, message: String },

    /// CSV file has no rows at all.
    #[error("CSV file is empty: {path}")]
    EmptyCsv { path: PathBuf },

    /// Delimiter or quote is not a single ASCII character.
    #[error("'{value}' is not a single ASCII character")]
    InvalidDialect { value: String },

    /// Failed to write the tagged output.
    #[error("failed to write tagged CSV: {source}")]
    CsvWrite {
        #[source]
        source: csv::Error,
    },

    // === Schema Errors ===
    /// The declared columns do not fit the source.
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// No tags were configured for the session.
    #[error("at least one tag is required")]
    NoTags,
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;
