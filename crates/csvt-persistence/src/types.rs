//! Serializable snapshot types.
//!
//! These mirror the live session types but only hold plain data; every
//! invariant is re-checked when a snapshot is turned back into a session.

use std::path::Path;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use csvt_ingest::CsvOptions;
use csvt_model::ColumnKind;

/// Value of the `format` field of every session file.
pub const FORMAT_NAME: &str = "csv-tagger-session";

/// Current schema version.
///
/// Increment this when making breaking changes to the session format.
/// The loader rejects files with version > CURRENT_SCHEMA_VERSION.
pub const CURRENT_SCHEMA_VERSION: u32 = 1;

/// Root document written to `.csvt` files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SessionFile {
    pub format: String,
    pub version: u32,
    /// RFC 3339.
    pub created_at: String,
    /// RFC 3339.
    pub saved_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<SourceSnapshot>,
    pub session: SessionSnapshot,
}

/// The CSV a session was imported from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SourceSnapshot {
    pub path: String,
    /// SHA-256 of the file content at import time.
    pub sha256: String,
    /// Dialect used to read the file; the export is written with it too.
    pub options: CsvOptions,
}

impl SourceSnapshot {
    pub fn new(path: &Path, sha256: impl Into<String>, options: CsvOptions) -> Self {
        Self {
            path: path.display().to_string(),
            sha256: sha256.into(),
            options,
        }
    }
}

/// Schema, registry, records and cursor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SessionSnapshot {
    pub tag_column: String,
    pub columns: Vec<ColumnSnapshot>,
    /// Registry order is display order.
    pub tags: Vec<String>,
    #[serde(default)]
    pub leading_rows: Vec<Vec<String>>,
    pub records: Vec<RecordSnapshot>,
    /// `None` once every record is tagged.
    pub cursor: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ColumnSnapshot {
    pub name: String,
    pub kind: ColumnKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RecordSnapshot {
    pub fields: Vec<String>,
    pub values: Vec<ValueSnapshot>,
    #[serde(default)]
    pub tag: Option<String>,
    #[serde(default)]
    pub flagged: bool,
}

/// A typed cell. Dates are stored as `YYYY-MM-DD`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum ValueSnapshot {
    Empty,
    Date(String),
    Number(f64),
    Text(String),
    Unparsed(String),
}
