//! Delimited-text import and export for csv-tagger.
//!
//! This crate is the I/O shell around the session engine: it reads a source
//! file into raw rows, converts them into typed records under a schema, and
//! writes the tagged records back out.
//!
//! # Features
//!
//! - **Configurable dialect**: delimiter, quote character and skipped rows
//! - **Per-row issues**: cells that do not match their column type are
//!   reported and flagged, never coerced
//! - **Faithful export**: leading rows and untouched fields are written back
//!   as they were read
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use csvt_ingest::{CsvOptions, ImportSettings, import_session, read_raw_table};
//!
//! let options = CsvOptions::default().with_delimiter(b';');
//! let table = read_raw_table(Path::new("account.csv"), &options)?;
//! let imported = import_session(table, &settings)?;
//! for issue in &imported.issues {
//!     eprintln!("{issue}");
//! }
//! ```

mod error;
mod export;
mod import;
mod options;
mod reader;

// === Error Types ===
pub use error::{IngestError, Result};

// === Reading ===
pub use options::{CsvOptions, parse_dialect_char};
pub use reader::{RawTable, parse_raw_table, read_raw_table};

// === Import ===
pub use import::{ImportSettings, Imported, build_schema, import_session};

// === Export ===
pub use export::{tagged_csv_bytes, write_tagged_csv};
