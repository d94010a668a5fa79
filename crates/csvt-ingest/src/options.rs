//! Delimited-text dialect and row layout.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::{IngestError, Result};

/// How the source file is laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct CsvOptions {
    pub delimiter: u8,
    pub quote: u8,
    /// Rows before the first record. The header, when present, is the last
    /// of these.
    pub skip_rows: usize,
    pub has_header: bool,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            quote: b'"',
            skip_rows: 1,
            has_header: true,
        }
    }
}

impl CsvOptions {
    /// Rows that precede the data; at least one when there is a header.
    pub fn leading_rows(&self) -> usize {
        self.skip_rows.max(usize::from(self.has_header))
    }

    #[must_use]
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    #[must_use]
    pub fn with_quote(mut self, quote: u8) -> Self {
        self.quote = quote;
        self
    }

    #[must_use]
    pub fn with_skip_rows(mut self, skip_rows: usize) -> Self {
        self.skip_rows = skip_rows;
        self
    }

    #[must_use]
    pub fn with_header(mut self, has_header: bool) -> Self {
        self.has_header = has_header;
        self
    }
}

/// Parse a delimiter or quote given as text. `\t` and `tab` mean a tab.
pub fn parse_dialect_char(value: &str) -> Result<u8> {
    match value {
        "\\t" | "tab" => return Ok(b'\t'),
        _ => {}
    }
    let mut bytes = value.bytes();
    match (bytes.next(), bytes.next()) {
        (Some(byte), None) if byte.is_ascii() => Ok(byte),
        _ => Err(IngestError::InvalidDialect {
            value: value.to_string(),
        }),
    }
}
