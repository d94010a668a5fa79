//! Typed cell values and the parsers behind them.

use std::fmt;

use chrono::NaiveDate;

/// Date layouts accepted in date columns, tried in order.
///
/// Day-first comes first because it is what French bank exports use.
pub const DATE_FORMATS: [&str; 3] = ["%d/%m/%Y", "%Y-%m-%d", "%Y/%m/%d"];

/// A single typed cell.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Blank cell.
    Empty,
    Date(NaiveDate),
    Number(f64),
    Text(String),
    /// Cell that could not be read as its column's type; the raw text is kept.
    Unparsed(String),
}

impl Value {
    pub fn is_empty(&self) -> bool {
        matches!(self, Value::Empty)
    }

    pub fn is_unparsed(&self) -> bool {
        matches!(self, Value::Unparsed(_))
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            Value::Date(date) => Some(*date),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Empty => Ok(()),
            Value::Date(date) => write!(f, "{}", date.format("%Y-%m-%d")),
            Value::Number(value) => write!(f, "{value:.2}"),
            Value::Text(text) | Value::Unparsed(text) => f.write_str(text),
        }
    }
}

/// Parse a date using the first matching layout in [`DATE_FORMATS`].
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(trimmed, format).ok())
}

/// Parse a decimal amount.
///
/// Whitespace (including non-breaking spaces used as thousands separators) is
/// dropped, and a single comma is read as the decimal point when the text has
/// no dot. Non-finite results are rejected.
pub fn parse_number(raw: &str) -> Option<f64> {
    let compact: String = raw.chars().filter(|c| !c.is_whitespace()).collect();
    if compact.is_empty() {
        return None;
    }
    let normalized = if !compact.contains('.') && compact.matches(',').count() == 1 {
        compact.replace(',', ".")
    } else {
        compact
    };
    let value: f64 = normalized.parse().ok()?;
    value.is_finite().then_some(value)
}
