//! Conversion between live session state and snapshots.
//!
//! Going to a snapshot cannot fail. Coming back checks every invariant and
//! builds a fresh value, so a bad snapshot never yields a half-built session.

use chrono::NaiveDate;

use csvt_core::{Cursor, SessionState};
use csvt_model::{Column, Record, RecordStore, Schema, TagRegistry, Value};

use crate::error::{PersistenceError, Result};
use crate::types::{ColumnSnapshot, RecordSnapshot, SessionSnapshot, ValueSnapshot};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Trait for types that can be converted to a persistence snapshot.
pub trait ToSnapshot {
    /// The snapshot type.
    type Snapshot;

    /// Convert to a snapshot for persistence.
    fn to_snapshot(&self) -> Self::Snapshot;
}

/// Trait for types that can be rebuilt from a persistence snapshot.
///
/// Fails with [`PersistenceError::CorruptSession`] when the snapshot breaks
/// an invariant of the live type.
pub trait FromSnapshot: Sized {
    /// The snapshot type.
    type Snapshot;

    /// Create from a snapshot.
    fn from_snapshot(snapshot: Self::Snapshot) -> Result<Self>;
}

// =============================================================================
// VALUES
// =============================================================================

impl ToSnapshot for Value {
    type Snapshot = ValueSnapshot;

    fn to_snapshot(&self) -> ValueSnapshot {
        match self {
            Value::Empty => ValueSnapshot::Empty,
            Value::Date(date) => ValueSnapshot::Date(date.format(DATE_FORMAT).to_string()),
            Value::Number(number) => ValueSnapshot::Number(*number),
            Value::Text(text) => ValueSnapshot::Text(text.clone()),
            Value::Unparsed(raw) => ValueSnapshot::Unparsed(raw.clone()),
        }
    }
}

impl FromSnapshot for Value {
    type Snapshot = ValueSnapshot;

    fn from_snapshot(snapshot: ValueSnapshot) -> Result<Self> {
        Ok(match snapshot {
            ValueSnapshot::Empty => Value::Empty,
            ValueSnapshot::Date(text) => NaiveDate::parse_from_str(&text, DATE_FORMAT)
                .map(Value::Date)
                .map_err(|_| PersistenceError::corrupt(format!("invalid date '{text}'")))?,
            ValueSnapshot::Number(number) if number.is_finite() => Value::Number(number),
            ValueSnapshot::Number(number) => {
                return Err(PersistenceError::corrupt(format!(
                    "invalid number {number}"
                )));
            }
            ValueSnapshot::Text(text) => Value::Text(text),
            ValueSnapshot::Unparsed(raw) => Value::Unparsed(raw),
        })
    }
}

// =============================================================================
// RECORDS
// =============================================================================

impl ToSnapshot for Record {
    type Snapshot = RecordSnapshot;

    fn to_snapshot(&self) -> RecordSnapshot {
        RecordSnapshot {
            fields: self.fields().to_vec(),
            values: self.values().iter().map(ToSnapshot::to_snapshot).collect(),
            tag: self.tag().map(str::to_string),
            flagged: self.is_flagged(),
        }
    }
}

impl FromSnapshot for Record {
    type Snapshot = RecordSnapshot;

    fn from_snapshot(snapshot: RecordSnapshot) -> Result<Self> {
        let values = snapshot
            .values
            .into_iter()
            .map(Value::from_snapshot)
            .collect::<Result<Vec<_>>>()?;
        Ok(Record::new(snapshot.fields, values)
            .with_tag(snapshot.tag)
            .flagged(snapshot.flagged))
    }
}

// =============================================================================
// SESSION
// =============================================================================

impl ToSnapshot for SessionState {
    type Snapshot = SessionSnapshot;

    fn to_snapshot(&self) -> SessionSnapshot {
        let schema = self.schema();
        SessionSnapshot {
            tag_column: schema.tag_column_name().to_string(),
            columns: schema
                .columns()
                .iter()
                .map(|c| ColumnSnapshot {
                    name: c.name.clone(),
                    kind: c.kind,
                })
                .collect(),
            tags: self.registry().all().to_vec(),
            leading_rows: self.leading_rows().to_vec(),
            records: self.store().iter().map(ToSnapshot::to_snapshot).collect(),
            cursor: self.cursor().index(),
        }
    }
}

impl FromSnapshot for SessionState {
    type Snapshot = SessionSnapshot;

    fn from_snapshot(snapshot: SessionSnapshot) -> Result<Self> {
        let columns = snapshot
            .columns
            .into_iter()
            .map(|c| Column::new(c.name, c.kind))
            .collect();
        let schema = Schema::new(columns, snapshot.tag_column)
            .map_err(|e| PersistenceError::corrupt(e.to_string()))?;

        let tag_count = snapshot.tags.len();
        let registry = TagRegistry::from_tags(snapshot.tags);
        if registry.len() != tag_count {
            return Err(PersistenceError::corrupt(
                "tag list contains blank or duplicate tags",
            ));
        }

        let records = snapshot
            .records
            .into_iter()
            .enumerate()
            .map(|(index, record)| {
                Record::from_snapshot(record).map_err(|e| match e {
                    PersistenceError::CorruptSession { reason, .. } => {
                        PersistenceError::corrupt(format!("record {index}: {reason}"))
                    }
                    other => other,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let cursor = match snapshot.cursor {
            Some(index) => Cursor::At(index),
            None => Cursor::Complete,
        };
        SessionState::from_parts(
            schema,
            registry,
            RecordStore::new(records),
            snapshot.leading_rows,
            cursor,
        )
        .map_err(|e| PersistenceError::corrupt(e.to_string()))
    }
}
