//! The unit of work that is edited, persisted and summarized.

use csvt_model::{IndexError, Record, RecordStore, Schema, TagRegistry, Value};

use crate::error::SessionError;

/// Position of the record being presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cursor {
    At(usize),
    /// Every record is tagged and nothing is selected.
    Complete,
}

impl Cursor {
    pub fn index(&self) -> Option<usize> {
        match self {
            Cursor::At(index) => Some(*index),
            Cursor::Complete => None,
        }
    }
}

/// Schema, tag registry, records and cursor for one annotation effort.
///
/// The session exclusively owns its parts. Rows that preceded the data in
/// the source file (headers, bank preambles) are kept in `leading_rows` so the
/// export can reproduce them.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionState {
    schema: Schema,
    registry: TagRegistry,
    store: RecordStore,
    leading_rows: Vec<Vec<String>>,
    pub(crate) cursor: Cursor,
}

impl SessionState {
    /// Start a session over freshly imported records.
    ///
    /// The cursor starts on the first untagged record, or `Complete` when
    /// there is none.
    pub fn new(
        schema: Schema,
        registry: TagRegistry,
        store: RecordStore,
        leading_rows: Vec<Vec<String>>,
    ) -> Self {
        let cursor = match store.iter().position(|r| !r.is_annotated()) {
            Some(index) => Cursor::At(index),
            None => Cursor::Complete,
        };
        Self {
            schema,
            registry,
            store,
            leading_rows,
            cursor,
        }
    }

    /// Rebuild a session from stored parts, checking every invariant.
    pub fn from_parts(
        schema: Schema,
        registry: TagRegistry,
        store: RecordStore,
        leading_rows: Vec<Vec<String>>,
        cursor: Cursor,
    ) -> Result<Self, SessionError> {
        if registry.is_empty() {
            return Err(SessionError::EmptyRegistry);
        }
        for (index, record) in store.iter().enumerate() {
            check_record(&schema, &registry, index, record)?;
        }
        match cursor {
            Cursor::At(index) if index >= store.len() => {
                return Err(SessionError::CursorOutOfRange {
                    cursor: index,
                    len: store.len(),
                });
            }
            Cursor::Complete if store.unannotated_count() > 0 => {
                return Err(SessionError::IncompleteCompletion {
                    remaining: store.unannotated_count(),
                });
            }
            _ => {}
        }
        Ok(Self {
            schema,
            registry,
            store,
            leading_rows,
            cursor,
        })
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn registry(&self) -> &TagRegistry {
        &self.registry
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    pub fn leading_rows(&self) -> &[Vec<String>] {
        &self.leading_rows
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Whether every record carries a tag.
    pub fn is_complete(&self) -> bool {
        self.store.unannotated_count() == 0
    }

    /// The record under the cursor.
    pub fn current(&self) -> Option<(usize, &Record)> {
        let index = self.cursor.index()?;
        self.store.get(index).ok().map(|record| (index, record))
    }

    /// Typed value of `column` in record `index`.
    ///
    /// Returns `Ok(None)` for an unknown column.
    pub fn value(&self, index: usize, column: &str) -> Result<Option<&Value>, IndexError> {
        let record = self.store.get(index)?;
        Ok(self
            .schema
            .index_of(column)
            .and_then(|col| record.value(col)))
    }

    pub(crate) fn parts_mut(&mut self) -> (&mut RecordStore, &mut TagRegistry) {
        (&mut self.store, &mut self.registry)
    }
}

fn check_record(
    schema: &Schema,
    registry: &TagRegistry,
    index: usize,
    record: &Record,
) -> Result<(), SessionError> {
    for found in [record.fields().len(), record.values().len()] {
        if found != schema.len() {
            return Err(SessionError::RecordWidth {
                index,
                expected: schema.len(),
                found,
            });
        }
    }
    for (column, value) in schema.columns().iter().zip(record.values()) {
        if !column.kind.accepts(value) {
            return Err(SessionError::ValueKind {
                index,
                column: column.name.clone(),
                kind: column.kind.to_string(),
            });
        }
    }
    if let Some(tag) = record.tag() {
        if !registry.contains(tag) {
            return Err(SessionError::UnregisteredTag {
                index,
                tag: tag.to_string(),
            });
        }
    }
    Ok(())
}
