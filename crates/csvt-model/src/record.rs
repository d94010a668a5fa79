//! Records and the fixed-length store that owns them.

use crate::error::{IndexError, StoreError, UnknownTagError};
use crate::tags::TagRegistry;
use crate::value::Value;

/// One source row: raw fields, their typed values and an optional tag.
///
/// `fields` and `values` are parallel and follow the schema's column order.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    fields: Vec<String>,
    values: Vec<Value>,
    tag: Option<String>,
    flagged: bool,
}

impl Record {
    pub fn new(fields: Vec<String>, values: Vec<Value>) -> Self {
        let flagged = values.iter().any(Value::is_unparsed);
        Self {
            fields,
            values,
            tag: None,
            flagged,
        }
    }

    #[must_use]
    pub fn with_tag(mut self, tag: Option<String>) -> Self {
        self.tag = tag;
        self
    }

    /// Mark the record as having had conversion problems at import.
    #[must_use]
    pub fn flagged(mut self, flagged: bool) -> Self {
        self.flagged = self.flagged || flagged;
        self
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn field(&self, index: usize) -> Option<&str> {
        self.fields.get(index).map(String::as_str)
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn value(&self, index: usize) -> Option<&Value> {
        self.values.get(index)
    }

    pub fn tag(&self) -> Option<&str> {
        self.tag.as_deref()
    }

    pub fn is_annotated(&self) -> bool {
        self.tag.is_some()
    }

    pub fn is_flagged(&self) -> bool {
        self.flagged
    }
}

/// Ordered, index-addressable records. The length is fixed once built.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordStore {
    records: Vec<Record>,
}

impl RecordStore {
    pub fn new(records: Vec<Record>) -> Self {
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, index: usize) -> Result<&Record, IndexError> {
        self.records.get(index).ok_or(IndexError {
            index,
            len: self.records.len(),
        })
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }

    pub fn is_annotated(&self, index: usize) -> Result<bool, IndexError> {
        self.get(index).map(Record::is_annotated)
    }

    /// Replace the tag of one record.
    ///
    /// Both the index and the tag are checked before anything changes, so a
    /// failed call leaves the store untouched.
    pub fn set_tag(
        &mut self,
        index: usize,
        tag: &str,
        registry: &TagRegistry,
    ) -> Result<(), StoreError> {
        let len = self.records.len();
        let record = self
            .records
            .get_mut(index)
            .ok_or(IndexError { index, len })?;
        if !registry.contains(tag) {
            return Err(UnknownTagError {
                tag: tag.to_string(),
            }
            .into());
        }
        record.tag = Some(tag.to_string());
        Ok(())
    }

    pub fn annotated_count(&self) -> usize {
        self.records.iter().filter(|r| r.is_annotated()).count()
    }

    pub fn unannotated_count(&self) -> usize {
        self.len() - self.annotated_count()
    }
}

impl<'a> IntoIterator for &'a RecordStore {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
