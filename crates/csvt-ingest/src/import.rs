//! Typed conversion of raw rows into a new session.

use std::collections::BTreeMap;

use tracing::{debug, info, warn};

use csvt_core::SessionState;
use csvt_model::{
    ColumnKind, Record, RecordStore, Schema, SchemaError, TagRegistry, Value,
    generated_column_name,
};

use crate::error::{IngestError, Result};
use crate::reader::RawTable;

/// User-declared column roles and tags for an import.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportSettings {
    /// Column name to type; unlisted columns are text.
    pub roles: BTreeMap<String, ColumnKind>,
    pub tag_column: String,
    pub tags: Vec<String>,
}

impl Default for ImportSettings {
    fn default() -> Self {
        Self {
            roles: BTreeMap::new(),
            tag_column: "tag".to_string(),
            tags: Vec::new(),
        }
    }
}

/// A freshly imported session and what went wrong along the way.
#[derive(Debug)]
pub struct Imported {
    pub session: SessionState,
    /// Per-row conversion errors; the rows are kept and flagged.
    pub issues: Vec<SchemaError>,
    /// Tags found in the source tag column that were not configured.
    pub new_tags: Vec<String>,
}

impl Imported {
    pub fn flagged_rows(&self) -> usize {
        self.session
            .store()
            .iter()
            .filter(|r| r.is_flagged())
            .count()
    }
}

/// Build the schema for a raw table.
///
/// Header names are used when present, `column_N` otherwise.
pub fn build_schema(table: &RawTable, settings: &ImportSettings) -> Result<Schema> {
    let header = match &table.header {
        Some(header) => header.clone(),
        None => (0..table.width()).map(generated_column_name).collect(),
    };
    Ok(Schema::from_header(
        &header,
        &settings.roles,
        settings.tag_column.clone(),
    )?)
}

/// Convert a raw table into a new session.
///
/// Fails only when the schema itself is unusable or no tag is configured;
/// bad cells are reported in [`Imported::issues`].
pub fn import_session(table: RawTable, settings: &ImportSettings) -> Result<Imported> {
    let schema = build_schema(&table, settings)?;
    let mut registry = TagRegistry::from_tags(settings.tags.iter().map(String::as_str));

    let first_line = table.first_data_line();
    let mut issues = Vec::new();
    let mut new_tags = Vec::new();
    let mut records = Vec::with_capacity(table.rows.len());
    for (offset, fields) in table.rows.into_iter().enumerate() {
        let line = first_line + offset;
        let (record, row_issues) = convert_row(&schema, fields, line);
        let record = match seed_tag(&schema, &record) {
            Some(tag) => {
                if registry.add(tag.as_str()) {
                    warn!(line, "source tag column introduced a new tag");
                    new_tags.push(tag.clone());
                }
                record.with_tag(Some(tag))
            }
            None => record,
        };
        if !row_issues.is_empty() {
            debug!(line, issues = row_issues.len(), "row has conversion issues");
        }
        issues.extend(row_issues);
        records.push(record);
    }

    if registry.is_empty() {
        return Err(IngestError::NoTags);
    }

    info!(
        records = records.len(),
        columns = schema.len(),
        issues = issues.len(),
        "imported records"
    );
    let session = SessionState::new(
        schema,
        registry,
        RecordStore::new(records),
        table.leading,
    );
    Ok(Imported {
        session,
        issues,
        new_tags,
    })
}

/// Convert one row, padding or trimming it to the schema width.
///
/// Extra fields that are all blank (a trailing delimiter) are dropped
/// silently; anything else that does not fit is reported and flags the row.
fn convert_row(schema: &Schema, mut fields: Vec<String>, line: usize) -> (Record, Vec<SchemaError>) {
    let mut issues = Vec::new();
    let expected = schema.len();
    let found = fields.len();
    if found > expected && fields[expected..].iter().all(|f| f.trim().is_empty()) {
        fields.truncate(expected);
    }
    if fields.len() != expected {
        issues.push(SchemaError::FieldCount {
            row: line,
            expected,
            found,
        });
        fields.resize(expected, String::new());
    }

    let values = schema
        .columns()
        .iter()
        .zip(&fields)
        .map(|(column, raw)| match column.kind.parse(raw) {
            Some(value) => value,
            None => {
                issues.push(SchemaError::InvalidCell {
                    row: line,
                    column: column.name.clone(),
                    kind: column.kind,
                    raw: raw.clone(),
                });
                Value::Unparsed(raw.clone())
            }
        })
        .collect();
    let flagged = !issues.is_empty();
    (Record::new(fields, values).flagged(flagged), issues)
}

fn seed_tag(schema: &Schema, record: &Record) -> Option<String> {
    let index = schema.tag_index()?;
    let raw = record.field(index)?.trim();
    (!raw.is_empty()).then(|| raw.to_string())
}
