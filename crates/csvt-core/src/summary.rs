//! Tag counts and per-tag amount totals.

use serde::Serialize;

use crate::session::SessionState;

/// Sum of one number column within a bucket.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnTotal {
    pub column: String,
    pub total: f64,
}

/// Records sharing one tag, or the untagged records when `tag` is `None`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TagSummary {
    pub tag: Option<String>,
    pub count: usize,
    pub totals: Vec<ColumnTotal>,
}

impl TagSummary {
    fn empty(tag: Option<String>, columns: &[(usize, String)]) -> Self {
        Self {
            tag,
            count: 0,
            totals: columns
                .iter()
                .map(|(_, name)| ColumnTotal {
                    column: name.clone(),
                    total: 0.0,
                })
                .collect(),
        }
    }

    pub fn total(&self, column: &str) -> Option<f64> {
        self.totals
            .iter()
            .find(|t| t.column == column)
            .map(|t| t.total)
    }
}

/// Snapshot of how the records are tagged.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    /// One entry per registered tag, in registry order, zero counts included.
    pub tags: Vec<TagSummary>,
    pub unannotated: TagSummary,
    pub total: usize,
}

impl Summary {
    pub fn count(&self, tag: &str) -> Option<usize> {
        self.tags
            .iter()
            .find(|t| t.tag.as_deref() == Some(tag))
            .map(|t| t.count)
    }

    pub fn unannotated_count(&self) -> usize {
        self.unannotated.count
    }

    pub fn annotated_count(&self) -> usize {
        self.total - self.unannotated.count
    }
}

/// Aggregate the session's records by tag.
///
/// Pure function of the record store; blank and unparsed cells add nothing
/// to the totals.
pub fn summarize(session: &SessionState) -> Summary {
    let columns: Vec<(usize, String)> = session
        .schema()
        .number_columns()
        .map(|(idx, name)| (idx, name.to_string()))
        .collect();
    let registry = session.registry();
    let mut tags: Vec<TagSummary> = registry
        .all()
        .iter()
        .map(|tag| TagSummary::empty(Some(tag.clone()), &columns))
        .collect();
    let mut unannotated = TagSummary::empty(None, &columns);

    for record in session.store() {
        let bucket = match record.tag().and_then(|tag| registry.position(tag)) {
            Some(position) => &mut tags[position],
            None => &mut unannotated,
        };
        bucket.count += 1;
        for (slot, (column_idx, _)) in columns.iter().enumerate() {
            if let Some(value) = record.value(*column_idx).and_then(|v| v.as_number()) {
                bucket.totals[slot].total += value;
            }
        }
    }

    Summary {
        tags,
        unannotated,
        total: session.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::navigation::Navigator;
    use csvt_model::{Column, ColumnKind, Record, RecordStore, Schema, TagRegistry, Value};

    fn session() -> SessionState {
        let schema = Schema::new(
            vec![
                Column::new("desc", ColumnKind::Text),
                Column::new("debit", ColumnKind::Number),
            ],
            "tag",
        )
        .unwrap();
        let rows = [
            ("rent", Value::Number(800.0)),
            ("bread", Value::Number(2.5)),
            ("gift", Value::Empty),
        ];
        let records = rows
            .into_iter()
            .map(|(desc, debit)| {
                Record::new(
                    vec![desc.to_string(), debit.to_string()],
                    vec![Value::Text(desc.to_string()), debit],
                )
            })
            .collect();
        SessionState::new(
            schema,
            TagRegistry::from_tags(["solo", "shared"]),
            RecordStore::new(records),
            Vec::new(),
        )
    }

    #[test]
    fn untouched_session_is_all_unannotated() {
        let summary = summarize(&session());
        assert_eq!(summary.count("solo"), Some(0));
        assert_eq!(summary.count("shared"), Some(0));
        assert_eq!(summary.count("other"), None);
        assert_eq!(summary.unannotated_count(), 3);
        assert_eq!(summary.unannotated.total("debit"), Some(802.5));
    }

    #[test]
    fn totals_follow_tags() {
        let mut session = session();
        let mut nav = Navigator::new(&mut session);
        nav.tag_current("shared").unwrap();
        nav.tag_current("solo").unwrap();
        let summary = summarize(&session);
        assert_eq!(summary.tags[1].total("debit"), Some(800.0));
        assert_eq!(summary.tags[0].total("debit"), Some(2.5));
        assert_eq!(summary.unannotated_count(), 1);
        assert_eq!(summary.unannotated.total("debit"), Some(0.0));
        assert_eq!(summary.annotated_count(), 2);
    }

    #[test]
    fn summarize_has_no_side_effects() {
        let session = session();
        let before = session.clone();
        let _ = summarize(&session);
        assert_eq!(session, before);
    }
}
