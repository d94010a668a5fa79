//! Tests for csvt-model types working together.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use csvt_model::{
    ColumnKind, Record, RecordStore, Schema, StoreError, TagRegistry, UnknownTagError, Value,
};

fn bank_schema() -> Schema {
    let roles = BTreeMap::from([
        ("date".to_string(), ColumnKind::Date),
        ("amount".to_string(), ColumnKind::Number),
    ]);
    let header = vec!["date".to_string(), "desc".to_string(), "amount".to_string()];
    Schema::from_header(&header, &roles, "tag").expect("valid schema")
}

fn typed_record(schema: &Schema, fields: &[&str]) -> Record {
    let values = schema
        .columns()
        .iter()
        .zip(fields)
        .map(|(column, raw)| {
            column
                .kind
                .parse(raw)
                .unwrap_or_else(|| Value::Unparsed(raw.to_string()))
        })
        .collect();
    Record::new(fields.iter().map(|f| f.to_string()).collect(), values)
}

#[test]
fn typed_record_follows_schema() {
    let schema = bank_schema();
    let record = typed_record(&schema, &["03/02/2024", "Bakery", "-4,20"]);
    assert_eq!(
        record.value(0),
        Some(&Value::Date(NaiveDate::from_ymd_opt(2024, 2, 3).unwrap()))
    );
    assert_eq!(record.value(1), Some(&Value::Text("Bakery".to_string())));
    assert_eq!(record.value(2), Some(&Value::Number(-4.2)));
    assert!(!record.is_flagged());
}

#[test]
fn bad_cells_flag_instead_of_coercing() {
    let schema = bank_schema();
    let record = typed_record(&schema, &["someday", "Bakery", "lots"]);
    assert!(record.is_flagged());
    assert_eq!(record.value(2), Some(&Value::Unparsed("lots".to_string())));
    assert_eq!(record.field(2), Some("lots"));
}

#[test]
fn registry_growth_unlocks_new_tags() {
    let schema = bank_schema();
    let mut registry = TagRegistry::from_tags(["solo", "shared"]);
    let mut store = RecordStore::new(vec![typed_record(&schema, &["", "Rent", "800"])]);

    let err = store.set_tag(0, "household", &registry).unwrap_err();
    assert_eq!(
        err,
        StoreError::UnknownTag(UnknownTagError {
            tag: "household".to_string()
        })
    );
    assert!(!store.is_annotated(0).unwrap());

    registry.add("household");
    store.set_tag(0, "household", &registry).unwrap();
    assert_eq!(store.get(0).unwrap().tag(), Some("household"));
}

#[test]
fn column_kind_serializes_lowercase() {
    let json = serde_json::to_string(&ColumnKind::Number).expect("serialize kind");
    assert_eq!(json, "\"number\"");
    let kind: ColumnKind = serde_json::from_str("\"date\"").expect("deserialize kind");
    assert_eq!(kind, ColumnKind::Date);
}
