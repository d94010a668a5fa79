//! Column declarations and the tag column.

use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::SchemaError;
use crate::value::{Value, parse_date, parse_number};

/// Semantic type of a source column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKind {
    Date,
    Number,
    #[default]
    Text,
}

impl ColumnKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnKind::Date => "date",
            ColumnKind::Number => "number",
            ColumnKind::Text => "text",
        }
    }

    /// Convert raw cell text into a typed value.
    ///
    /// Blank cells are [`Value::Empty`] for every kind. Returns `None` when
    /// the text cannot be read as this kind.
    pub fn parse(&self, raw: &str) -> Option<Value> {
        if raw.trim().is_empty() {
            return Some(Value::Empty);
        }
        match self {
            ColumnKind::Date => parse_date(raw).map(Value::Date),
            ColumnKind::Number => parse_number(raw).map(Value::Number),
            ColumnKind::Text => Some(Value::Text(raw.to_string())),
        }
    }

    /// Whether `value` is a legal cell for this kind.
    pub fn accepts(&self, value: &Value) -> bool {
        match (self, value) {
            (_, Value::Empty | Value::Unparsed(_)) => true,
            (ColumnKind::Date, Value::Date(_)) => true,
            (ColumnKind::Number, Value::Number(_)) => true,
            (ColumnKind::Text, Value::Text(_)) => true,
            _ => false,
        }
    }
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ColumnKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "date" | "d" => Ok(ColumnKind::Date),
            "number" | "num" | "f" => Ok(ColumnKind::Number),
            "text" | "string" | "s" => Ok(ColumnKind::Text),
            other => Err(format!("unknown column type '{other}'")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub name: String,
    pub kind: ColumnKind,
}

impl Column {
    pub fn new(name: impl Into<String>, kind: ColumnKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}

/// Ordered source columns plus the designated tag column.
///
/// The tag column may be one of the source columns (it must then be text) or
/// a new column that only exists in the exported file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    columns: Vec<Column>,
    tag_column: String,
    tag_index: Option<usize>,
}

impl Schema {
    pub fn new(columns: Vec<Column>, tag_column: impl Into<String>) -> Result<Self, SchemaError> {
        let tag_column = tag_column.into();
        if tag_column.trim().is_empty() {
            return Err(SchemaError::EmptyColumnName {
                position: columns.len(),
            });
        }
        let mut seen = HashSet::new();
        for (position, column) in columns.iter().enumerate() {
            if column.name.trim().is_empty() {
                return Err(SchemaError::EmptyColumnName { position });
            }
            if !seen.insert(column.name.as_str()) {
                return Err(SchemaError::DuplicateColumn {
                    name: column.name.clone(),
                });
            }
        }
        let tag_index = columns.iter().position(|c| c.name == tag_column);
        if let Some(index) = tag_index {
            let kind = columns[index].kind;
            if kind != ColumnKind::Text {
                return Err(SchemaError::TagColumnType {
                    name: tag_column,
                    kind,
                });
            }
        }
        Ok(Self {
            columns,
            tag_column,
            tag_index,
        })
    }

    /// Build a schema from a header row and a `name -> kind` role map.
    ///
    /// Columns without a role are text. Blank header cells are named
    /// `column_N` (1-based). Every role must name a header column.
    pub fn from_header(
        header: &[String],
        roles: &BTreeMap<String, ColumnKind>,
        tag_column: impl Into<String>,
    ) -> Result<Self, SchemaError> {
        let names: Vec<String> = header
            .iter()
            .enumerate()
            .map(|(idx, name)| {
                let name = name.trim_matches('\u{feff}').trim();
                if name.is_empty() {
                    generated_column_name(idx)
                } else {
                    name.to_string()
                }
            })
            .collect();
        if let Some(missing) = roles.keys().find(|role| !names.contains(*role)) {
            return Err(SchemaError::UnknownColumn {
                name: missing.clone(),
            });
        }
        let columns = names
            .into_iter()
            .map(|name| {
                let kind = roles.get(&name).copied().unwrap_or_default();
                Column { name, kind }
            })
            .collect();
        Self::new(columns, tag_column)
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn column(&self, index: usize) -> Option<&Column> {
        self.columns.get(index)
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    /// Type of the named column; the tag column is always text.
    pub fn column_type(&self, name: &str) -> Option<ColumnKind> {
        if name == self.tag_column {
            return Some(ColumnKind::Text);
        }
        self.index_of(name).map(|idx| self.columns[idx].kind)
    }

    pub fn tag_column_name(&self) -> &str {
        &self.tag_column
    }

    /// Source position of the tag column, if the source already has one.
    pub fn tag_index(&self) -> Option<usize> {
        self.tag_index
    }

    /// Indices and names of the number columns, in source order.
    pub fn number_columns(&self) -> impl Iterator<Item = (usize, &str)> {
        self.columns
            .iter()
            .enumerate()
            .filter(|(_, c)| c.kind == ColumnKind::Number)
            .map(|(idx, c)| (idx, c.name.as_str()))
    }
}

/// Name given to a column that has no header text.
pub fn generated_column_name(index: usize) -> String {
    format!("column_{}", index + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn from_header_assigns_roles() {
        let roles = BTreeMap::from([
            ("Date".to_string(), ColumnKind::Date),
            ("Debit".to_string(), ColumnKind::Number),
        ]);
        let schema =
            Schema::from_header(&header(&["Date", "Label", "Debit"]), &roles, "tag").unwrap();
        assert_eq!(schema.column_type("Date"), Some(ColumnKind::Date));
        assert_eq!(schema.column_type("Label"), Some(ColumnKind::Text));
        assert_eq!(schema.column_type("Debit"), Some(ColumnKind::Number));
        assert_eq!(schema.column_type("tag"), Some(ColumnKind::Text));
        assert_eq!(schema.column_type("Credit"), None);
        assert_eq!(schema.tag_index(), None);
    }

    #[test]
    fn from_header_names_blank_columns() {
        let schema =
            Schema::from_header(&header(&["\u{feff}Date", ""]), &BTreeMap::new(), "tag").unwrap();
        assert_eq!(schema.columns()[0].name, "Date");
        assert_eq!(schema.columns()[1].name, "column_2");
    }

    #[test]
    fn from_header_rejects_unknown_role() {
        let roles = BTreeMap::from([("Amount".to_string(), ColumnKind::Number)]);
        let err = Schema::from_header(&header(&["Date"]), &roles, "tag").unwrap_err();
        assert_eq!(
            err,
            SchemaError::UnknownColumn {
                name: "Amount".to_string()
            }
        );
    }

    #[test]
    fn rejects_duplicate_columns() {
        let err = Schema::new(
            vec![
                Column::new("a", ColumnKind::Text),
                Column::new("a", ColumnKind::Number),
            ],
            "tag",
        )
        .unwrap_err();
        assert!(matches!(err, SchemaError::DuplicateColumn { .. }));
    }

    #[test]
    fn existing_tag_column_must_be_text() {
        let err = Schema::new(vec![Column::new("tag", ColumnKind::Number)], "tag").unwrap_err();
        assert!(matches!(err, SchemaError::TagColumnType { .. }));

        let schema = Schema::new(
            vec![
                Column::new("label", ColumnKind::Text),
                Column::new("tag", ColumnKind::Text),
            ],
            "tag",
        )
        .unwrap();
        assert_eq!(schema.tag_index(), Some(1));
    }

    #[test]
    fn column_kind_parse() {
        assert_eq!(ColumnKind::Number.parse("  "), Some(Value::Empty));
        assert_eq!(ColumnKind::Number.parse("4,5"), Some(Value::Number(4.5)));
        assert_eq!(ColumnKind::Number.parse("four"), None);
        assert_eq!(
            ColumnKind::Text.parse("four"),
            Some(Value::Text("four".into()))
        );
        assert!(ColumnKind::Date.parse("yesterday").is_none());
    }

    #[test]
    fn column_kind_from_str() {
        assert_eq!("Date".parse::<ColumnKind>(), Ok(ColumnKind::Date));
        assert_eq!("f".parse::<ColumnKind>(), Ok(ColumnKind::Number));
        assert!("money".parse::<ColumnKind>().is_err());
    }
}
