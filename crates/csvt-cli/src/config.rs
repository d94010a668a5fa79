//! Import profiles: recurring CSV layouts stored as TOML.
//!
//! ```toml
//! delimiter = ";"
//! skip_rows = 2
//! tag_column = "Categorie"
//! tags = ["food", "home", "income"]
//!
//! [columns]
//! Date = "date"
//! Montant = "number"
//! ```
//!
//! Command-line flags override profile values.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

use csvt_ingest::{CsvOptions, ImportSettings, parse_dialect_char};
use csvt_model::ColumnKind;

use crate::prompt::is_reserved_tag;

/// Settings read from a profile file. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ImportProfile {
    pub delimiter: Option<String>,
    pub quote: Option<String>,
    pub skip_rows: Option<usize>,
    pub has_header: Option<bool>,
    pub tag_column: Option<String>,
    pub tags: Vec<String>,
    /// Column name to type.
    pub columns: BTreeMap<String, ColumnKind>,
}

impl ImportProfile {
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("read profile {}", path.display()))?;
        Self::from_toml_str(&text).with_context(|| format!("parse profile {}", path.display()))
    }

    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }
}

/// Import settings given as command-line flags.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportOverrides {
    pub delimiter: Option<String>,
    pub quote: Option<String>,
    pub skip_rows: Option<usize>,
    pub no_header: bool,
    pub dates: Vec<String>,
    pub numbers: Vec<String>,
    pub tag_column: Option<String>,
    pub tags: Vec<String>,
}

/// Fully resolved import configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportPlan {
    pub options: CsvOptions,
    pub settings: ImportSettings,
}

/// Merge a profile with flags. Flags win; listed columns and tags given as
/// flags replace or extend the profile's.
pub fn resolve(profile: &ImportProfile, flags: &ImportOverrides) -> Result<ImportPlan> {
    let mut options = CsvOptions::default();
    if let Some(delimiter) = flags.delimiter.as_ref().or(profile.delimiter.as_ref()) {
        options.delimiter = parse_dialect_char(delimiter).context("invalid delimiter")?;
    }
    if let Some(quote) = flags.quote.as_ref().or(profile.quote.as_ref()) {
        options.quote = parse_dialect_char(quote).context("invalid quote character")?;
    }
    options.has_header = !flags.no_header && profile.has_header.unwrap_or(true);
    options.skip_rows = flags
        .skip_rows
        .or(profile.skip_rows)
        .unwrap_or(usize::from(options.has_header));

    let mut roles = profile.columns.clone();
    for name in &flags.dates {
        roles.insert(name.clone(), ColumnKind::Date);
    }
    for name in &flags.numbers {
        roles.insert(name.clone(), ColumnKind::Number);
    }

    let mut settings = ImportSettings {
        roles,
        ..ImportSettings::default()
    };
    if let Some(tag_column) = flags.tag_column.as_ref().or(profile.tag_column.as_ref()) {
        settings.tag_column = tag_column.clone();
    }
    settings.tags = if flags.tags.is_empty() {
        profile.tags.clone()
    } else {
        flags.tags.clone()
    };
    settings.tags.retain(|t| !t.trim().is_empty());
    if let Some(tag) = settings.tags.iter().find(|t| is_reserved_tag(t)) {
        bail!("'{}' is a prompt command and cannot be used as a tag", tag.trim());
    }

    Ok(ImportPlan { options, settings })
}
