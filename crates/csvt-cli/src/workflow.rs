//! Session lifecycle: import, auto-save and the exit rules.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{info, warn};

use csvt_core::{Summary, summarize};
use csvt_ingest::{CsvOptions, import_session, read_raw_table, tagged_csv_bytes};
use csvt_model::SchemaError;
use csvt_persistence::{
    DirtyTracker, SessionDocument, SourceSnapshot, compute_file_hash, save_session, write_atomic,
};

use crate::config::ImportPlan;
use crate::prompt::is_reserved_tag;

/// Where a new session is saved unless `--save` is given.
pub fn default_session_path(csv: &Path) -> PathBuf {
    csv.with_extension("csvt")
}

/// Where the tagged CSV is written unless `--output` is given:
/// `<stem>.tagged.csv` next to `source`.
pub fn default_output_path(source: &Path) -> PathBuf {
    let mut name = source
        .file_stem()
        .map(OsString::from)
        .unwrap_or_else(|| OsString::from("output"));
    name.push(".tagged.csv");
    source.with_file_name(name)
}

/// A freshly imported session and the problems found on the way.
#[derive(Debug)]
pub struct NewSession {
    pub document: SessionDocument,
    pub issues: Vec<SchemaError>,
    pub new_tags: Vec<String>,
    /// Seeded tags that read as prompt commands and so cannot be typed.
    pub reserved_tags: Vec<String>,
}

/// Read and convert a CSV file, recording its hash for later resumes.
pub fn import_csv(path: &Path, plan: &ImportPlan) -> Result<NewSession> {
    let table = read_raw_table(path, &plan.options)
        .with_context(|| format!("read {}", path.display()))?;
    let imported = import_session(table, &plan.settings)
        .with_context(|| format!("import {}", path.display()))?;
    let reserved_tags: Vec<String> = imported
        .new_tags
        .iter()
        .filter(|tag| is_reserved_tag(tag))
        .cloned()
        .collect();
    if !reserved_tags.is_empty() {
        warn!(count = reserved_tags.len(), "source tag column holds command words");
    }
    let hash = compute_file_hash(path)?;
    let source = SourceSnapshot::new(path, hash, plan.options);
    info!(
        path = %path.display(),
        records = imported.session.len(),
        flagged = imported.flagged_rows(),
        "new session"
    );
    Ok(NewSession {
        document: SessionDocument::new(imported.session, Some(source)),
        issues: imported.issues,
        new_tags: imported.new_tags,
        reserved_tags,
    })
}

/// Saves the session after changes unless auto-save is off.
#[derive(Debug)]
pub struct AutoSaver {
    path: PathBuf,
    enabled: bool,
    tracker: DirtyTracker,
}

impl AutoSaver {
    pub fn new(path: impl Into<PathBuf>, enabled: bool) -> Self {
        Self {
            path: path.into(),
            enabled,
            tracker: DirtyTracker::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_dirty(&self) -> bool {
        self.tracker.is_dirty()
    }

    /// Note one change and save when enabled.
    pub fn record_change(&mut self, document: &mut SessionDocument) -> Result<()> {
        self.tracker.mark_dirty();
        if self.enabled {
            self.save(document)?;
        }
        Ok(())
    }

    /// Save now, whatever the setting.
    pub fn save(&mut self, document: &mut SessionDocument) -> Result<()> {
        match save_session(document, &self.path) {
            Ok(()) => {
                self.tracker.save_complete();
                Ok(())
            }
            Err(err) => {
                warn!(
                    path = %self.path.display(),
                    pending = self.tracker.pending_changes(),
                    unsaved_ms = self.tracker.ms_since_first_unsaved(),
                    "session not saved"
                );
                Err(err).with_context(|| format!("save session {}", self.path.display()))
            }
        }
    }
}

/// Dialect for the tagged output: the one the source was read with.
pub fn export_options(document: &SessionDocument) -> CsvOptions {
    document
        .source
        .as_ref()
        .map(|source| source.options)
        .unwrap_or_default()
}

/// What was written when the session ended.
#[derive(Debug)]
pub struct Finished {
    /// Set when the session was incomplete and saved for later.
    pub session_path: Option<PathBuf>,
    /// Set when every record was tagged and the CSV was written.
    pub output_path: Option<PathBuf>,
    pub summary: Summary,
}

/// The final save or export failed. The summary is still reported.
#[derive(Debug)]
pub struct Unfinished {
    pub summary: Summary,
    pub error: anyhow::Error,
}

/// Apply the exit rules: an incomplete session is saved, a complete one is
/// exported. The summary is returned either way.
pub fn finish(
    document: &mut SessionDocument,
    saver: &mut AutoSaver,
    output: &Path,
) -> std::result::Result<Finished, Unfinished> {
    let summary = summarize(&document.state);
    match write_final(document, saver, output) {
        Ok((session_path, output_path)) => Ok(Finished {
            session_path,
            output_path,
            summary,
        }),
        Err(error) => Err(Unfinished { summary, error }),
    }
}

fn write_final(
    document: &mut SessionDocument,
    saver: &mut AutoSaver,
    output: &Path,
) -> Result<(Option<PathBuf>, Option<PathBuf>)> {
    if !document.state.is_complete() {
        saver.save(document)?;
        return Ok((Some(saver.path().to_path_buf()), None));
    }

    let bytes = tagged_csv_bytes(&document.state, &export_options(document))
        .context("render tagged CSV")?;
    write_atomic(output, &bytes).with_context(|| format!("write {}", output.display()))?;
    info!(path = %output.display(), records = document.state.len(), "wrote tagged CSV");
    Ok((None, Some(output.to_path_buf())))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_paths() {
        let csv = Path::new("/data/2024-02.csv");
        assert_eq!(default_session_path(csv), PathBuf::from("/data/2024-02.csvt"));
        assert_eq!(
            default_output_path(csv),
            PathBuf::from("/data/2024-02.tagged.csv")
        );
        assert_eq!(
            default_output_path(Path::new("statement.csvt")),
            PathBuf::from("statement.tagged.csv")
        );
    }
}
