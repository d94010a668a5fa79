//! End-to-end tagging runs: import, prompt, save or export.

use std::fs;
use std::path::Path;

use csvt_cli::config::{ImportOverrides, ImportProfile, resolve};
use csvt_cli::interactive::{LoopExit, run_loop};
use csvt_cli::workflow::{AutoSaver, default_output_path, finish, import_csv};
use csvt_core::Cursor;
use csvt_persistence::{SessionDocument, SourceStatus, load_session};
use tempfile::TempDir;

const STATEMENT: &str = "\
date,label,amount
02/01/2024,Bakery,-4.20
03/01/2024,Rent,-800
05/01/2024,Salary,2100
";

fn overrides() -> ImportOverrides {
    ImportOverrides {
        dates: vec!["date".to_string()],
        numbers: vec!["amount".to_string()],
        tags: vec!["food".to_string(), "home".to_string(), "income".to_string()],
        ..ImportOverrides::default()
    }
}

fn write_statement(dir: &Path) -> std::path::PathBuf {
    let csv = dir.join("january.csv");
    fs::write(&csv, STATEMENT).unwrap();
    csv
}

fn tag(script: &str, document: &mut SessionDocument, saver: &mut AutoSaver) -> LoopExit {
    let mut out = Vec::new();
    run_loop(document, script.as_bytes(), &mut out, |doc| {
        saver.record_change(doc)
    })
    .unwrap()
}

#[test]
fn quitting_early_saves_a_resumable_session() {
    let dir = TempDir::new().unwrap();
    let csv = write_statement(dir.path());
    let plan = resolve(&ImportProfile::default(), &overrides()).unwrap();
    let mut new = import_csv(&csv, &plan).unwrap();
    assert!(new.issues.is_empty());

    let session_path = dir.path().join("january.csvt");
    let mut saver = AutoSaver::new(&session_path, true);
    let exit = tag("food\nq\n", &mut new.document, &mut saver);
    assert_eq!(exit, LoopExit::Quit);
    assert!(!saver.is_dirty());

    let output = default_output_path(&csv);
    let finished = finish(&mut new.document, &mut saver, &output).unwrap();
    assert_eq!(finished.session_path.as_deref(), Some(session_path.as_path()));
    assert!(finished.output_path.is_none());
    assert_eq!(finished.summary.count("food"), Some(1));
    assert_eq!(finished.summary.unannotated_count(), 2);
    assert!(!output.exists());

    let mut resumed = load_session(&session_path).unwrap();
    assert_eq!(resumed.state, new.document.state);
    assert_eq!(resumed.state.cursor(), Cursor::At(1));
    let source = resumed.source.clone().unwrap();
    assert_eq!(source.status().unwrap(), SourceStatus::Unchanged);

    let mut saver = AutoSaver::new(&session_path, true);
    tag("home\nincome\nq\n", &mut resumed, &mut saver);
    let finished = finish(&mut resumed, &mut saver, &output).unwrap();
    assert_eq!(finished.output_path.as_deref(), Some(output.as_path()));
    assert_eq!(
        fs::read_to_string(&output).unwrap(),
        "date,label,amount,tag\n\
         02/01/2024,Bakery,-4.20,food\n\
         03/01/2024,Rent,-800,home\n\
         05/01/2024,Salary,2100,income\n"
    );
    assert_eq!(finished.summary.annotated_count(), 3);
}

#[test]
fn without_autosave_nothing_is_written_until_finish() {
    let dir = TempDir::new().unwrap();
    let csv = write_statement(dir.path());
    let plan = resolve(&ImportProfile::default(), &overrides()).unwrap();
    let mut new = import_csv(&csv, &plan).unwrap();

    let session_path = dir.path().join("manual.csvt");
    let mut saver = AutoSaver::new(&session_path, false);
    let exit = tag("food\n>\n", &mut new.document, &mut saver);
    assert_eq!(exit, LoopExit::EndOfInput);
    assert!(saver.is_dirty());
    assert!(!session_path.exists());

    finish(&mut new.document, &mut saver, &dir.path().join("out.csv")).unwrap();
    assert!(session_path.exists());
    assert!(!saver.is_dirty());
}

#[test]
fn edited_source_is_detected_on_resume() {
    let dir = TempDir::new().unwrap();
    let csv = write_statement(dir.path());
    let plan = resolve(&ImportProfile::default(), &overrides()).unwrap();
    let mut new = import_csv(&csv, &plan).unwrap();
    let session_path = dir.path().join("january.csvt");
    AutoSaver::new(&session_path, true)
        .save(&mut new.document)
        .unwrap();

    fs::write(&csv, format!("{STATEMENT}06/01/2024,Cinema,-12\n")).unwrap();
    let resumed = load_session(&session_path).unwrap();
    let source = resumed.source.unwrap();
    assert_eq!(source.status().unwrap(), SourceStatus::Changed);
    assert_eq!(resumed.state.len(), 3);

    fs::remove_file(&csv).unwrap();
    assert_eq!(source.status().unwrap(), SourceStatus::Missing);
}

#[test]
fn import_without_tags_fails() {
    let dir = TempDir::new().unwrap();
    let csv = write_statement(dir.path());
    let plan = resolve(&ImportProfile::default(), &ImportOverrides::default()).unwrap();
    let err = import_csv(&csv, &plan).unwrap_err();
    assert!(format!("{err:#}").contains("import"));
}

#[test]
fn seeded_command_words_are_reported() {
    let dir = TempDir::new().unwrap();
    let csv = dir.path().join("seeded.csv");
    fs::write(&csv, "label,tag\nBakery,food\nRent,s\nSalary,\n").unwrap();
    let flags = ImportOverrides {
        tags: vec!["food".to_string()],
        ..ImportOverrides::default()
    };
    let plan = resolve(&ImportProfile::default(), &flags).unwrap();
    let new = import_csv(&csv, &plan).unwrap();
    assert_eq!(new.new_tags, ["s"]);
    assert_eq!(new.reserved_tags, ["s"]);
    assert_eq!(new.document.state.store().get(1).unwrap().tag(), Some("s"));
}

#[test]
fn failed_final_save_still_reports_summary() {
    let dir = TempDir::new().unwrap();
    let csv = write_statement(dir.path());
    let plan = resolve(&ImportProfile::default(), &overrides()).unwrap();
    let mut new = import_csv(&csv, &plan).unwrap();

    let session_path = dir.path().join("blocked.csvt");
    fs::create_dir(dir.path().join("blocked.csvt.tmp")).unwrap();
    let mut saver = AutoSaver::new(&session_path, false);
    tag("food\nq\n", &mut new.document, &mut saver);

    let output = default_output_path(&csv);
    let unfinished = finish(&mut new.document, &mut saver, &output).unwrap_err();
    assert_eq!(unfinished.summary.count("food"), Some(1));
    assert_eq!(unfinished.summary.unannotated_count(), 2);
    assert!(format!("{:#}", unfinished.error).contains("save session"));
    assert!(saver.is_dirty());
    assert!(!session_path.exists());
}
