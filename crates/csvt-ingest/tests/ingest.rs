//! File-level import and export tests.

use std::collections::BTreeMap;
use std::fs;

use csvt_core::{Navigator, summarize};
use csvt_ingest::{
    CsvOptions, ImportSettings, IngestError, import_session, read_raw_table, tagged_csv_bytes,
};
use csvt_model::{ColumnKind, Value};
use tempfile::TempDir;

const STATEMENT: &str = "\
Compte;000123
Date;Libelle;Montant
01/02/2024;Boulangerie;-1,20
2024-02-03;Loyer;-800
03/02/2024;Virement;1500
";

fn settings() -> ImportSettings {
    ImportSettings {
        roles: BTreeMap::from([
            ("Date".to_string(), ColumnKind::Date),
            ("Montant".to_string(), ColumnKind::Number),
        ]),
        tag_column: "Categorie".to_string(),
        tags: vec!["food".to_string(), "home".to_string(), "income".to_string()],
    }
}

#[test]
fn statement_import_tag_and_export() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("statement.csv");
    fs::write(&path, STATEMENT).unwrap();

    let options = CsvOptions::default().with_delimiter(b';').with_skip_rows(2);
    let table = read_raw_table(&path, &options).unwrap();
    let imported = import_session(table, &settings()).unwrap();
    assert!(imported.issues.is_empty());

    let mut session = imported.session;
    assert_eq!(
        session.value(0, "Montant").unwrap(),
        Some(&Value::Number(-1.2))
    );
    assert!(matches!(
        session.value(1, "Date").unwrap(),
        Some(Value::Date(_))
    ));

    let mut nav = Navigator::new(&mut session);
    for tag in ["food", "home", "income"] {
        nav.tag_current(tag).unwrap();
    }
    assert!(session.is_complete());

    let summary = summarize(&session);
    assert_eq!(summary.count("home"), 1);
    assert_eq!(summary.unannotated_count(), 0);

    let text = String::from_utf8(tagged_csv_bytes(&session, &options).unwrap()).unwrap();
    assert_eq!(
        text,
        "Compte;000123\n\
         Date;Libelle;Montant;Categorie\n\
         01/02/2024;Boulangerie;-1,20;food\n\
         2024-02-03;Loyer;-800;home\n\
         03/02/2024;Virement;1500;income\n"
    );
}

#[test]
fn missing_file_is_reported() {
    let dir = TempDir::new().unwrap();
    let result = read_raw_table(&dir.path().join("absent.csv"), &CsvOptions::default());
    assert!(matches!(result, Err(IngestError::FileNotFound { .. })));
}

#[test]
fn declared_column_missing_from_header() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("plain.csv");
    fs::write(&path, "desc,amount\nbread,1\n").unwrap();

    let table = read_raw_table(&path, &CsvOptions::default()).unwrap();
    let err = import_session(table, &settings()).unwrap_err();
    assert!(err.to_string().contains("Date"));
}
