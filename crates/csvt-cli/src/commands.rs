use std::io;
use std::path::Path;

use anyhow::{Context, Result};
use comfy_table::Table;
use tracing::{info_span, warn};

use csvt_cli::config::{ImportProfile, resolve};
use csvt_cli::interactive::run_loop;
use csvt_cli::summary::{apply_table_style, print_summary};
use csvt_cli::workflow::{
    AutoSaver, Finished, NewSession, default_output_path, default_session_path, finish,
    import_csv,
};
use csvt_core::{NavigationState, summarize};
use csvt_model::SchemaError;
use csvt_persistence::{
    CURRENT_SCHEMA_VERSION, FORMAT_NAME, SessionDocument, SourceStatus, load_session,
    session_json_schema,
};

use crate::cli::{NewArgs, ResumeArgs, RunArgs, SessionArgs};

/// Issues listed individually before the rest are only counted.
const MAX_LISTED_ISSUES: usize = 20;

pub fn run_new(args: &NewArgs) -> Result<Finished> {
    let span = info_span!("new", csv = %args.csv.display());
    let _guard = span.enter();

    let profile = match &args.profile {
        Some(path) => ImportProfile::load(path)?,
        None => ImportProfile::default(),
    };
    let plan = resolve(&profile, &args.overrides())?;
    let NewSession {
        mut document,
        issues,
        new_tags,
        reserved_tags,
    } = import_csv(&args.csv, &plan)?;
    print_issues(&issues);
    if !new_tags.is_empty() {
        println!("Tags found in {}: {}", args.csv.display(), new_tags.join(", "));
    }
    for tag in &reserved_tags {
        eprintln!(
            "warning: tag '{tag}' from {} is also a prompt command; \
             records can keep it but it cannot be typed",
            args.csv.display()
        );
    }

    let session_path = args
        .save
        .clone()
        .unwrap_or_else(|| default_session_path(&args.csv));
    let output = args
        .run
        .output
        .clone()
        .unwrap_or_else(|| default_output_path(&args.csv));
    let mut saver = AutoSaver::new(session_path, !args.run.no_autosave);
    if !args.run.no_autosave {
        saver.save(&mut document)?;
    }
    tag_interactively(&mut document, &mut saver, &args.run, &output)
}

pub fn run_resume(args: &ResumeArgs) -> Result<Finished> {
    let span = info_span!("resume", session = %args.session.display());
    let _guard = span.enter();

    let mut document = load_document(&args.session)?;
    check_source(&document);
    let output = args.run.output.clone().unwrap_or_else(|| {
        let source = document
            .source
            .as_ref()
            .map_or(args.session.as_path(), |s| Path::new(&s.path));
        default_output_path(source)
    });
    let mut saver = AutoSaver::new(args.session.clone(), !args.run.no_autosave);
    tag_interactively(&mut document, &mut saver, &args.run, &output)
}

pub fn run_validate(args: &SessionArgs) -> Result<()> {
    let document = load_document(&args.session)?;
    let state = &document.state;
    let progress = state.progress();
    let flagged = state.store().iter().filter(|r| r.is_flagged()).count();
    let position = match (state.state(), state.cursor().index()) {
        (NavigationState::Complete, _) | (_, None) => "complete".to_string(),
        (NavigationState::Editing, Some(index)) => format!("editing record {}", index + 1),
        (NavigationState::Reviewing, Some(index)) => format!("reviewing record {}", index + 1),
    };

    let mut table = Table::new();
    table.set_header(vec!["Property", "Value"]);
    apply_table_style(&mut table);
    table.add_row(vec![
        "Format".to_string(),
        format!("{FORMAT_NAME} v{CURRENT_SCHEMA_VERSION}"),
    ]);
    table.add_row(vec!["Created".to_string(), document.created_at.clone()]);
    table.add_row(vec!["Saved".to_string(), document.saved_at.clone()]);
    table.add_row(vec![
        "Columns".to_string(),
        state
            .schema()
            .columns()
            .iter()
            .map(|c| format!("{} ({})", c.name, c.kind))
            .collect::<Vec<_>>()
            .join(", "),
    ]);
    table.add_row(vec!["Tags".to_string(), state.registry().all().join(", ")]);
    table.add_row(vec![
        "Records".to_string(),
        format!(
            "{} ({} tagged, {} untagged, {} flagged)",
            progress.total,
            progress.annotated,
            progress.total - progress.annotated,
            flagged
        ),
    ]);
    table.add_row(vec!["Position".to_string(), position]);
    if let Some(source) = &document.source {
        let status = match source.status() {
            Ok(SourceStatus::Unchanged) => "unchanged",
            Ok(SourceStatus::Changed) => "changed since import",
            Ok(SourceStatus::Missing) => "missing",
            Err(_) => "unreadable",
        };
        table.add_row(vec![
            "Source".to_string(),
            format!("{} ({status})", source.path),
        ]);
    }
    println!("{} is a valid session.", args.session.display());
    println!("{table}");
    Ok(())
}

pub fn run_summary(args: &SessionArgs) -> Result<()> {
    let document = load_document(&args.session)?;
    print_summary(&summarize(&document.state));
    Ok(())
}

pub fn run_schema() -> Result<()> {
    println!("{}", session_json_schema()?);
    Ok(())
}

fn load_document(path: &Path) -> Result<SessionDocument> {
    load_session(path).with_context(|| format!("load session {}", path.display()))
}

fn tag_interactively(
    document: &mut SessionDocument,
    saver: &mut AutoSaver,
    run: &RunArgs,
    output: &Path,
) -> Result<Finished> {
    if run.no_autosave {
        println!("Auto-save is off; the session is saved when you quit.");
    }
    println!("Type ? for help.");
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    run_loop(document, stdin.lock(), &mut stdout, |doc| {
        saver.record_change(doc)
    })?;
    finish(document, saver, output).map_err(|unfinished| {
        println!();
        print_summary(&unfinished.summary);
        unfinished.error
    })
}

fn check_source(document: &SessionDocument) {
    let Some(source) = &document.source else {
        return;
    };
    match source.status() {
        Ok(SourceStatus::Unchanged) => {}
        Ok(SourceStatus::Changed) => {
            warn!(path = %source.path, "source file changed since import");
            eprintln!(
                "warning: {} has changed since this session was created; \
                 the session keeps the rows it imported",
                source.path
            );
        }
        Ok(SourceStatus::Missing) => {
            eprintln!("warning: source file {} not found", source.path);
        }
        Err(err) => warn!(error = %err, "could not check the source file"),
    }
}

fn print_issues(issues: &[SchemaError]) {
    if issues.is_empty() {
        return;
    }
    eprintln!(
        "warning: {} problem(s) while reading rows; affected rows are flagged:",
        issues.len()
    );
    for issue in issues.iter().take(MAX_LISTED_ISSUES) {
        eprintln!("  - {issue}");
    }
    if issues.len() > MAX_LISTED_ISSUES {
        eprintln!("  ... and {} more", issues.len() - MAX_LISTED_ISSUES);
    }
}
