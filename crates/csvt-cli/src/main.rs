//! csv-tagger: interactive row tagging for CSV files.

use clap::{ColorChoice, Parser};
use csvt_cli::logging::{LogConfig, LogFormat, init_logging};
use csvt_cli::summary::print_summary;
use csvt_cli::workflow::Finished;
use csvt_persistence::PersistenceError;
use std::io::{self, IsTerminal};
use tracing::level_filters::LevelFilter;

mod cli;
mod commands;

use crate::cli::{Cli, Command, LogFormatArg, LogLevelArg};
use crate::commands::{run_new, run_resume, run_schema, run_summary, run_validate};

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = log_config_from_cli(&cli);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }
    let result = match &cli.command {
        Command::New(args) => run_new(args).map(|finished| print_finished(&finished)),
        Command::Resume(args) => run_resume(args).map(|finished| print_finished(&finished)),
        Command::Validate(args) => run_validate(args),
        Command::Summary(args) => run_summary(args),
        Command::Schema => run_schema(),
    };
    let exit_code = match result {
        Ok(()) => 0,
        Err(error) => {
            print_error(&error);
            1
        }
    };
    std::process::exit(exit_code);
}

fn print_finished(finished: &Finished) {
    println!();
    print_summary(&finished.summary);
    if let Some(path) = &finished.output_path {
        println!("Tagged CSV written to {}", path.display());
    }
    if let Some(path) = &finished.session_path {
        println!("Session saved to {}", path.display());
        println!("Continue with: csv-tagger resume {}", path.display());
    }
}

fn print_error(error: &anyhow::Error) {
    for line in error_lines(error) {
        eprintln!("{line}");
    }
}

/// Session file errors lead with their plain-language message and a hint.
fn error_lines(error: &anyhow::Error) -> Vec<String> {
    let persistence = error
        .chain()
        .find_map(|cause| cause.downcast_ref::<PersistenceError>());
    let Some(persistence) = persistence else {
        return vec![format!("error: {error:#}")];
    };
    let mut lines = vec![
        format!("error: {}", persistence.user_message()),
        format!("  details: {error:#}"),
    ];
    if let Some(suggestion) = persistence.suggestion() {
        lines.push(format!("hint: {suggestion}"));
    }
    lines
}

/// Build logging configuration from CLI flags with consistent precedence.
fn log_config_from_cli(cli: &Cli) -> LogConfig {
    let mut config = LogConfig {
        level_filter: cli.verbosity.tracing_level_filter(),
        ..LogConfig::default()
    };
    config.use_env_filter = !(cli.verbosity.is_present() || cli.log_level.is_some());
    if let Some(level) = cli.log_level {
        config.level_filter = match level {
            LogLevelArg::Error => LevelFilter::ERROR,
            LogLevelArg::Warn => LevelFilter::WARN,
            LogLevelArg::Info => LevelFilter::INFO,
            LogLevelArg::Debug => LevelFilter::DEBUG,
            LogLevelArg::Trace => LevelFilter::TRACE,
        };
    }
    config.format = match cli.log_format {
        LogFormatArg::Pretty => LogFormat::Pretty,
        LogFormatArg::Compact => LogFormat::Compact,
        LogFormatArg::Json => LogFormat::Json,
    };
    config.log_file = cli.log_file.clone();
    config.log_data = cli.log_data;
    config.with_ansi = match cli.color.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => cli.log_file.is_none() && io::stderr().is_terminal(),
    };
    config
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn session_errors_get_message_and_hint() {
        let error = anyhow::Error::new(PersistenceError::CorruptSession {
            path: Some(PathBuf::from("march.csvt")),
            reason: "record 2 is tagged 'x'".to_string(),
        })
        .context("load session march.csvt");
        let lines = error_lines(&error);
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("error: The file at march.csvt is not a usable session"));
        assert!(lines[1].contains("load session march.csvt"));
        assert!(lines[2].starts_with("hint: Start a new session"));
    }

    #[test]
    fn other_errors_print_the_chain() {
        let error = anyhow::anyhow!("no such column").context("import march.csv");
        assert_eq!(
            error_lines(&error),
            ["error: import march.csv: no such column"]
        );
    }
}
