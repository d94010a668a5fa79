//! CLI argument definitions for csv-tagger.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

use csvt_cli::config::ImportOverrides;

#[derive(Parser)]
#[command(
    name = "csv-tagger",
    version,
    about = "Tag the rows of a CSV file, one at a time",
    long_about = "Walk through the rows of a CSV export (a bank statement, for instance) \
                  and give each one a tag from a fixed list.\n\n\
                  Progress is saved to a session file after every step, so tagging can be \
                  stopped and resumed at any point. Once every row is tagged, a copy of the \
                  CSV with a tag column is written."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Allow row values (descriptions, amounts) in logs.
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Import a CSV file and start tagging.
    New(NewArgs),

    /// Continue a saved session.
    Resume(ResumeArgs),

    /// Check a session file without starting the prompt.
    Validate(SessionArgs),

    /// Print the tag summary of a session file.
    Summary(SessionArgs),

    /// Print the JSON Schema of the session file format.
    Schema,
}

#[derive(Args)]
pub struct NewArgs {
    /// CSV file to tag.
    #[arg(value_name = "CSV")]
    pub csv: PathBuf,

    /// Session file (default: <CSV> with extension .csvt).
    #[arg(long = "save", short = 's', value_name = "PATH")]
    pub save: Option<PathBuf>,

    /// TOML import profile; flags override its values.
    #[arg(long = "profile", value_name = "TOML")]
    pub profile: Option<PathBuf>,

    /// Field delimiter (a single character, or "tab").
    #[arg(long = "delimiter", short = 'd', value_name = "C")]
    pub delimiter: Option<String>,

    /// Quote character.
    #[arg(long = "quote", value_name = "C")]
    pub quote: Option<String>,

    /// Rows before the first record; the header is the last of them.
    #[arg(long = "skip", value_name = "N")]
    pub skip: Option<usize>,

    /// The file has no header row; columns are named column_1, column_2, ...
    #[arg(long = "no-header")]
    pub no_header: bool,

    /// Column holding dates (repeatable).
    #[arg(long = "date", value_name = "COL")]
    pub dates: Vec<String>,

    /// Column holding amounts (repeatable).
    #[arg(long = "number", value_name = "COL")]
    pub numbers: Vec<String>,

    /// Name of the tag column in the output (default: tag).
    #[arg(long = "tag-column", value_name = "NAME")]
    pub tag_column: Option<String>,

    /// Allowed tags, comma separated.
    #[arg(long = "tags", value_name = "TAGS", value_delimiter = ',')]
    pub tags: Vec<String>,

    #[command(flatten)]
    pub run: RunArgs,
}

impl NewArgs {
    pub fn overrides(&self) -> ImportOverrides {
        ImportOverrides {
            delimiter: self.delimiter.clone(),
            quote: self.quote.clone(),
            skip_rows: self.skip,
            no_header: self.no_header,
            dates: self.dates.clone(),
            numbers: self.numbers.clone(),
            tag_column: self.tag_column.clone(),
            tags: self.tags.clone(),
        }
    }
}

#[derive(Args)]
pub struct ResumeArgs {
    /// Session file to continue.
    #[arg(value_name = "SESSION")]
    pub session: PathBuf,

    #[command(flatten)]
    pub run: RunArgs,
}

/// Options shared by the commands that run the prompt.
#[derive(Args)]
pub struct RunArgs {
    /// Tagged CSV written once every record is tagged
    /// (default: <source stem>.tagged.csv).
    #[arg(long = "output", short = 'o', value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Only save the session when leaving the prompt.
    #[arg(long = "no-autosave")]
    pub no_autosave: bool,
}

#[derive(Args)]
pub struct SessionArgs {
    /// Session file.
    #[arg(value_name = "SESSION")]
    pub session: PathBuf,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
