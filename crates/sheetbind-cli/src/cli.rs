//! Command-line arguments.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "sheetbind",
    version,
    about = "Read spreadsheet rows into records using declarative column bindings",
    long_about = "Read spreadsheet rows into records using declarative column bindings.\n\n\
                  Supports CSV files and Excel/OpenDocument workbooks. Column names are \n\
                  matched ignoring case, spaces and punctuation."
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

    /// Allow cell values to appear in logs.
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Read a sheet through a binding file and print the records.
    Read(ReadArgs),

    /// Print the document properties of a workbook.
    Metadata(FileArgs),

    /// List the sheets of a workbook.
    Sheets(FileArgs),
}

#[derive(Args)]
pub struct FileArgs {
    /// Workbook to open (.csv, .xlsx, .xlsm, .xlsb, .xls, .ods).
    #[arg(value_name = "FILE")]
    pub file: PathBuf,
}

#[derive(Args)]
pub struct ReadArgs {
    /// Workbook to open (.csv, .xlsx, .xlsm, .xlsb, .xls, .ods).
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// JSON file with the bindings, flat column map and required fields.
    #[arg(long = "bindings", short = 'b', value_name = "JSON")]
    pub bindings: PathBuf,

    /// Sheet to read (default: the first sheet).
    #[arg(long = "sheet", value_name = "NAME")]
    pub sheet: Option<String>,

    /// Property path that must be non-blank for a row to be kept. Repeatable.
    #[arg(long = "required", value_name = "PATH")]
    pub required: Vec<String>,

    /// Output format for the records.
    #[arg(long = "format", value_enum, default_value = "json")]
    pub format: OutputFormatArg,

    /// Print row counts and skipped fields after the records.
    #[arg(long = "report")]
    pub report: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormatArg {
    Json,
    Table,
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
