//! sheetbind CLI.

use std::io::{self, IsTerminal};

use clap::{ColorChoice, Parser};
use tracing::level_filters::LevelFilter;

use sheetbind_cli::commands::{ReadOutcome, run_metadata, run_read, run_sheets};
use sheetbind_cli::logging::{LogConfig, LogFormat, init_logging};
use sheetbind_cli::output;

mod cli;

use crate::cli::{Cli, Command, LogFormatArg, LogLevelArg, OutputFormatArg, ReadArgs};

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = log_config_from_cli(&cli);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }
    let result = match &cli.command {
        Command::Read(args) => run_read(
            &args.file,
            &args.bindings,
            args.sheet.as_deref(),
            &args.required,
        )
        .and_then(|outcome| print_read(args, &outcome)),
        Command::Metadata(args) => run_metadata(&args.file).map(|metadata| {
            if !metadata.is_empty() {
                println!("{}", output::metadata_table(&metadata));
            }
        }),
        Command::Sheets(args) => run_sheets(&args.file).map(|names| {
            for name in names {
                println!("{name}");
            }
        }),
    };
    let exit_code = match result {
        Ok(()) => 0,
        Err(error) => {
            eprintln!("error: {error:#}");
            1
        }
    };
    std::process::exit(exit_code);
}

fn print_read(args: &ReadArgs, outcome: &ReadOutcome) -> anyhow::Result<()> {
    match args.format {
        OutputFormatArg::Json => println!("{}", output::records_json(&outcome.records)?),
        OutputFormatArg::Table => println!("{}", output::records_table(&outcome.records)),
    }
    if args.report {
        eprintln!("{}", output::report_table(&outcome.report));
        if let Some(details) = output::report_details_table(&outcome.report) {
            eprintln!("{details}");
        }
    }
    Ok(())
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
