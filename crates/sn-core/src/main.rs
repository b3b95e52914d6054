//! sn-stats - per-period statistics from a storage-node log
//!
//! Reads the log from stdin (or `--input`), aggregates uploads, downloads
//! and deletes into fixed-length periods, and writes a Markdown or JSON
//! report to stdout. Diagnostics go to stderr.

use clap::Parser;
use sn_common::OutputFormat;
use sn_config::{resolve_settings, SettingsOverrides};
use sn_core::aggregate::aggregate;
use sn_core::exit_codes::ExitCode;
use sn_core::logging::{event_names, generate_run_id, init_logging, LogConfig, LogFormat, LogLevel};
use sn_core::report;
use std::fs::File;
use std::io::{self, BufReader};
use std::path::PathBuf;
use tracing::{error, info, info_span};

/// Storage-node log statistics - uploads, downloads and deletes per period
#[derive(Parser, Debug)]
#[command(name = "sn-stats")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Period length in whole days (at least 1)
    #[arg(allow_negative_numbers = true)]
    days: Option<i64>,

    /// Read the log from this file instead of stdin
    #[arg(long, short = 'i')]
    input: Option<PathBuf>,

    /// Report format
    #[arg(long, short = 'f')]
    format: Option<OutputFormat>,

    /// Path to config.toml
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log format on stderr (human, jsonl)
    #[arg(long)]
    log_format: Option<LogFormat>,

    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long)]
    quiet: bool,
}

fn main() {
    let cli = Cli::parse();

    let log_level = if cli.quiet {
        Some(LogLevel::Error)
    } else {
        match cli.verbose {
            0 => None,
            1 => Some(LogLevel::Debug),
            _ => Some(LogLevel::Trace),
        }
    };
    init_logging(&LogConfig::from_env(log_level, cli.log_format));

    let run_id = generate_run_id();
    let span = info_span!("run", run_id = %run_id);
    let _guard = span.enter();

    let exit_code = match run(&cli) {
        Ok(()) => ExitCode::Clean,
        Err(err) => {
            let code = ExitCode::from(&err);
            error!(
                code = err.code(),
                category = %err.category(),
                exit_code = %code,
                "{}",
                err
            );
            eprintln!("Error: {}", err);
            code
        }
    };

    std::process::exit(exit_code.as_i32());
}

fn run(cli: &Cli) -> sn_common::Result<()> {
    let settings = resolve_settings(&SettingsOverrides {
        period_days: cli.days,
        format: cli.format,
        config_path: cli.config.clone(),
    })?;

    info!(
        event = event_names::RUN_STARTED,
        period = %settings.period,
        period_source = %settings.period_source,
        format = %settings.format,
        input = %cli.input.as_ref().map_or("stdin".to_string(), |p| p.display().to_string()),
        "Starting"
    );

    let summary = match &cli.input {
        Some(path) => aggregate(BufReader::new(File::open(path)?), settings.period)?,
        None => aggregate(io::stdin().lock(), settings.period)?,
    };

    let mut out = io::stdout().lock();
    report::render(&mut out, &summary, settings.format)
}
