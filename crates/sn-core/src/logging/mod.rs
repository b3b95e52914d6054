//! Structured logging for sn-core.
//!
//! Provides dual-mode logging:
//! - Human-readable console output for interactive use
//! - Machine-parseable JSONL for pipelines
//!
//! # Design Notes
//!
//! - stdout is reserved for the report (Markdown/JSON)
//! - stderr receives all log output (human or JSONL)
//! - Diagnostics carry an `event` field from [`event_names`]

pub mod config;

pub use config::{LogConfig, LogFormat, LogLevel};

use std::io::IsTerminal;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Standard values for the `event` field of log lines.
pub mod event_names {
    pub const RUN_STARTED: &str = "run.started";
    pub const RUN_COMPLETED: &str = "run.completed";
    pub const PERIOD_CLOSED: &str = "aggregate.period_closed";
    pub const BAD_LINE: &str = "parse.bad_line";
    pub const UNEXPECTED_EVENT: &str = "parse.unexpected_event";
    pub const LEFTOVER_PIECES: &str = "ledger.leftover_pieces";
}

/// Build the filter for `config`.
///
/// `RUST_LOG` directives apply only when they were the sole level source;
/// unparseable directives fall back to the configured level.
pub fn env_filter(config: &LogConfig) -> EnvFilter {
    let by_level = || EnvFilter::new(format!("sn_core={},sn_stats={}", config.level, config.level));
    match &config.rust_log {
        Some(directives) => EnvFilter::try_new(directives).unwrap_or_else(|_| by_level()),
        None => by_level(),
    }
}

/// Initialize the logging subsystem.
///
/// Must be called once at startup before any logging occurs.
pub fn init_logging(config: &LogConfig) {
    let filter = env_filter(config);

    match config.format {
        LogFormat::Human => {
            let use_ansi = std::io::stderr().is_terminal();
            let fmt_layer = fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_thread_ids(false)
                .with_thread_names(false)
                .with_ansi(use_ansi);

            tracing_subscriber::registry()
                .with(filter)
                .with(fmt_layer)
                .init();
        }
        LogFormat::Jsonl => {
            let json_layer = fmt::layer()
                .json()
                .with_writer(std::io::stderr)
                .with_current_span(true)
                .with_span_list(false);
            tracing_subscriber::registry()
                .with(filter)
                .with(json_layer)
                .init();
        }
    }
}

/// Generate a unique run ID for this invocation.
pub fn generate_run_id() -> String {
    let uuid = uuid::Uuid::new_v4();
    // Shorten to first 12 hex chars for readability
    format!("run-{}", &uuid.simple().to_string()[..12])
}

/// Shorten a log line for inclusion in a diagnostic.
pub fn truncate_for_log(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        return s.to_string();
    }
    let mut end = max_len;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...(truncated)", &s[..end])
}
