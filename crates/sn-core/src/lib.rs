//! Storage-node log statistics core library.
//!
//! This library turns a storage-node event log into per-period statistics:
//! - Line reader with one line of pushback
//! - Event parsing into typed variants
//! - Piece-size ledger with upload size estimation
//! - Period aggregation and report rendering
//!
//! The binary entry point is in `main.rs`.

pub mod aggregate;
pub mod exit_codes;
pub mod ledger;
pub mod logging;
pub mod parse;
pub mod reader;
pub mod record;
pub mod report;

pub use aggregate::{AggregateStats, PeriodAggregator};
pub use ledger::{LedgerSummary, PieceSizeLedger};
pub use parse::{LogEvent, LogLine, ParseError};
pub use reader::{PushbackReader, ReaderError};
pub use record::PeriodRecord;
