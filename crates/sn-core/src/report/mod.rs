//! Report rendering.
//!
//! Markdown tables for people, JSON for scripts. Both are written to the
//! given writer (stdout in the CLI); diagnostics never go here.

pub mod markdown;
pub mod percent;

pub use markdown::write_report;
pub use percent::{percent, percent_of};

use sn_common::{OutputFormat, Result};
use std::io::Write;

use crate::aggregate::RunSummary;

/// Render a run in the requested format.
pub fn render<W: Write>(out: &mut W, summary: &RunSummary, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Md => markdown::write_report(out, &summary.records, &summary.ledger)?,
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, summary)?;
            writeln!(out)?;
        }
    }
    out.flush()?;
    Ok(())
}
