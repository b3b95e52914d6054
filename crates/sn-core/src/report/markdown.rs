//! Markdown tables for the period records.

use std::io::{self, Write};

use super::percent::{percent, percent_of};
use crate::ledger::LedgerSummary;
use crate::record::PeriodRecord;

const BYTES_PER_GB: f64 = 1e9;

fn gb(bytes: u64) -> f64 {
    bytes as f64 / BYTES_PER_GB
}

fn date(rec: &PeriodRecord) -> String {
    rec.date.format("%Y-%m-%d").to_string()
}

/// Write the full report: uploads, downloads, deletes, other stats.
pub fn write_report<W: Write>(
    out: &mut W,
    records: &[PeriodRecord],
    ledger: &LedgerSummary,
) -> io::Result<()> {
    write_uploads(out, records)?;
    write_downloads(out, records)?;
    write_deletes(out, records)?;
    write_other(out, ledger)
}

pub fn write_uploads<W: Write>(out: &mut W, records: &[PeriodRecord]) -> io::Result<()> {
    writeln!(out, "## Uploads (ingress, PUT)")?;
    writeln!(
        out,
        "Date UTC   | OK count |  % | Size GB | Failed  |  % | Canceled |  %"
    )?;
    writeln!(
        out,
        "-----------|----------|----|---------|---------|----|----------|---"
    )?;
    for rec in records {
        let total = rec.total_uploads();
        writeln!(
            out,
            "{} | {:8} | {} | {:7.2} | {:7} | {} | {:8} | {}",
            date(rec),
            rec.up_ok,
            percent_of(rec.up_ok, total),
            gb(rec.up_ok_size),
            rec.up_fail,
            percent_of(rec.up_fail, total),
            rec.up_cancel,
            percent_of(rec.up_cancel, total),
        )?;
    }
    writeln!(out)
}

pub fn write_downloads<W: Write>(out: &mut W, records: &[PeriodRecord]) -> io::Result<()> {
    writeln!(out, "## Downloads (egress, GET)")?;
    writeln!(
        out,
        "Date UTC   | OK count + Unseen |  % + % | Size GB |  % | Failed   + Unseen |  % + % | Size GB |  % | Canceled + Unseen |  % + % | Size GB |  %"
    )?;
    writeln!(
        out,
        "-----------|-------------------|--------|---------|----|-------------------|--------|---------|----|-------------------|--------|---------|---"
    )?;
    for rec in records {
        let total = rec.total_downloads();
        let total_size = rec.total_download_size() as f64;
        let columns = [
            (rec.down_ok, rec.down_ok_unseen, rec.down_ok_size),
            (rec.down_fail, rec.down_fail_unseen, rec.down_fail_size),
            (rec.down_cancel, rec.down_cancel_unseen, rec.down_cancel_size),
        ];
        let cells: Vec<String> = columns
            .iter()
            .map(|&(count, unseen, size)| {
                format!(
                    "{:8} +{:7} | {} +{} | {:7.2} | {}",
                    count,
                    unseen,
                    percent_of(count, total),
                    percent_of(unseen, total),
                    gb(size),
                    percent(size as f64, total_size),
                )
            })
            .collect();
        writeln!(out, "{} | {}", date(rec), cells.join(" | "))?;
    }
    writeln!(out)
}

pub fn write_deletes<W: Write>(out: &mut W, records: &[PeriodRecord]) -> io::Result<()> {
    writeln!(out, "## Deletes")?;
    writeln!(out, "Date UTC   | OK count + Unseen |  % + % | Size GB")?;
    writeln!(out, "-----------|-------------------|--------|--------")?;
    for rec in records {
        let total = rec.total_deletes();
        writeln!(
            out,
            "{} | {:8} +{:7} | {} +{} | {:7.2}",
            date(rec),
            rec.del_ok,
            rec.del_ok_unseen,
            percent_of(rec.del_ok, total),
            percent_of(rec.del_ok_unseen, total),
            gb(rec.del_ok_size),
        )?;
    }
    writeln!(out)
}

pub fn write_other<W: Write>(out: &mut W, ledger: &LedgerSummary) -> io::Result<()> {
    writeln!(out, "## Other stats")?;
    writeln!(
        out,
        "Seen pieces remaining: {:8}, {:7.2} GB",
        ledger.pieces,
        gb(ledger.total_size)
    )?;
    writeln!(
        out,
        "Available Space: {:7.2} GB",
        ledger.available_space as f64 / BYTES_PER_GB
    )?;
    if !ledger.pending_unsized.is_empty() {
        let ids: Vec<&str> = ledger.pending_unsized.iter().map(|id| id.as_str()).collect();
        writeln!(out, "! Leftover pieces without known size: {}", ids.join(", "))?;
    }
    writeln!(out)
}
