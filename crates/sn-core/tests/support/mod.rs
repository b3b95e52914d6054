//! Shared helpers for building storage-node log lines in tests.

#![allow(dead_code)]

use chrono::{DateTime, Duration, TimeZone, Utc};
use sn_config::PeriodLength;
use sn_core::{PeriodAggregator, PeriodRecord};
use std::io::Cursor;

/// 2023-01-02T00:00:00Z, the start of a day period.
pub fn day_start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2023, 1, 2, 0, 0, 0).unwrap()
}

pub fn at(base: DateTime<Utc>, secs: i64) -> DateTime<Utc> {
    base + Duration::seconds(secs)
}

pub fn line(ts: DateTime<Utc>, module: &str, kind: &str, payload: &str) -> String {
    format!(
        "{}\tINFO\t{}\t{}\t{}",
        ts.format("%Y-%m-%dT%H:%M:%S%.3fZ"),
        module,
        kind,
        payload
    )
}

pub fn uploaded(ts: DateTime<Utc>, id: &str, size: Option<u64>) -> String {
    let payload = match size {
        Some(size) => format!(r#"{{"Piece ID": "{}", "Size": {}, "Action": "PUT"}}"#, id, size),
        None => format!(r#"{{"Piece ID": "{}", "Action": "PUT"}}"#, id),
    };
    line(ts, "piecestore", "uploaded", &payload)
}

pub fn upload_started(ts: DateTime<Utc>, id: &str, available_space: i64) -> String {
    line(
        ts,
        "piecestore",
        "upload started",
        &format!(
            r#"{{"Piece ID": "{}", "Action": "PUT", "Available Space": {}}}"#,
            id, available_space
        ),
    )
}

pub fn piecestore(ts: DateTime<Utc>, kind: &str, id: &str) -> String {
    line(ts, "piecestore", kind, &format!(r#"{{"Piece ID": "{}"}}"#, id))
}

pub fn deleted(ts: DateTime<Utc>, id: &str) -> String {
    line(ts, "piecedeleter", "deleted", &format!(r#"{{"Piece ID": "{}"}}"#, id))
}

pub fn join(lines: &[String]) -> String {
    let mut out = lines.join("\n");
    out.push('\n');
    out
}

pub fn period(days: i64) -> PeriodLength {
    PeriodLength::from_days(days).unwrap()
}

/// Run a fresh aggregator over `lines`.
pub fn records(lines: &[String], days: i64) -> Vec<PeriodRecord> {
    PeriodAggregator::new(Cursor::new(join(lines)), period(days))
        .all_records()
        .unwrap()
}
