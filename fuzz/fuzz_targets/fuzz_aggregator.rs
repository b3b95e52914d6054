//! Fuzz target for period aggregation.
//!
//! Feeds structured-but-arbitrary log lines through the aggregator. Input
//! errors must be skipped; the only acceptable failure is an I/O error,
//! which an in-memory reader never produces.

#![no_main]

use arbitrary::Arbitrary;
use chrono::DateTime;
use libfuzzer_sys::fuzz_target;
use sn_config::PeriodLength;
use sn_core::PeriodAggregator;
use std::io::Cursor;

#[derive(Debug, Arbitrary)]
struct Entry {
    secs: u32,
    module: u8,
    kind: u8,
    piece: u8,
    size: Option<u32>,
    space: i64,
    raw: Option<String>,
}

#[derive(Debug, Arbitrary)]
struct Input {
    days: u8,
    entries: Vec<Entry>,
}

const MODULES: [&str; 3] = ["piecestore", "piecedeleter", "orders"];
const KINDS: [&str; 10] = [
    "upload started",
    "uploaded",
    "upload failed",
    "upload canceled",
    "download started",
    "downloaded",
    "download failed",
    "download canceled",
    "deleted",
    "delete failed",
];

fn render(entry: &Entry) -> String {
    if let Some(raw) = &entry.raw {
        return raw.clone();
    }
    let ts = 1_600_000_000i64 + i64::from(entry.secs);
    let date = DateTime::from_timestamp(ts, 0)
        .unwrap_or_default()
        .format("%Y-%m-%dT%H:%M:%S%.3fZ");
    let module = MODULES[usize::from(entry.module) % MODULES.len()];
    let kind = KINDS[usize::from(entry.kind) % KINDS.len()];
    let size = entry
        .size
        .map(|s| format!(", \"Size\": {}", s))
        .unwrap_or_default();
    format!(
        "{}\tINFO\t{}\t{}\t{{\"Piece ID\": \"p{}\", \"Available Space\": {}{}}}",
        date, module, kind, entry.piece, entry.space, size
    )
}

fuzz_target!(|input: Input| {
    let Ok(period) = PeriodLength::from_days(i64::from(input.days)) else {
        return;
    };
    let text: String = input
        .entries
        .iter()
        .map(|e| render(e) + "\n")
        .collect();

    let mut aggregator = PeriodAggregator::new(Cursor::new(text), period);
    let records = aggregator
        .all_records()
        .expect("in-memory input cannot fail to read");
    for record in &records {
        assert_eq!(record.date.timestamp() % period.seconds(), 0);
    }
});
