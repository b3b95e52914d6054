//! Period aggregation.
//!
//! Lines are consumed in order. The first line of a record fixes its period
//! `(k·P, (k+1)·P]`; the first line at or past the upper bound is pushed back
//! and starts the next record. Lines are never reordered, so a late line
//! (timestamp before the current period) is counted in the current period.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sn_common::Error;
use sn_config::PeriodLength;
use std::io::BufRead;
use tracing::{debug, info, warn};

use crate::ledger::{Disposition, LedgerSummary, PieceSizeLedger};
use crate::logging::{event_names, truncate_for_log};
use crate::parse::LogLine;
use crate::reader::{PushbackReader, ReaderError};
use crate::record::PeriodRecord;

/// Longest prefix of an offending line included in a diagnostic.
const MAX_LOGGED_LINE: usize = 512;

/// Counters describing how the input was consumed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateStats {
    /// Non-empty lines read.
    pub lines: u64,
    /// Lines skipped because they could not be parsed.
    pub malformed: u64,
    /// Lines of a tracked module with an unknown event kind.
    pub unexpected: u64,
    /// Lines of untracked modules.
    pub ignored: u64,
    /// Records emitted.
    pub records: u64,
}

/// Everything a run produces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub period_days: u32,
    pub records: Vec<PeriodRecord>,
    pub ledger: LedgerSummary,
    pub stats: AggregateStats,
}

/// Drives lines through the parser into one record per period.
pub struct PeriodAggregator<R> {
    reader: PushbackReader<R>,
    period: PeriodLength,
    ledger: PieceSizeLedger,
    stats: AggregateStats,
}

impl<R: BufRead> PeriodAggregator<R> {
    pub fn new(source: R, period: PeriodLength) -> Self {
        Self::with_reader(PushbackReader::new(source), period)
    }

    pub fn with_reader(reader: PushbackReader<R>, period: PeriodLength) -> Self {
        Self {
            reader,
            period,
            ledger: PieceSizeLedger::new(),
            stats: AggregateStats::default(),
        }
    }

    /// Read the next complete period.
    ///
    /// Returns `Ok(None)` once the input is exhausted. End of input is checked
    /// before a record is started, so empty input yields no record.
    pub fn next_record(&mut self) -> Result<Option<PeriodRecord>, ReaderError> {
        if self.reader.at_end()? {
            return Ok(None);
        }
        let record = self.read_period()?;
        if record.is_some() {
            self.stats.records += 1;
        }
        Ok(record)
    }

    /// Read every remaining period, in order.
    pub fn all_records(&mut self) -> Result<Vec<PeriodRecord>, ReaderError> {
        let mut records = Vec::new();
        while let Some(record) = self.next_record()? {
            debug!(
                event = event_names::PERIOD_CLOSED,
                index = records.len(),
                date = %record.date.format("%Y-%m-%d"),
                "Record {}",
                records.len()
            );
            records.push(record);
        }
        Ok(records)
    }

    fn read_period(&mut self) -> Result<Option<PeriodRecord>, ReaderError> {
        let period = self.period.seconds();
        let mut boundary: Option<i64> = None;
        let mut record = PeriodRecord::default();

        while let Some(line) = self.reader.next_line()? {
            let parsed = match LogLine::parse(&line) {
                Ok(parsed) => parsed,
                Err(err) => {
                    self.skip_line(&line, &err.into());
                    continue;
                }
            };

            let t = parsed.timestamp.timestamp();
            match boundary {
                None => boundary = Some((t.div_euclid(period) + 1) * period),
                Some(end) if t >= end => {
                    self.reader.push_back()?;
                    break;
                }
                Some(_) => {}
            }

            let event = match parsed.event() {
                Ok(event) => event,
                Err(err) => {
                    self.skip_line(&line, &err.into());
                    continue;
                }
            };

            match self.ledger.apply(event, &mut record) {
                Disposition::Applied => {}
                Disposition::Unexpected { module, kind } => {
                    let err = Error::UnexpectedEvent {
                        module: module.to_string(),
                        kind,
                    };
                    self.skip_line(&line, &err);
                }
                Disposition::Ignored => self.stats.ignored += 1,
            }
        }

        self.stats.lines = self.reader.lines_read();
        Ok(boundary.map(|end| record.finalize(period_start(end - period))))
    }

    /// Count and report a line that contributed nothing to the record.
    fn skip_line(&mut self, line: &str, err: &Error) {
        let line = truncate_for_log(line, MAX_LOGGED_LINE);
        if let Error::UnexpectedEvent { .. } = err {
            self.stats.unexpected += 1;
            warn!(
                event = event_names::UNEXPECTED_EVENT,
                code = err.code(),
                recoverable = err.is_recoverable(),
                line = %line,
                error = %err,
                "Unexpected line"
            );
        } else {
            self.stats.malformed += 1;
            warn!(
                event = event_names::BAD_LINE,
                code = err.code(),
                recoverable = err.is_recoverable(),
                line = %line,
                error = %err,
                "Bad line"
            );
        }
    }

    pub fn ledger(&self) -> &PieceSizeLedger {
        &self.ledger
    }

    /// Snapshot of the ledger as it stands now.
    pub fn summary(&self) -> LedgerSummary {
        self.ledger.summary()
    }

    pub fn stats(&self) -> AggregateStats {
        self.stats
    }

    pub fn period(&self) -> PeriodLength {
        self.period
    }

    /// Consume the aggregator, returning the ledger and counters.
    pub fn into_parts(self) -> (PieceSizeLedger, AggregateStats) {
        (self.ledger, self.stats)
    }
}

/// Start instant of a period, clamped to chrono's earliest representable
/// instant for periods that begin before it.
fn period_start(secs: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(secs, 0).unwrap_or(DateTime::<Utc>::MIN_UTC)
}

/// Aggregate a whole input stream.
///
/// Logs a completion notice and, if any uploads were never sized, one
/// warning listing them.
pub fn aggregate<R: BufRead>(source: R, period: PeriodLength) -> Result<RunSummary, ReaderError> {
    let mut aggregator = PeriodAggregator::new(source, period);
    let records = aggregator.all_records()?;
    let (ledger, stats) = aggregator.into_parts();

    info!(
        event = event_names::RUN_COMPLETED,
        records = stats.records,
        lines = stats.lines,
        malformed = stats.malformed,
        unexpected = stats.unexpected,
        "Completed"
    );

    let summary = ledger.summary();
    if !summary.pending_unsized.is_empty() {
        let ids: Vec<&str> = summary.pending_unsized.iter().map(|id| id.as_str()).collect();
        warn!(
            event = event_names::LEFTOVER_PIECES,
            count = ids.len(),
            pieces = ?ids,
            "Leftover pieces without known size"
        );
    }

    Ok(RunSummary {
        period_days: period.days(),
        records,
        ledger: summary,
        stats,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const DAY: i64 = 86_400;

    fn days(n: i64) -> PeriodLength {
        PeriodLength::from_days(n).unwrap()
    }

    fn run(input: &str, period: PeriodLength) -> Vec<PeriodRecord> {
        PeriodAggregator::new(Cursor::new(input.to_string()), period)
            .all_records()
            .unwrap()
    }

    #[test]
    fn test_empty_input_yields_no_records() {
        assert!(run("", days(1)).is_empty());
        assert!(run("\n\n\n", days(1)).is_empty());
    }

    #[test]
    fn test_boundary_splits_records() {
        let input = "\
2023-01-01T23:59:59.999Z\tINFO\tpiecestore\tupload failed\t{\"Piece ID\": \"A\"}
2023-01-02T00:00:00.000Z\tINFO\tpiecestore\tupload failed\t{\"Piece ID\": \"B\"}
2023-01-02T12:00:00.000Z\tINFO\tpiecestore\tupload canceled\t{\"Piece ID\": \"C\"}
";
        let records = run(input, days(1));
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].date.timestamp(), 1_672_531_200);
        assert_eq!(records[0].up_fail, 1);
        assert_eq!(records[1].date.timestamp(), 1_672_531_200 + DAY);
        assert_eq!(records[1].up_fail, 1);
        assert_eq!(records[1].up_cancel, 1);
    }

    #[test]
    fn test_gap_does_not_create_empty_records() {
        let input = "\
2023-01-01T10:00:00.000Z\tINFO\tpiecestore\tupload failed\t{\"Piece ID\": \"A\"}
2023-01-05T10:00:00.000Z\tINFO\tpiecestore\tupload failed\t{\"Piece ID\": \"B\"}
";
        let records = run(input, days(1));
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].date.timestamp() - records[0].date.timestamp(), 4 * DAY);
    }

    #[test]
    fn test_multi_day_period_alignment() {
        // 1970-01-01 is the epoch; 7-day periods start on multiples of 7 days.
        let input = "2023-01-04T10:00:00.000Z\tINFO\torders\tsent\t{}\n";
        let records = run(input, days(7));
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].date.timestamp() % (7 * DAY), 0);
        assert!(records[0].is_empty());
    }

    #[test]
    fn test_malformed_lines_skipped() {
        let input = "\
garbage
2023-01-01T10:00:00.000Z\tINFO\tpiecestore\tuploaded\tnot-json
2023-01-01T10:00:01.000Z\tINFO\tpiecestore\tuploaded\t{\"Piece ID\": \"A\", \"Size\": 5}
";
        let mut agg = PeriodAggregator::new(Cursor::new(input), days(1));
        let records = agg.all_records().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].up_ok, 1);
        assert_eq!(agg.stats().malformed, 2);
        assert_eq!(agg.stats().lines, 3);
    }

    #[test]
    fn test_only_unparseable_timestamps_yield_no_record() {
        let records = run("x\ty\tz\n", days(1));
        assert!(records.is_empty());
    }

    #[test]
    fn test_unexpected_and_ignored_counted() {
        let input = "\
2023-01-01T10:00:00.000Z\tINFO\tpiecestore\tupload rejected\t{}
2023-01-01T10:00:01.000Z\tINFO\tcollector\tdeleted\t{\"Piece ID\": \"A\"}
";
        let mut agg = PeriodAggregator::new(Cursor::new(input), days(1));
        let records = agg.all_records().unwrap();
        assert_eq!(records.len(), 1);
        assert!(records[0].is_empty());
        assert_eq!(agg.stats().unexpected, 1);
        assert_eq!(agg.stats().ignored, 1);
    }

    #[test]
    fn test_next_record_after_end() {
        let mut agg = PeriodAggregator::new(
            Cursor::new("2023-01-01T10:00:00.000Z\tINFO\tx\ty\t{}\n"),
            days(1),
        );
        assert!(agg.next_record().unwrap().is_some());
        assert!(agg.next_record().unwrap().is_none());
        assert!(agg.next_record().unwrap().is_none());
        assert_eq!(agg.stats().records, 1);
        assert_eq!(agg.summary().pieces, 0);
    }

    #[test]
    fn test_period_start_clamps_to_earliest_instant() {
        assert_eq!(period_start(7 * DAY).timestamp(), 7 * DAY);
        assert_eq!(period_start(i64::MIN), DateTime::<Utc>::MIN_UTC);
    }

    #[test]
    fn test_aggregate_summary() {
        let input = "\
2023-01-01T10:00:00.000Z\tINFO\tpiecestore\tuploaded\t{\"Piece ID\": \"A\", \"Size\": 5}
2023-01-01T10:00:00.000Z\tINFO\tpiecestore\tuploaded\t{\"Piece ID\": \"B\"}
";
        let summary = aggregate(Cursor::new(input), days(1)).unwrap();
        assert_eq!(summary.period_days, 1);
        assert_eq!(summary.records.len(), 1);
        assert_eq!(summary.ledger.pieces, 1);
        assert_eq!(summary.ledger.total_size, 5);
        assert_eq!(summary.ledger.pending_unsized.len(), 1);
    }
}
