//! Per-period statistics record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Statistics for one period.
///
/// While a period is open, the download and delete primary counts include
/// events of unknown size. [`PeriodRecord::finalize`] subtracts the unseen
/// sub-counts so that an emitted record reads: `down_ok` known-size
/// downloads, `down_ok_unseen` downloads of unknown size, and so on.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodRecord {
    /// Start of the period (UTC).
    pub date: DateTime<Utc>,

    pub up_ok: u64,
    pub up_ok_size: u64,
    pub up_fail: u64,
    pub up_cancel: u64,

    pub down_ok: u64,
    pub down_ok_size: u64,
    pub down_ok_unseen: u64,
    pub down_fail: u64,
    pub down_fail_size: u64,
    pub down_fail_unseen: u64,
    pub down_cancel: u64,
    pub down_cancel_size: u64,
    pub down_cancel_unseen: u64,

    pub del_ok: u64,
    pub del_ok_size: u64,
    pub del_ok_unseen: u64,
}

impl PeriodRecord {
    /// Close the record: stamp the period start and split off unseen counts.
    pub(crate) fn finalize(mut self, start: DateTime<Utc>) -> Self {
        self.date = start;
        self.down_ok -= self.down_ok_unseen;
        self.down_fail -= self.down_fail_unseen;
        self.down_cancel -= self.down_cancel_unseen;
        self.del_ok -= self.del_ok_unseen;
        self
    }

    pub fn total_uploads(&self) -> u64 {
        self.up_ok + self.up_fail + self.up_cancel
    }

    /// All download events, known and unseen.
    pub fn total_downloads(&self) -> u64 {
        self.down_ok
            + self.down_ok_unseen
            + self.down_fail
            + self.down_fail_unseen
            + self.down_cancel
            + self.down_cancel_unseen
    }

    /// Bytes across all download outcomes, saturating at `u64::MAX`.
    pub fn total_download_size(&self) -> u64 {
        self.down_ok_size
            .saturating_add(self.down_fail_size)
            .saturating_add(self.down_cancel_size)
    }

    pub fn total_deletes(&self) -> u64 {
        self.del_ok + self.del_ok_unseen
    }

    /// True when no event was counted in this period.
    pub fn is_empty(&self) -> bool {
        self.total_uploads() == 0 && self.total_downloads() == 0 && self.total_deletes() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_finalize_splits_unseen() {
        let open = PeriodRecord {
            down_ok: 5,
            down_ok_unseen: 2,
            down_fail: 3,
            down_fail_unseen: 3,
            down_cancel: 1,
            del_ok: 4,
            del_ok_unseen: 1,
            ..Default::default()
        };
        let start = Utc.with_ymd_and_hms(2023, 1, 2, 0, 0, 0).unwrap();
        let rec = open.finalize(start);

        assert_eq!(rec.date, start);
        assert_eq!(rec.down_ok, 3);
        assert_eq!(rec.down_fail, 0);
        assert_eq!(rec.down_cancel, 1);
        assert_eq!(rec.del_ok, 3);
        assert_eq!(rec.total_downloads(), 9);
        assert_eq!(rec.total_deletes(), 4);
    }

    #[test]
    fn test_total_download_size_saturates() {
        let rec = PeriodRecord {
            down_ok_size: u64::MAX,
            down_fail_size: 1,
            down_cancel_size: 1,
            ..Default::default()
        };
        assert_eq!(rec.total_download_size(), u64::MAX);
    }

    #[test]
    fn test_default_record_is_empty() {
        let rec = PeriodRecord::default();
        assert!(rec.is_empty());
        assert_eq!(rec.total_download_size(), 0);
    }

    #[test]
    fn test_serializes_field_names() {
        let rec = PeriodRecord {
            up_ok: 1,
            up_ok_size: 1000,
            ..Default::default()
        };
        let json = serde_json::to_value(&rec).unwrap();
        assert_eq!(json["up_ok"], 1);
        assert_eq!(json["up_ok_size"], 1000);
        assert_eq!(json["date"], "1970-01-01T00:00:00Z");
    }
}
