//! Piece-size ledger.
//!
//! Downloads of a piece only log its ID, so the size comes from the upload
//! seen earlier in the log. The ledger remembers those sizes for the whole
//! run and forgets a piece when it is deleted.
//!
//! Some uploads are logged without a size. Those pieces wait in a pending
//! set until the next `upload started` line, whose `Available Space` is
//! compared with the previous reading: a plausible drop in free space is
//! split evenly across the pending pieces. An implausible one (negative,
//! zero, or at least [`MAX_ESTIMATION_DELTA`]) drops the pending pieces
//! without counting them.

use serde::{Deserialize, Serialize};
use sn_common::PieceId;
use std::collections::{BTreeSet, HashMap};

use crate::parse::{Event, LogEvent, Module};
use crate::record::PeriodRecord;

/// Exclusive upper bound on an available-space drop used for estimation.
pub const MAX_ESTIMATION_DELTA: i64 = 10_000_000;

/// What applying an event did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Disposition {
    /// The event updated the record or the ledger.
    Applied,
    /// Recognized module, unrecognized kind. Nothing changed.
    Unexpected { module: Module, kind: String },
    /// Untracked module. Nothing changed.
    Ignored,
}

/// Outcome of resolving pending pieces on an `upload started` event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Estimation {
    /// No pieces were pending.
    NothingPending,
    /// Every pending piece was assigned `size` and counted as uploaded.
    Assigned { pieces: usize, size: u64 },
    /// The delta was out of range; pending pieces were discarded uncounted.
    Dropped { pieces: usize, delta: i64 },
}

/// End-of-run snapshot of the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerSummary {
    /// Pieces with a known or estimated size still tracked.
    pub pieces: usize,
    /// Sum of their sizes in bytes.
    pub total_size: u64,
    /// Last reported available space in bytes.
    pub available_space: i64,
    /// Uploads whose size was never resolved, sorted.
    pub pending_unsized: Vec<PieceId>,
}

/// Cross-period store of piece sizes.
///
/// A piece ID is in at most one of `sizes` and `pending_unsized`.
#[derive(Debug, Clone, Default)]
pub struct PieceSizeLedger {
    sizes: HashMap<PieceId, u64>,
    pending_unsized: BTreeSet<PieceId>,
    available_space: i64,
}

impl PieceSizeLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one event, counting it into `record`.
    pub fn apply(&mut self, event: LogEvent, record: &mut PeriodRecord) -> Disposition {
        match event.event {
            Event::UploadStarted {
                available_space, ..
            } => {
                self.observe_available_space(available_space, record);
            }
            Event::Uploaded {
                piece_id,
                size: Some(size),
            } => {
                record.up_ok += 1;
                record.up_ok_size = record.up_ok_size.saturating_add(size);
                self.pending_unsized.remove(&piece_id);
                self.sizes.insert(piece_id, size);
            }
            Event::Uploaded {
                piece_id,
                size: None,
            } => {
                self.sizes.remove(&piece_id);
                self.pending_unsized.insert(piece_id);
            }
            Event::UploadFailed { .. } => record.up_fail += 1,
            Event::UploadCanceled { .. } => record.up_cancel += 1,
            Event::DownloadStarted { .. } => {}
            Event::Downloaded { piece_id } => {
                record.down_ok += 1;
                match self.sizes.get(&piece_id) {
                    Some(size) => {
                        record.down_ok_size = record.down_ok_size.saturating_add(*size);
                    }
                    None => record.down_ok_unseen += 1,
                }
            }
            Event::DownloadFailed { piece_id } => {
                record.down_fail += 1;
                match self.sizes.get(&piece_id) {
                    Some(size) => {
                        record.down_fail_size = record.down_fail_size.saturating_add(*size);
                    }
                    None => record.down_fail_unseen += 1,
                }
            }
            Event::DownloadCanceled { piece_id } => {
                record.down_cancel += 1;
                match self.sizes.get(&piece_id) {
                    Some(size) => {
                        record.down_cancel_size = record.down_cancel_size.saturating_add(*size);
                    }
                    None => record.down_cancel_unseen += 1,
                }
            }
            Event::Deleted { piece_id } | Event::DeleteFailed { piece_id } => {
                record.del_ok += 1;
                match self.sizes.remove(&piece_id) {
                    Some(size) => {
                        record.del_ok_size = record.del_ok_size.saturating_add(size);
                    }
                    None => record.del_ok_unseen += 1,
                }
            }
            Event::Unexpected => {
                return Disposition::Unexpected {
                    module: event.module,
                    kind: event.kind,
                }
            }
            Event::Ignored => return Disposition::Ignored,
        }
        Disposition::Applied
    }

    /// Record a new available-space reading and resolve pending uploads.
    pub fn observe_available_space(
        &mut self,
        available_space: i64,
        record: &mut PeriodRecord,
    ) -> Estimation {
        let delta = self.available_space.saturating_sub(available_space);
        self.available_space = available_space;

        let pieces = self.pending_unsized.len();
        if pieces == 0 {
            return Estimation::NothingPending;
        }
        let pending = std::mem::take(&mut self.pending_unsized);

        if delta <= 0 || delta >= MAX_ESTIMATION_DELTA {
            tracing::debug!(
                delta,
                pieces,
                "unrealistic available space delta, dropping pending uploads"
            );
            return Estimation::Dropped { pieces, delta };
        }

        // 0 < delta < MAX_ESTIMATION_DELTA, so the cast is lossless.
        let size = delta as u64 / pieces as u64;
        for piece_id in pending {
            record.up_ok += 1;
            record.up_ok_size = record.up_ok_size.saturating_add(size);
            self.sizes.insert(piece_id, size);
        }
        tracing::trace!(pieces, size, "estimated upload sizes from available space");
        Estimation::Assigned { pieces, size }
    }

    pub fn size_of(&self, piece_id: &str) -> Option<u64> {
        self.sizes.get(piece_id).copied()
    }

    pub fn is_pending(&self, piece_id: &str) -> bool {
        self.pending_unsized.contains(piece_id)
    }

    pub fn pending(&self) -> impl Iterator<Item = &PieceId> {
        self.pending_unsized.iter()
    }

    pub fn available_space(&self) -> i64 {
        self.available_space
    }

    /// Number of pieces with a known size.
    pub fn len(&self) -> usize {
        self.sizes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sizes.is_empty()
    }

    /// Sum of known sizes, saturating at `u64::MAX`.
    pub fn total_size(&self) -> u64 {
        self.sizes
            .values()
            .fold(0u64, |total, size| total.saturating_add(*size))
    }

    pub fn summary(&self) -> LedgerSummary {
        LedgerSummary {
            pieces: self.sizes.len(),
            total_size: self.total_size(),
            available_space: self.available_space,
            pending_unsized: self.pending_unsized.iter().cloned().collect(),
        }
    }
}
