//! Property tests for period aggregation.

mod support;

use proptest::prelude::*;
use sn_core::aggregate::aggregate;
use sn_core::ledger::MAX_ESTIMATION_DELTA;
use std::collections::{BTreeMap, BTreeSet};
use std::io::Cursor;
use support::*;

#[derive(Debug, Clone)]
enum Op {
    Started(i64),
    Uploaded(Option<u64>),
    UploadFailed,
    UploadCanceled,
    Downloaded,
    DownloadFailed,
    DownloadCanceled,
    Deleted,
    Other,
}

#[derive(Debug, Default, PartialEq)]
struct Counts {
    up_fail: u64,
    up_cancel: u64,
    up_ok: u64,
    up_ok_size: u64,
    down_ok: u64,
    down_fail: u64,
    down_cancel: u64,
    del: u64,
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0i64..50_000_000).prop_map(Op::Started),
        proptest::option::of(0u64..5_000_000).prop_map(Op::Uploaded),
        Just(Op::UploadFailed),
        Just(Op::UploadCanceled),
        Just(Op::Downloaded),
        Just(Op::DownloadFailed),
        Just(Op::DownloadCanceled),
        Just(Op::Deleted),
        Just(Op::Other),
    ]
}

/// Sorted offsets within five days, each paired with an op on one of eight pieces.
fn log_strategy() -> impl Strategy<Value = Vec<(i64, Op, u8)>> {
    prop::collection::vec((0i64..5 * 86_400, op_strategy(), 0u8..8), 0..80).prop_map(|mut v| {
        v.sort_by_key(|(offset, _, _)| *offset);
        v
    })
}

fn render(entries: &[(i64, Op, u8)]) -> Vec<String> {
    entries
        .iter()
        .map(|(offset, op, piece)| {
            let ts = at(day_start(), *offset);
            let id = format!("piece{piece}");
            match op {
                Op::Started(space) => upload_started(ts, &id, *space),
                Op::Uploaded(size) => uploaded(ts, &id, *size),
                Op::UploadFailed => piecestore(ts, "upload failed", &id),
                Op::UploadCanceled => piecestore(ts, "upload canceled", &id),
                Op::Downloaded => piecestore(ts, "downloaded", &id),
                Op::DownloadFailed => piecestore(ts, "download failed", &id),
                Op::DownloadCanceled => piecestore(ts, "download canceled", &id),
                Op::Deleted => deleted(ts, &id),
                Op::Other => line(ts, "orders", "sending", "{}"),
            }
        })
        .collect()
}

/// Expected counts keyed by period index.
///
/// Upload completions are modelled with their own pending set and last
/// available-space reading: an unsized upload waits for the next upload
/// start, which either sizes every waiting piece at `delta / n` or drops
/// them all.
fn expected(entries: &[(i64, Op, u8)], days: i64) -> BTreeMap<i64, Counts> {
    let period = days * 86_400;
    let mut out: BTreeMap<i64, Counts> = BTreeMap::new();
    let mut pending: BTreeSet<u8> = BTreeSet::new();
    let mut available_space = 0i64;

    for (offset, op, piece) in entries {
        let t = at(day_start(), *offset).timestamp();
        let c = out.entry(t.div_euclid(period)).or_default();
        match op {
            Op::Started(space) => {
                let delta = available_space - space;
                available_space = *space;
                if !pending.is_empty() {
                    let n = pending.len() as u64;
                    if delta > 0 && delta < MAX_ESTIMATION_DELTA {
                        c.up_ok += n;
                        c.up_ok_size += (delta as u64 / n) * n;
                    }
                    pending.clear();
                }
            }
            Op::Uploaded(Some(size)) => {
                pending.remove(piece);
                c.up_ok += 1;
                c.up_ok_size += size;
            }
            Op::Uploaded(None) => {
                pending.insert(*piece);
            }
            Op::UploadFailed => c.up_fail += 1,
            Op::UploadCanceled => c.up_cancel += 1,
            Op::Downloaded => c.down_ok += 1,
            Op::DownloadFailed => c.down_fail += 1,
            Op::DownloadCanceled => c.down_cancel += 1,
            Op::Deleted => c.del += 1,
            Op::Other => {}
        }
    }
    out
}

proptest! {
    #[test]
    fn event_counts_match_input(entries in log_strategy(), days in 1i64..4) {
        let lines = render(&entries);
        let recs = records(&lines, days);
        let want = expected(&entries, days);

        prop_assert_eq!(recs.len(), want.len());
        for (rec, (index, c)) in recs.iter().zip(want.iter()) {
            prop_assert_eq!(rec.date.timestamp(), index * days * 86_400);
            prop_assert_eq!(rec.up_fail, c.up_fail);
            prop_assert_eq!(rec.up_cancel, c.up_cancel);
            prop_assert_eq!(rec.up_ok, c.up_ok);
            prop_assert_eq!(rec.up_ok_size, c.up_ok_size);
            prop_assert_eq!(rec.total_uploads(), c.up_ok + c.up_fail + c.up_cancel);
            prop_assert_eq!(rec.down_ok + rec.down_ok_unseen, c.down_ok);
            prop_assert_eq!(rec.down_fail + rec.down_fail_unseen, c.down_fail);
            prop_assert_eq!(rec.down_cancel + rec.down_cancel_unseen, c.down_cancel);
            prop_assert_eq!(rec.del_ok + rec.del_ok_unseen, c.del);
        }
    }

    #[test]
    fn aggregation_is_deterministic(entries in log_strategy(), days in 1i64..4) {
        let input = join(&render(&entries));
        let first = aggregate(Cursor::new(input.clone()), period(days)).unwrap();
        let second = aggregate(Cursor::new(input), period(days)).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn unknown_sizes_only_without_a_prior_upload(entries in log_strategy()) {
        // A download of a piece that was never uploaded with a size, and never
        // estimated, is always unseen.
        let only_downloads: Vec<(i64, Op, u8)> = entries
            .into_iter()
            .filter(|(_, op, _)| matches!(op, Op::Downloaded))
            .collect();
        let recs = records(&render(&only_downloads), 1);
        for rec in &recs {
            prop_assert_eq!(rec.down_ok, 0);
            prop_assert_eq!(rec.down_ok_size, 0);
        }
        let unseen: u64 = recs.iter().map(|r| r.down_ok_unseen).sum();
        prop_assert_eq!(unseen, only_downloads.len() as u64);
    }
}
