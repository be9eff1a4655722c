//! Property-based invariant tests.
//!
//! 1. A positioned collection stays sorted under any insert/remove sequence
//! 2. Equal positions keep insertion order
//! 3. Previous/next lookups agree with a linear scan
//! 4. Worker partitions cover `0..len` exactly once, in order
//! 5. Barline sentinels survive arbitrary edits

use proptest::prelude::*;
use scoreview::{partition, BarType, Barline, PositionedCollection, System, TempoMarker, END_POSITION};

// ── Strategies ──────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
enum Op {
    Insert(i32, u16),
    Remove(i32, u16),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => (0i32..40, 60u16..64).prop_map(|(p, bpm)| Op::Insert(p, bpm)),
        1 => (0i32..40, 60u16..64).prop_map(|(p, bpm)| Op::Remove(p, bpm)),
    ]
}

fn apply(collection: &mut PositionedCollection<TempoMarker>, op: &Op) {
    match op {
        Op::Insert(p, bpm) => collection.insert(TempoMarker::new(*p, *bpm)),
        Op::Remove(p, bpm) => {
            collection.remove(&TempoMarker::new(*p, *bpm));
        }
    }
}

fn positions(collection: &PositionedCollection<TempoMarker>) -> Vec<i32> {
    collection.iter().map(|m| m.position).collect()
}

// ── Properties ──────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn collection_stays_sorted(ops in prop::collection::vec(op_strategy(), 0..80)) {
        let mut collection = PositionedCollection::new();
        for op in &ops {
            apply(&mut collection, op);
            let p = positions(&collection);
            prop_assert!(p.windows(2).all(|w| w[0] <= w[1]), "unsorted after {:?}: {:?}", op, p);
        }
    }

    #[test]
    fn remove_deletes_every_equal_element(ops in prop::collection::vec(op_strategy(), 0..60), p in 0i32..40, bpm in 60u16..64) {
        let mut collection = PositionedCollection::new();
        for op in &ops {
            apply(&mut collection, op);
        }
        let target = TempoMarker::new(p, bpm);
        let before = collection.len();
        let removed = collection.remove(&target);
        prop_assert_eq!(collection.len(), before - removed);
        prop_assert!(!collection.contains(&target));
    }

    #[test]
    fn equal_positions_keep_insertion_order(bpms in prop::collection::vec(60u16..200, 1..20)) {
        let mut collection = PositionedCollection::new();
        collection.insert(TempoMarker::new(10, 1));
        for bpm in &bpms {
            collection.insert(TempoMarker::new(5, *bpm));
        }
        let got: Vec<u16> = collection.iter().take(bpms.len()).map(|m| m.beats_per_minute).collect();
        prop_assert_eq!(got, bpms);
    }

    #[test]
    fn lookups_match_linear_scan(ps in prop::collection::vec(0i32..100, 0..30), q in -5i32..105) {
        let collection: PositionedCollection<TempoMarker> =
            ps.iter().map(|p| TempoMarker::new(*p, 120)).collect();
        let expected_prev = ps.iter().copied().filter(|p| *p <= q).max();
        let expected_next = ps.iter().copied().filter(|p| *p >= q).min();
        prop_assert_eq!(collection.find_previous(q).map(|m| m.position), expected_prev);
        prop_assert_eq!(collection.find_next(q).map(|m| m.position), expected_next);
    }

    #[test]
    fn partition_covers_every_index_once(len in 0usize..500, workers in 0usize..64) {
        let ranges = partition(len, workers);
        if len == 0 {
            prop_assert!(ranges.is_empty());
        } else {
            prop_assert_eq!(ranges.len(), workers.clamp(1, len));
            prop_assert_eq!(ranges[0].start, 0);
            prop_assert_eq!(ranges.last().map(|r| r.end), Some(len));
            for pair in ranges.windows(2) {
                prop_assert_eq!(pair[0].end, pair[1].start);
            }
            prop_assert!(ranges.iter().all(|r| !r.is_empty()));
        }
    }

    #[test]
    fn sentinels_survive_barline_edits(ps in prop::collection::vec(1i32..64, 0..40)) {
        let mut system = System::new();
        for p in &ps {
            system.insert_barline(Barline::new(*p, BarType::Double));
        }
        for p in &ps {
            let _ = system.remove_barline(&Barline::new(*p, BarType::Double));
            let _ = system.remove_barline(&Barline::new(*p, BarType::Single));
        }
        prop_assert!(system.remove_barline(&Barline::default()).is_err());
        prop_assert!(system.remove_barline(&Barline::new(END_POSITION, BarType::Single)).is_err());
        let barlines = system.barlines();
        prop_assert_eq!(barlines.len(), 2);
        prop_assert_eq!(barlines[0].position, 0);
        prop_assert_eq!(barlines[1].position, END_POSITION);
    }
}
