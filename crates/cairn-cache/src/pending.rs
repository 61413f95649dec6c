//! The pending-feature cache: per-slot deferred-judgment state.
//!
//! [`PendingFeatureCache`] tracks, for every participating dataset slot,
//! which features are already known to be correct and which are
//! suspicious — locally inconclusive, awaiting evidence from tiles not
//! yet processed. At each tile completion the driver calls
//! [`report_errors`](PendingFeatureCache::report_errors); records whose
//! extent is now provably covered are handed to the rule's report
//! callback exactly once and evicted, the rest stay parked.
//!
//! Memory is bounded by the number of currently-suspicious features, not
//! by dataset size — that bound is the cache's entire purpose.
//!
//! One cache instance belongs to exactly one verification run and is
//! torn down with it. The per-slot maps are plain mutable state guarded
//! by `&mut self`; concurrent external mutation is unsupported (the
//! driver is strictly tile-sequential and single-threaded).

use std::fmt;

use cairn_core::{Envelope, Feature, FeatureId, PendingRecord, TableSlot};
use indexmap::{IndexMap, IndexSet};
use smallvec::SmallVec;

use crate::coverage;

/// Per-run store of known-OK features and deferred suspicion records.
///
/// Generic over the rule-supplied record type `R`: every rule that
/// defers judgments defines its own payload (search extents, candidate
/// counts, partial measurements) and passes a factory closure to
/// [`flag_suspicious`](Self::flag_suspicious). The cache never inspects
/// the payload beyond the [`PendingRecord`] identity and extent.
///
/// State is partitioned first by [`TableSlot`]; the same numeric
/// [`FeatureId`] in two different slots is two unrelated features.
///
/// # Invariants
///
/// - A `(slot, id)` pair is in at most one of {known-OK set, pending map}.
/// - A resolved record is evicted from the pending map, the retained
///   side store, and the known-OK set in the same call that reports it,
///   so no feature is ever reported twice.
/// - [`flag_ok`](Self::flag_ok) after a suspicion removes the pending
///   record unconditionally.
pub struct PendingFeatureCache<R> {
    slots: IndexMap<TableSlot, SlotState<R>>,
}

struct SlotState<R> {
    known_ok: IndexSet<FeatureId>,
    pending: IndexMap<FeatureId, R>,
    /// Live copies of features whose source cannot re-fetch by id alone.
    retained: IndexMap<FeatureId, Box<dyn Feature>>,
}

impl<R> SlotState<R> {
    fn new() -> Self {
        Self {
            known_ok: IndexSet::new(),
            pending: IndexMap::new(),
            retained: IndexMap::new(),
        }
    }
}

impl<R: PendingRecord> PendingFeatureCache<R> {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self {
            slots: IndexMap::new(),
        }
    }

    /// Mark a feature as known to be correct.
    ///
    /// Removes any pending record and retained copy for `(slot, id)` and
    /// adds the id to the slot's known-OK set. Idempotent; a no-op
    /// beyond the set insert if the feature was never suspicious.
    pub fn flag_ok(&mut self, slot: TableSlot, id: FeatureId) {
        let state = self.slots.entry(slot).or_insert_with(SlotState::new);
        state.pending.swap_remove(&id);
        state.retained.swap_remove(&id);
        state.known_ok.insert(id);
    }

    /// Whether `(slot, id)` is already known to be correct. O(1).
    ///
    /// Rules consult this before re-evaluating a feature a later tile
    /// re-surfaces.
    pub fn is_known_ok(&self, slot: TableSlot, id: FeatureId) -> bool {
        self.slots
            .get(&slot)
            .is_some_and(|s| s.known_ok.contains(&id))
    }

    /// Park a feature whose local check was inconclusive.
    ///
    /// If a record for the feature's id already exists in `slot`, it is
    /// returned unchanged — the extent and payload captured at first
    /// suspicion stand. Otherwise `make` constructs the rule's record
    /// from the feature, the record is inserted, and — if the feature's
    /// source exposes the identity-caching capability
    /// ([`Feature::retained_copy`]) — the live copy is registered in the
    /// slot's side store for later retrieval by id.
    ///
    /// A suspicion on a known-OK id clears the OK mark: the rule saw new
    /// evidence, and the one-of-two invariant must hold.
    ///
    /// # Panics
    ///
    /// Panics if the factory produces a record whose id differs from the
    /// feature's. That is a defect in the calling rule, not a runtime
    /// condition.
    pub fn flag_suspicious<F>(&mut self, slot: TableSlot, feature: &dyn Feature, make: F) -> &R
    where
        F: FnOnce(&dyn Feature) -> R,
    {
        let state = self.slots.entry(slot).or_insert_with(SlotState::new);
        let id = feature.feature_id();
        if !state.pending.contains_key(&id) {
            let record = make(feature);
            assert_eq!(
                record.feature_id(),
                id,
                "pending record id does not match feature id in slot {slot}"
            );
            state.known_ok.swap_remove(&id);
            if let Some(copy) = feature.retained_copy() {
                state.retained.insert(id, copy);
            }
            state.pending.insert(id, record);
        }
        &state.pending[&id]
    }

    /// Look up a retained live feature by id.
    ///
    /// Only features whose source reported the identity-caching
    /// capability at [`flag_suspicious`](Self::flag_suspicious) time are
    /// present.
    pub fn retained(&self, slot: TableSlot, id: FeatureId) -> Option<&dyn Feature> {
        self.slots
            .get(&slot)
            .and_then(|s| s.retained.get(&id))
            .map(|boxed| boxed.as_ref())
    }

    /// Resolve and report every record that is now fully checked.
    ///
    /// For each slot holding pending records, partitions them with the
    /// [coverage test](crate::coverage::is_fully_checked) under
    /// `tile_envelope` (the area guaranteed fully processed so far) and
    /// `run_envelope` (the bound of the whole run, when known). For each
    /// slot with resolved records, `report(slot, &resolved)` runs exactly
    /// once and its returned issue count is accumulated. Resolved ids
    /// are evicted from the pending map, the retained side store, and
    /// the known-OK set; undetermined records stay untouched for a
    /// future call.
    ///
    /// Called once per completed tile. Repeated calls are idempotent
    /// with respect to already-resolved ids — they no longer exist, so
    /// they cannot report again. Slot order and record order within a
    /// slot are insertion order, so reporting is deterministic.
    pub fn report_errors<F>(
        &mut self,
        tile_envelope: &Envelope,
        run_envelope: Option<&Envelope>,
        mut report: F,
    ) -> usize
    where
        F: FnMut(TableSlot, &[R]) -> usize,
    {
        let mut total = 0;
        for (&slot, state) in self.slots.iter_mut() {
            if state.pending.is_empty() {
                continue;
            }

            // Move the whole map out and reinsert the undetermined
            // records; order is preserved and resolved records are gone
            // from the cache before the callback can observe anything.
            let drained = std::mem::take(&mut state.pending);
            let mut resolved: Vec<R> = Vec::new();
            for (id, record) in drained {
                if coverage::is_fully_checked(record.extent(), tile_envelope, run_envelope) {
                    resolved.push(record);
                } else {
                    state.pending.insert(id, record);
                }
            }
            if resolved.is_empty() {
                continue;
            }

            total += report(slot, &resolved);

            let ids: SmallVec<[FeatureId; 16]> =
                resolved.iter().map(|r| r.feature_id()).collect();
            for id in &ids {
                state.retained.swap_remove(id);
                state.known_ok.swap_remove(id);
            }
        }
        total
    }

    /// Total number of pending records across all slots.
    pub fn pending_count(&self) -> usize {
        self.slots.values().map(|s| s.pending.len()).sum()
    }

    /// Number of pending records in one slot.
    pub fn pending_in(&self, slot: TableSlot) -> usize {
        self.slots.get(&slot).map_or(0, |s| s.pending.len())
    }

    /// Total number of known-OK ids across all slots.
    pub fn known_ok_count(&self) -> usize {
        self.slots.values().map(|s| s.known_ok.len()).sum()
    }

    /// Whether any record is still awaiting judgment.
    pub fn has_pending(&self) -> bool {
        self.slots.values().any(|s| !s.pending.is_empty())
    }

    /// Drop all state: pending records, retained copies, known-OK sets.
    ///
    /// Used on cancellation; discarded pending records were never
    /// judged, and the caller must surface that as incomplete.
    pub fn clear(&mut self) {
        self.slots.clear();
    }
}

impl<R: PendingRecord> Default for PendingFeatureCache<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> fmt::Debug for PendingFeatureCache<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for (slot, state) in &self.slots {
            map.entry(
                slot,
                &format_args!(
                    "{} pending, {} known-ok, {} retained",
                    state.pending.len(),
                    state.known_ok.len(),
                    state.retained.len()
                ),
            );
        }
        map.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cairn_test_utils::{env, MockFeature};

    const SLOT_0: TableSlot = TableSlot(0);
    const SLOT_1: TableSlot = TableSlot(1);

    /// Minimal record: identity plus captured extent.
    struct TestRecord {
        id: FeatureId,
        extent: Envelope,
    }

    impl PendingRecord for TestRecord {
        fn feature_id(&self) -> FeatureId {
            self.id
        }

        fn extent(&self) -> &Envelope {
            &self.extent
        }
    }

    fn record(feature: &dyn Feature) -> TestRecord {
        TestRecord {
            id: feature.feature_id(),
            extent: feature.extent(),
        }
    }

    fn cache() -> PendingFeatureCache<TestRecord> {
        PendingFeatureCache::new()
    }

    /// Collect every reported (slot, id) pair and count one issue per record.
    fn collect<'a>(
        sink: &'a mut Vec<(TableSlot, FeatureId)>,
    ) -> impl FnMut(TableSlot, &[TestRecord]) -> usize + 'a {
        move |slot, records| {
            for r in records {
                sink.push((slot, r.feature_id()));
            }
            records.len()
        }
    }

    // ── flag_ok / is_known_ok ───────────────────────────────────

    #[test]
    fn flag_ok_is_idempotent() {
        let mut c = cache();
        c.flag_ok(SLOT_0, FeatureId(1));
        c.flag_ok(SLOT_0, FeatureId(1));
        assert!(c.is_known_ok(SLOT_0, FeatureId(1)));
        assert_eq!(c.known_ok_count(), 1);
    }

    #[test]
    fn flag_ok_removes_pending_record_unconditionally() {
        let mut c = cache();
        let f = MockFeature::new(2, env(0.0, 0.0, 10.0, 10.0));
        c.flag_suspicious(SLOT_0, &f, record);
        assert_eq!(c.pending_in(SLOT_0), 1);

        c.flag_ok(SLOT_0, FeatureId(2));
        assert_eq!(c.pending_in(SLOT_0), 0);
        assert!(c.is_known_ok(SLOT_0, FeatureId(2)));
    }

    #[test]
    fn slots_do_not_share_identity_space() {
        let mut c = cache();
        let f = MockFeature::new(7, env(0.0, 0.0, 1.0, 1.0));
        c.flag_suspicious(SLOT_1, &f, record);

        // Scenario D: OK-flagging slot 0's id 7 must not touch slot 1's.
        c.flag_ok(SLOT_0, FeatureId(7));
        assert!(c.is_known_ok(SLOT_0, FeatureId(7)));
        assert!(!c.is_known_ok(SLOT_1, FeatureId(7)));
        assert_eq!(c.pending_in(SLOT_1), 1);
    }

    // ── flag_suspicious ─────────────────────────────────────────

    #[test]
    fn flag_suspicious_returns_existing_record_unchanged() {
        let mut c = cache();
        let f = MockFeature::new(3, env(0.0, 0.0, 5.0, 5.0));
        c.flag_suspicious(SLOT_0, &f, record);

        // Second sighting with a different extent: first capture stands.
        let moved = MockFeature::new(3, env(100.0, 100.0, 105.0, 105.0));
        let r = c.flag_suspicious(SLOT_0, &moved, record);
        assert_eq!(*r.extent(), env(0.0, 0.0, 5.0, 5.0));
        assert_eq!(c.pending_in(SLOT_0), 1);
    }

    #[test]
    fn flag_suspicious_clears_known_ok_mark() {
        let mut c = cache();
        c.flag_ok(SLOT_0, FeatureId(4));
        let f = MockFeature::new(4, env(0.0, 0.0, 1.0, 1.0));
        c.flag_suspicious(SLOT_0, &f, record);

        assert!(!c.is_known_ok(SLOT_0, FeatureId(4)));
        assert_eq!(c.pending_in(SLOT_0), 1);
    }

    #[test]
    fn retained_copy_registered_only_with_capability() {
        let mut c = cache();
        let plain = MockFeature::new(5, env(0.0, 0.0, 1.0, 1.0));
        let virtual_row = MockFeature::retained(6, env(2.0, 2.0, 3.0, 3.0));
        c.flag_suspicious(SLOT_0, &plain, record);
        c.flag_suspicious(SLOT_0, &virtual_row, record);

        assert!(c.retained(SLOT_0, FeatureId(5)).is_none());
        let held = c.retained(SLOT_0, FeatureId(6)).unwrap();
        assert_eq!(held.feature_id(), FeatureId(6));
        assert_eq!(held.extent(), env(2.0, 2.0, 3.0, 3.0));
    }

    #[test]
    #[should_panic(expected = "does not match feature id")]
    fn mismatched_record_id_panics() {
        let mut c = cache();
        let f = MockFeature::new(8, env(0.0, 0.0, 1.0, 1.0));
        c.flag_suspicious(SLOT_0, &f, |_| TestRecord {
            id: FeatureId(9),
            extent: env(0.0, 0.0, 1.0, 1.0),
        });
    }

    // ── report_errors ───────────────────────────────────────────

    #[test]
    fn unresolved_record_stays_pending_then_reports_once() {
        // Scenario A: deferred while the tile envelope is too small,
        // resolved exactly once when coverage grows.
        let mut c = cache();
        let f1 = MockFeature::new(1, env(0.0, 0.0, 10.0, 10.0));
        c.flag_suspicious(SLOT_0, &f1, record);

        let run = env(0.0, 0.0, 100.0, 100.0);
        let mut reported = Vec::new();

        let n = c.report_errors(&env(0.0, 0.0, 5.0, 20.0), Some(&run), collect(&mut reported));
        assert_eq!(n, 0);
        assert!(reported.is_empty());
        assert_eq!(c.pending_in(SLOT_0), 1);

        let n = c.report_errors(&env(0.0, 0.0, 20.0, 20.0), Some(&run), collect(&mut reported));
        assert_eq!(n, 1);
        assert_eq!(reported, vec![(SLOT_0, FeatureId(1))]);
        assert_eq!(c.pending_in(SLOT_0), 0);

        // A later, larger tile must not re-report the evicted id.
        let n = c.report_errors(&env(0.0, 0.0, 50.0, 50.0), Some(&run), collect(&mut reported));
        assert_eq!(n, 0);
        assert_eq!(reported.len(), 1);
    }

    #[test]
    fn ok_flagged_feature_is_never_reported() {
        // Scenario B: suspicious in one tile, OK in the next.
        let mut c = cache();
        let f2 = MockFeature::new(2, env(0.0, 0.0, 10.0, 10.0));
        c.flag_suspicious(SLOT_0, &f2, record);
        c.flag_ok(SLOT_0, FeatureId(2));

        let mut reported = Vec::new();
        let run = env(0.0, 0.0, 100.0, 100.0);
        let n = c.report_errors(&run, Some(&run), collect(&mut reported));
        assert_eq!(n, 0);
        assert!(reported.is_empty());
    }

    #[test]
    fn clipped_extent_resolves_at_run_boundary() {
        // Scenario C: raw extent exceeds the tile, but the dataset never
        // extends past the run envelope.
        let mut c = cache();
        let f3 = MockFeature::new(3, env(90.0, 90.0, 95.0, 95.0));
        c.flag_suspicious(SLOT_0, &f3, record);

        let run = env(0.0, 0.0, 92.0, 92.0);
        let mut reported = Vec::new();
        let n = c.report_errors(&env(0.0, 0.0, 92.0, 92.0), Some(&run), collect(&mut reported));
        assert_eq!(n, 1);
        assert_eq!(reported, vec![(SLOT_0, FeatureId(3))]);
    }

    #[test]
    fn report_callback_runs_once_per_slot_with_resolved_records() {
        let mut c = cache();
        for id in 0..4u64 {
            let f = MockFeature::new(id, env(0.0, 0.0, 1.0, 1.0));
            c.flag_suspicious(SLOT_0, &f, record);
        }
        let far = MockFeature::new(9, env(50.0, 50.0, 60.0, 60.0));
        c.flag_suspicious(SLOT_1, &far, record);

        let mut calls = Vec::new();
        let tile = env(0.0, 0.0, 10.0, 10.0);
        let n = c.report_errors(&tile, None, |slot, records| {
            calls.push((slot, records.len()));
            records.len()
        });

        // Slot 0 resolves in one callback; slot 1 has nothing resolved
        // and gets no callback at all.
        assert_eq!(n, 4);
        assert_eq!(calls, vec![(SLOT_0, 4)]);
        assert_eq!(c.pending_in(SLOT_1), 1);
    }

    #[test]
    fn resolution_is_complete_when_tile_covers_run() {
        let mut c = cache();
        let run = env(0.0, 0.0, 100.0, 100.0);
        for id in 0..10u64 {
            let x = id as f64 * 9.0;
            let f = MockFeature::new(id, env(x, 0.0, x + 12.0, 50.0));
            c.flag_suspicious(SLOT_0, &f, record);
        }

        let mut reported = Vec::new();
        c.report_errors(&run, Some(&run), collect(&mut reported));
        assert!(!c.has_pending());
        assert_eq!(reported.len(), 10);
    }

    #[test]
    fn eviction_purges_retained_and_known_ok() {
        let mut c = cache();
        let f = MockFeature::retained(11, env(0.0, 0.0, 1.0, 1.0));
        c.flag_suspicious(SLOT_0, &f, record);
        assert!(c.retained(SLOT_0, FeatureId(11)).is_some());

        let tile = env(0.0, 0.0, 10.0, 10.0);
        c.report_errors(&tile, None, |_, records| records.len());

        assert!(c.retained(SLOT_0, FeatureId(11)).is_none());
        assert!(!c.is_known_ok(SLOT_0, FeatureId(11)));
        assert_eq!(c.known_ok_count(), 0);
    }

    #[test]
    fn report_accumulates_rule_issue_counts() {
        // The callback's return value is the rule's issue count, which
        // need not equal the record count.
        let mut c = cache();
        for id in 0..3u64 {
            let f = MockFeature::new(id, env(0.0, 0.0, 1.0, 1.0));
            c.flag_suspicious(SLOT_0, &f, record);
        }
        let tile = env(0.0, 0.0, 10.0, 10.0);
        let n = c.report_errors(&tile, None, |_, _| 1);
        assert_eq!(n, 1);
    }

    #[test]
    fn clear_discards_everything() {
        let mut c = cache();
        let f = MockFeature::retained(1, env(0.0, 0.0, 1.0, 1.0));
        c.flag_suspicious(SLOT_0, &f, record);
        c.flag_ok(SLOT_1, FeatureId(2));

        c.clear();
        assert!(!c.has_pending());
        assert_eq!(c.known_ok_count(), 0);
        assert!(c.retained(SLOT_0, FeatureId(1)).is_none());
    }

    // ── At-most-once property ───────────────────────────────────

    mod properties {
        use super::*;
        use proptest::prelude::*;

        /// One step of an arbitrary interleaving of cache operations.
        #[derive(Clone, Debug)]
        enum Op {
            Suspicious(u32, u64),
            Ok(u32, u64),
            Report(u8),
        }

        fn op() -> impl Strategy<Value = Op> {
            prop_oneof![
                (0u32..3, 0u64..20).prop_map(|(s, id)| Op::Suspicious(s, id)),
                (0u32..3, 0u64..20).prop_map(|(s, id)| Op::Ok(s, id)),
                (0u8..4).prop_map(Op::Report),
            ]
        }

        proptest! {
            /// No (slot, id) pair is ever reported more than once across
            /// any sequence of flag/ok/report operations.
            #[test]
            fn at_most_once_reporting(ops in proptest::collection::vec(op(), 1..80)) {
                let mut c = cache();
                let run = env(0.0, 0.0, 100.0, 100.0);
                // Progressively larger tile envelopes, final one == run.
                let tiles = [
                    env(0.0, 0.0, 30.0, 100.0),
                    env(0.0, 0.0, 60.0, 100.0),
                    env(0.0, 0.0, 90.0, 100.0),
                    env(0.0, 0.0, 100.0, 100.0),
                ];
                let mut reported: Vec<(TableSlot, FeatureId)> = Vec::new();

                for op in ops {
                    match op {
                        Op::Suspicious(s, id) => {
                            // The tile driver never re-surfaces a row whose
                            // surroundings are fully processed, so a resolved
                            // id cannot become suspicious again within a run.
                            if reported.contains(&(TableSlot(s), FeatureId(id))) {
                                continue;
                            }
                            // Deterministic extent per id, some crossing
                            // tile seams.
                            let x = (id % 10) as f64 * 11.0;
                            let f = MockFeature::new(id, env(x, 0.0, x + 8.0, 10.0));
                            c.flag_suspicious(TableSlot(s), &f, record);
                        }
                        Op::Ok(s, id) => c.flag_ok(TableSlot(s), FeatureId(id)),
                        Op::Report(t) => {
                            c.report_errors(
                                &tiles[t as usize],
                                Some(&run),
                                |slot, records| {
                                    for r in records {
                                        reported.push((slot, r.feature_id()));
                                    }
                                    records.len()
                                },
                            );
                        }
                    }
                }

                // Final resolution: everything still pending reports now.
                c.report_errors(&run, Some(&run), |slot, records| {
                    for r in records {
                        reported.push((slot, r.feature_id()));
                    }
                    records.len()
                });
                prop_assert!(!c.has_pending());

                let mut seen = std::collections::HashSet::new();
                for pair in &reported {
                    prop_assert!(seen.insert(*pair), "{pair:?} reported twice");
                }
            }
        }
    }
}
