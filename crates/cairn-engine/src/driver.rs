//! The tile driver: single-threaded integration of rule, cache, and
//! tile lifecycle.
//!
//! # Ownership model
//!
//! [`TileDriver`] owns the rule and the pending-feature cache for
//! exactly one verification run and is torn down with it — there is no
//! process-wide cache. Every mutating method takes `&mut self`: the
//! verification protocol is strictly tile-sequential and
//! single-threaded, with no suspension points, and concurrent external
//! mutation is unsupported.
//!
//! # Lifecycle contract
//!
//! The driver starts in [`TileState::Initial`]; no resolution pass runs
//! before the first tile completes. For every completed tile the caller
//! supplies the *cumulative* processed extent, which must never shrink.
//! On the last tile, [`complete_run`](TileDriver::complete_run) expands
//! the supplied extent to encompass the run envelope, forcing every
//! still-pending record to resolve — no feature may remain permanently
//! undetermined.

use std::fmt;

use cairn_cache::PendingFeatureCache;
use cairn_core::{Envelope, Feature, TableSlot, TileIndex};
use cairn_verifier::{RowVerdict, Verifier, VerifierError};

use crate::config::RunConfig;
use crate::metrics::RunMetrics;
use crate::tile::{RunSummary, TileOutcome, TileState};

// ── RunError ────────────────────────────────────────────────────

/// Errors from the tile driver.
#[derive(Clone, Debug, PartialEq)]
pub enum RunError {
    /// The rule's evaluation failed for a row.
    Verifier(VerifierError),
    /// The supplied processed extent does not cover the previous one.
    ///
    /// Tile coverage only grows; a shrinking extent would un-resolve
    /// judgments already reported.
    TileRegression {
        /// The cumulative extent from the previous tile.
        previous: Envelope,
        /// The extent the caller just supplied.
        supplied: Envelope,
    },
    /// A row or tile arrived after the final tile completed.
    RunFinished,
    /// [`finish`](crate::TileDriver::finish) was called before the
    /// final tile completed.
    RunNotFinished,
    /// A pending record survived final resolution.
    ///
    /// Cannot occur through this driver — final resolution covers the
    /// run envelope by construction — but is asserted defensively: its
    /// appearance means the integration violated the lifecycle
    /// contract.
    UnresolvedAtFinal {
        /// Number of surviving records.
        count: usize,
    },
}

impl fmt::Display for RunError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Verifier(e) => write!(f, "rule evaluation failed: {e}"),
            Self::TileRegression { previous, supplied } => write!(
                f,
                "processed extent regressed: {supplied} does not cover {previous}"
            ),
            Self::RunFinished => write!(f, "verification run already finished"),
            Self::RunNotFinished => write!(f, "verification run not finished"),
            Self::UnresolvedAtFinal { count } => {
                write!(f, "{count} pending records survived final resolution")
            }
        }
    }
}

impl std::error::Error for RunError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Verifier(e) => Some(e),
            _ => None,
        }
    }
}

// ── TileDriver ──────────────────────────────────────────────────

/// Drives one rule through one tiled verification run.
///
/// Created from a [`RunConfig`] and the rule instance. The external
/// tiling scheme streams rows and tile completions; the driver routes
/// verdicts into the cache and resolution passes back out through the
/// rule's report callback.
///
/// # Example
///
/// ```ignore
/// let mut driver = TileDriver::new(RunConfig::new(run_envelope), rule);
/// for tile in tiles {
///     for (slot, feature) in tile.rows() {
///         driver.evaluate_row(slot, &feature)?;
///     }
///     if tile.is_last() {
///         driver.complete_run(&tile.processed_extent())?;
///     } else {
///         driver.complete_tile(&tile.processed_extent())?;
///     }
/// }
/// let (summary, rule) = driver.finish()?;
/// ```
pub struct TileDriver<V: Verifier> {
    verifier: V,
    cache: PendingFeatureCache<V::Record>,
    run_envelope: Envelope,
    /// Cumulative processed extent, `None` until the first tile completes.
    processed: Option<Envelope>,
    state: TileState,
    metrics: RunMetrics,
    issues_total: usize,
}

impl<V: Verifier> TileDriver<V> {
    /// Create a driver for one run.
    ///
    /// The driver owns `verifier` and a fresh cache; both live exactly
    /// as long as the run.
    pub fn new(config: RunConfig, verifier: V) -> Self {
        Self {
            verifier,
            cache: PendingFeatureCache::new(),
            run_envelope: config.run_envelope,
            processed: None,
            state: TileState::Initial,
            metrics: RunMetrics::default(),
            issues_total: 0,
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> TileState {
        self.state
    }

    /// Cumulative run counters so far.
    pub fn metrics(&self) -> &RunMetrics {
        &self.metrics
    }

    /// The rule under verification.
    pub fn verifier(&self) -> &V {
        &self.verifier
    }

    /// Mutable access to the rule (e.g. to drain its diagnostics).
    pub fn verifier_mut(&mut self) -> &mut V {
        &mut self.verifier
    }

    /// Number of records still awaiting judgment.
    pub fn pending_count(&self) -> usize {
        self.cache.pending_count()
    }

    /// Judge one row of the current tile.
    ///
    /// Rows already known OK are skipped without consulting the rule.
    /// A `Pass` verdict marks the feature known OK (evicting any stale
    /// suspicion); an `Inconclusive` verdict parks it in the cache with
    /// the rule's record factory.
    ///
    /// Returns [`RunError::RunFinished`] after the final tile.
    pub fn evaluate_row(
        &mut self,
        slot: TableSlot,
        feature: &dyn Feature,
    ) -> Result<RowVerdict, RunError> {
        if self.state == TileState::Final {
            return Err(RunError::RunFinished);
        }
        self.metrics.rows_evaluated += 1;

        let id = feature.feature_id();
        if self.cache.is_known_ok(slot, id) {
            self.metrics.rows_skipped_known_ok += 1;
            return Ok(RowVerdict::Pass);
        }

        match self.verifier.evaluate(slot, feature).map_err(RunError::Verifier)? {
            RowVerdict::Pass => {
                self.metrics.rows_passed += 1;
                self.cache.flag_ok(slot, id);
                Ok(RowVerdict::Pass)
            }
            RowVerdict::Inconclusive => {
                self.metrics.rows_deferred += 1;
                let before = self.cache.pending_count();
                let verifier = &self.verifier;
                self.cache
                    .flag_suspicious(slot, feature, |f| verifier.make_record(slot, f));
                let now = self.cache.pending_count();
                if now > before {
                    self.metrics.records_created += 1;
                }
                if now > self.metrics.pending_high_water {
                    self.metrics.pending_high_water = now;
                }
                Ok(RowVerdict::Inconclusive)
            }
        }
    }

    /// Close a regular tile.
    ///
    /// `processed` is the cumulative extent guaranteed fully processed
    /// so far, supplied by the tiling scheme. Runs a resolution pass:
    /// every record whose extent is now provably covered is reported
    /// through the rule and evicted.
    pub fn complete_tile(&mut self, processed: &Envelope) -> Result<TileOutcome, RunError> {
        self.advance(processed, TileState::Intermediate)
    }

    /// Close the last tile.
    ///
    /// The supplied extent is expanded to encompass the run envelope
    /// before the resolution pass, forcing every still-pending record
    /// to resolve. Afterwards the cache must be empty; a survivor is a
    /// lifecycle-contract violation reported as
    /// [`RunError::UnresolvedAtFinal`].
    pub fn complete_run(&mut self, processed: &Envelope) -> Result<TileOutcome, RunError> {
        let forced = processed.union(&self.run_envelope);
        let outcome = self.advance(&forced, TileState::Final)?;
        if self.cache.has_pending() {
            return Err(RunError::UnresolvedAtFinal {
                count: self.cache.pending_count(),
            });
        }
        Ok(outcome)
    }

    /// End a completed run, returning the summary and the rule.
    ///
    /// Returns [`RunError::RunNotFinished`] if the final tile has not
    /// completed — use [`cancel`](Self::cancel) to stop a run early.
    pub fn finish(self) -> Result<(RunSummary, V), RunError> {
        if self.state != TileState::Final {
            return Err(RunError::RunNotFinished);
        }
        let summary = RunSummary {
            complete: true,
            issues_reported: self.issues_total,
            discarded_pending: 0,
            metrics: self.metrics,
        };
        Ok((summary, self.verifier))
    }

    /// Stop the run before the final tile.
    ///
    /// Judgments already resolved and reported stand; still-pending
    /// records are discarded without judgment. The summary is marked
    /// incomplete and carries the discard count — callers must surface
    /// this as *verification incomplete*, never as "all OK".
    pub fn cancel(mut self) -> (RunSummary, V) {
        let discarded = self.cache.pending_count();
        self.cache.clear();
        let summary = RunSummary {
            complete: self.state == TileState::Final,
            issues_reported: self.issues_total,
            discarded_pending: discarded,
            metrics: self.metrics,
        };
        (summary, self.verifier)
    }

    /// Shared tile-completion path: monotonicity check, state
    /// transition, resolution pass, bookkeeping.
    fn advance(&mut self, processed: &Envelope, to: TileState) -> Result<TileOutcome, RunError> {
        if self.state == TileState::Final {
            return Err(RunError::RunFinished);
        }
        if let Some(previous) = self.processed {
            if !processed.contains(&previous) {
                return Err(RunError::TileRegression {
                    previous,
                    supplied: *processed,
                });
            }
        }
        self.processed = Some(*processed);
        self.state = to;

        let before = self.cache.pending_count();
        let Self {
            cache,
            verifier,
            run_envelope,
            ..
        } = self;
        let issues = cache.report_errors(processed, Some(&*run_envelope), |slot, records| {
            verifier.report(slot, records)
        });
        let still_pending = self.cache.pending_count();
        let resolved = before - still_pending;

        self.issues_total += issues;
        self.metrics.issues_reported += issues as u64;
        self.metrics.records_resolved += resolved as u64;
        let tile = TileIndex(self.metrics.tiles_completed);
        self.metrics.tiles_completed += 1;

        Ok(TileOutcome {
            tile,
            state: to,
            issues_reported: issues,
            resolved,
            still_pending,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cairn_test_utils::{env, MockFeature, RecordingVerifier};

    const SLOT: TableSlot = TableSlot(0);

    fn driver() -> TileDriver<RecordingVerifier> {
        TileDriver::new(
            RunConfig::new(env(0.0, 0.0, 100.0, 100.0)),
            RecordingVerifier::new(),
        )
    }

    // ── State machine ───────────────────────────────────────────

    #[test]
    fn starts_in_initial_state() {
        let d = driver();
        assert_eq!(d.state(), TileState::Initial);
        assert_eq!(d.metrics().tiles_completed, 0);
    }

    #[test]
    fn tile_completions_advance_state() {
        let mut d = driver();
        let out = d.complete_tile(&env(0.0, 0.0, 50.0, 100.0)).unwrap();
        assert_eq!(out.state, TileState::Intermediate);
        assert_eq!(out.tile, TileIndex(0));

        let out = d.complete_run(&env(0.0, 0.0, 100.0, 100.0)).unwrap();
        assert_eq!(out.state, TileState::Final);
        assert_eq!(out.tile, TileIndex(1));
        assert_eq!(d.state(), TileState::Final);
    }

    #[test]
    fn rows_after_final_are_rejected() {
        let mut d = driver();
        d.complete_run(&env(0.0, 0.0, 100.0, 100.0)).unwrap();

        let f = MockFeature::new(1, env(0.0, 0.0, 1.0, 1.0));
        assert_eq!(d.evaluate_row(SLOT, &f), Err(RunError::RunFinished));
        assert_eq!(
            d.complete_tile(&env(0.0, 0.0, 100.0, 100.0)),
            Err(RunError::RunFinished)
        );
    }

    #[test]
    fn shrinking_processed_extent_is_rejected() {
        let mut d = driver();
        d.complete_tile(&env(0.0, 0.0, 50.0, 100.0)).unwrap();
        let err = d.complete_tile(&env(0.0, 0.0, 40.0, 100.0)).unwrap_err();
        assert!(matches!(err, RunError::TileRegression { .. }));
    }

    #[test]
    fn finish_before_final_is_rejected() {
        let d = driver();
        assert!(matches!(d.finish(), Err(RunError::RunNotFinished)));
    }

    // ── Row dispatch ────────────────────────────────────────────

    #[test]
    fn pass_verdict_marks_known_ok() {
        let mut d = driver();
        let f = MockFeature::new(1, env(0.0, 0.0, 1.0, 1.0));
        assert_eq!(d.evaluate_row(SLOT, &f).unwrap(), RowVerdict::Pass);
        assert_eq!(d.metrics().rows_passed, 1);

        // Second sighting is skipped without consulting the rule.
        d.verifier_mut().mark_inconclusive(SLOT, 1);
        assert_eq!(d.evaluate_row(SLOT, &f).unwrap(), RowVerdict::Pass);
        assert_eq!(d.metrics().rows_skipped_known_ok, 1);
        assert_eq!(d.pending_count(), 0);
    }

    #[test]
    fn inconclusive_verdict_defers() {
        let mut d = driver();
        d.verifier_mut().mark_inconclusive(SLOT, 2);
        let f = MockFeature::new(2, env(0.0, 0.0, 1.0, 1.0));
        assert_eq!(d.evaluate_row(SLOT, &f).unwrap(), RowVerdict::Inconclusive);
        assert_eq!(d.pending_count(), 1);
        assert_eq!(d.metrics().records_created, 1);
        assert_eq!(d.metrics().pending_high_water, 1);
    }

    #[test]
    fn re_deferring_does_not_duplicate_records() {
        let mut d = driver();
        d.verifier_mut().mark_inconclusive(SLOT, 3);
        let f = MockFeature::new(3, env(0.0, 0.0, 1.0, 1.0));
        d.evaluate_row(SLOT, &f).unwrap();
        d.evaluate_row(SLOT, &f).unwrap();
        assert_eq!(d.pending_count(), 1);
        assert_eq!(d.metrics().records_created, 1);
        assert_eq!(d.metrics().rows_deferred, 2);
    }

    // ── Resolution bookkeeping ──────────────────────────────────

    #[test]
    fn complete_run_forces_resolution_and_reports() {
        let mut d = driver();
        d.verifier_mut().mark_inconclusive(SLOT, 4);
        // Extent pokes past every intermediate tile.
        let f = MockFeature::new(4, env(40.0, 40.0, 60.0, 60.0));
        d.evaluate_row(SLOT, &f).unwrap();

        let out = d.complete_tile(&env(0.0, 0.0, 50.0, 100.0)).unwrap();
        assert_eq!(out.resolved, 0);
        assert_eq!(out.still_pending, 1);

        // Caller supplies a short envelope; the driver forces coverage
        // of the run envelope anyway.
        let out = d.complete_run(&env(0.0, 0.0, 50.0, 100.0)).unwrap();
        assert_eq!(out.resolved, 1);
        assert_eq!(out.still_pending, 0);
        assert_eq!(out.issues_reported, 1);

        let (summary, rule) = d.finish().unwrap();
        assert!(summary.complete);
        assert_eq!(summary.issues_reported, 1);
        assert_eq!(summary.discarded_pending, 0);
        assert_eq!(summary.metrics.records_resolved, 1);
        assert_eq!(rule.reported_ids(), vec![(SLOT, cairn_core::FeatureId(4))]);
    }

    #[test]
    fn cancel_surfaces_incomplete() {
        let mut d = driver();
        d.verifier_mut().mark_inconclusive(SLOT, 5);
        let f = MockFeature::new(5, env(40.0, 40.0, 60.0, 60.0));
        d.evaluate_row(SLOT, &f).unwrap();
        d.complete_tile(&env(0.0, 0.0, 50.0, 100.0)).unwrap();

        let (summary, rule) = d.cancel();
        assert!(!summary.complete);
        assert_eq!(summary.discarded_pending, 1);
        // The discarded feature was never judged: nothing reported.
        assert!(rule.reported_ids().is_empty());
    }
}
