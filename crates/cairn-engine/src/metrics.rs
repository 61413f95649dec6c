//! Cumulative counters for a verification run.

/// Counters collected across a run's row evaluations and tile
/// completions.
///
/// All counters are cumulative for the run; consumers (telemetry,
/// progress reporting) read them from the driver or from the final
/// [`RunSummary`](crate::RunSummary).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RunMetrics {
    /// Rows handed to [`evaluate_row`](crate::TileDriver::evaluate_row).
    pub rows_evaluated: u64,
    /// Rows that passed outright.
    pub rows_passed: u64,
    /// Rows judged inconclusive and deferred.
    pub rows_deferred: u64,
    /// Rows skipped because their id was already known OK.
    pub rows_skipped_known_ok: u64,
    /// Pending records created (first suspicions).
    pub records_created: u64,
    /// Pending records conclusively resolved and reported.
    pub records_resolved: u64,
    /// Issues raised by the rule's report callback.
    pub issues_reported: u64,
    /// Tiles completed, the final tile included.
    pub tiles_completed: u32,
    /// Largest number of simultaneously pending records observed.
    ///
    /// This is the run's memory bound: the cache holds state
    /// proportional to this, never to dataset size.
    pub pending_high_water: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_metrics_are_zero() {
        let m = RunMetrics::default();
        assert_eq!(m.rows_evaluated, 0);
        assert_eq!(m.rows_passed, 0);
        assert_eq!(m.rows_deferred, 0);
        assert_eq!(m.rows_skipped_known_ok, 0);
        assert_eq!(m.records_created, 0);
        assert_eq!(m.records_resolved, 0);
        assert_eq!(m.issues_reported, 0);
        assert_eq!(m.tiles_completed, 0);
        assert_eq!(m.pending_high_water, 0);
    }
}
