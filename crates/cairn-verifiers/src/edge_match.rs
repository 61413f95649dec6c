//! Cross-dataset edge matching: two datasets must mirror each other.
//!
//! Classic map-sheet QA: where two acquisitions meet, every feature of
//! one dataset must have a counterpart in the other within a tolerance.
//! Both datasets are verified symmetrically, which exercises per-slot
//! partitioning — the same numeric id in the two slots is two unrelated
//! features with independent pending state.

use cairn_core::{Feature, PendingRecord, TableSlot};
use cairn_verifier::{PartnerProbe, RowVerdict, Verifier, VerifierError};

use crate::record::{Issue, SearchRecord};

/// Rule: every feature of slot `a` must have a counterpart in slot `b`
/// within `tolerance`, and vice versa.
pub struct EdgeMatch<P> {
    slot_a: TableSlot,
    slot_b: TableSlot,
    tolerance: f64,
    probe: P,
    issues: Vec<Issue>,
}

impl<P: PartnerProbe> EdgeMatch<P> {
    /// Create the rule over the slot pair `(a, b)`.
    ///
    /// Returns `Err(VerifierError::InvalidParameter)` unless `tolerance`
    /// is finite and positive. The two slots must differ; equal slots
    /// are a configuration defect.
    ///
    /// # Panics
    ///
    /// Panics if `a == b`.
    pub fn new(
        a: TableSlot,
        b: TableSlot,
        tolerance: f64,
        probe: P,
    ) -> Result<Self, VerifierError> {
        assert_ne!(a, b, "EdgeMatch requires two distinct table slots");
        if !tolerance.is_finite() || tolerance <= 0.0 {
            return Err(VerifierError::InvalidParameter {
                name: "tolerance",
                value: tolerance,
            });
        }
        Ok(Self {
            slot_a: a,
            slot_b: b,
            tolerance,
            probe,
            issues: Vec::new(),
        })
    }

    /// Drain the diagnostics raised so far.
    pub fn take_issues(&mut self) -> Vec<Issue> {
        std::mem::take(&mut self.issues)
    }

    /// The slot whose features answer for `slot`.
    fn counterpart(&self, slot: TableSlot) -> Result<TableSlot, VerifierError> {
        if slot == self.slot_a {
            Ok(self.slot_b)
        } else if slot == self.slot_b {
            Ok(self.slot_a)
        } else {
            Err(VerifierError::UnsupportedSlot { slot })
        }
    }
}

impl<P: PartnerProbe> Verifier for EdgeMatch<P> {
    type Record = SearchRecord;

    fn name(&self) -> &str {
        "EdgeMatch"
    }

    fn evaluate(
        &mut self,
        slot: TableSlot,
        feature: &dyn Feature,
    ) -> Result<RowVerdict, VerifierError> {
        let other = self.counterpart(slot)?;
        let counterparts = self.probe.partners_within(other, feature, self.tolerance);
        if counterparts.is_empty() {
            Ok(RowVerdict::Inconclusive)
        } else {
            Ok(RowVerdict::Pass)
        }
    }

    fn make_record(&self, _slot: TableSlot, feature: &dyn Feature) -> SearchRecord {
        SearchRecord::capture(feature, self.tolerance)
    }

    fn report(&mut self, slot: TableSlot, records: &[SearchRecord]) -> usize {
        // counterpart() cannot fail here: only rows accepted by
        // evaluate() ever reach the cache.
        let other = self.counterpart(slot).expect("record from foreign slot");
        for record in records {
            self.issues.push(Issue {
                slot,
                feature: record.feature_id(),
                extent: *record.feature_extent(),
                description: format!(
                    "feature {} has no counterpart in dataset {} within {}",
                    record.feature_id(),
                    other,
                    self.tolerance
                ),
            });
        }
        records.len()
    }
}
