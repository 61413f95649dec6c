//! Same-dataset proximity rule: every feature needs a nearby partner.
//!
//! A feature with no partner within `max_gap` is broken — but "no
//! partner seen" only means something once every tile that could hold
//! one has been processed. Rows with a visible partner pass
//! immediately; the rest are deferred with their search extent and
//! reported only if they resolve still partnerless.

use cairn_core::{Feature, PendingRecord, TableSlot};
use cairn_verifier::{PartnerProbe, RowVerdict, Verifier, VerifierError};

use crate::record::{Issue, SearchRecord};

/// Rule: every feature in one dataset must have a partner in the same
/// dataset within `max_gap`.
///
/// Typical use: point networks where an isolated measurement station is
/// a digitization error. Issues accumulate internally; drain them with
/// [`take_issues`](NearbyPartner::take_issues) after each tile or at
/// the end of the run.
pub struct NearbyPartner<P> {
    slot: TableSlot,
    max_gap: f64,
    probe: P,
    issues: Vec<Issue>,
}

impl<P: PartnerProbe> NearbyPartner<P> {
    /// Create the rule for `slot` with the given maximum gap.
    ///
    /// Returns `Err(VerifierError::InvalidParameter)` unless `max_gap`
    /// is finite and positive.
    pub fn new(slot: TableSlot, max_gap: f64, probe: P) -> Result<Self, VerifierError> {
        if !max_gap.is_finite() || max_gap <= 0.0 {
            return Err(VerifierError::InvalidParameter {
                name: "max_gap",
                value: max_gap,
            });
        }
        Ok(Self {
            slot,
            max_gap,
            probe,
            issues: Vec::new(),
        })
    }

    /// Drain the diagnostics raised so far.
    pub fn take_issues(&mut self) -> Vec<Issue> {
        std::mem::take(&mut self.issues)
    }
}

impl<P: PartnerProbe> Verifier for NearbyPartner<P> {
    type Record = SearchRecord;

    fn name(&self) -> &str {
        "NearbyPartner"
    }

    fn evaluate(
        &mut self,
        slot: TableSlot,
        feature: &dyn Feature,
    ) -> Result<RowVerdict, VerifierError> {
        if slot != self.slot {
            return Err(VerifierError::UnsupportedSlot { slot });
        }
        let partners = self.probe.partners_within(slot, feature, self.max_gap);
        if partners.is_empty() {
            Ok(RowVerdict::Inconclusive)
        } else {
            Ok(RowVerdict::Pass)
        }
    }

    fn make_record(&self, _slot: TableSlot, feature: &dyn Feature) -> SearchRecord {
        SearchRecord::capture(feature, self.max_gap)
    }

    fn report(&mut self, slot: TableSlot, records: &[SearchRecord]) -> usize {
        for record in records {
            self.issues.push(Issue {
                slot,
                feature: record.feature_id(),
                extent: *record.feature_extent(),
                description: format!(
                    "feature {} has no partner within {}",
                    record.feature_id(),
                    self.max_gap
                ),
            });
        }
        records.len()
    }
}
