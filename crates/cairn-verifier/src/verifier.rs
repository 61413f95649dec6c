//! The [`Verifier`] trait and [`RowVerdict`] enum.
//!
//! Verifiers are the per-rule extension point: the driver streams rows
//! to [`evaluate`](Verifier::evaluate), parks inconclusive rows in the
//! pending-feature cache using [`make_record`](Verifier::make_record) as
//! the record factory, and calls [`report`](Verifier::report) once the
//! cache has conclusively resolved them.

use cairn_core::{Feature, PendingRecord, TableSlot};

use crate::error::VerifierError;

/// Judgment for a single row within the currently visible area.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RowVerdict {
    /// The feature is correct; no future tile can change that.
    Pass,
    /// The local check could not conclude; judgment is deferred until
    /// the feature's surroundings are fully processed.
    Inconclusive,
}

/// One data-quality rule evaluated across a tiled verification run.
///
/// # Contract
///
/// - `evaluate()` judges a row against the features visible so far. It
///   must return [`RowVerdict::Pass`] only when no unprocessed tile
///   could overturn the judgment.
/// - `make_record()` is the record factory: called at most once per
///   `(slot, id)`, at first suspicion. The record must capture the
///   feature's identity and bounding extent — the cache never re-reads
///   the geometry — plus whatever payload the rule needs to finish its
///   judgment later.
/// - `report()` produces the final user-visible diagnostics (message,
///   geometry, severity) for conclusively resolved records and returns
///   the number of issues raised. The driver guarantees it sees each
///   `(slot, id)` at most once per run.
///
/// # Examples
///
/// A minimal rule that distrusts wide features:
///
/// ```
/// use cairn_core::{Envelope, Feature, FeatureId, PendingRecord, TableSlot};
/// use cairn_verifier::{RowVerdict, Verifier, VerifierError};
///
/// struct WidthRecord {
///     id: FeatureId,
///     extent: Envelope,
/// }
///
/// impl PendingRecord for WidthRecord {
///     fn feature_id(&self) -> FeatureId {
///         self.id
///     }
///     fn extent(&self) -> &Envelope {
///         &self.extent
///     }
/// }
///
/// struct MaxWidth {
///     limit: f64,
///     issues: usize,
/// }
///
/// impl Verifier for MaxWidth {
///     type Record = WidthRecord;
///
///     fn name(&self) -> &str {
///         "MaxWidth"
///     }
///
///     fn evaluate(
///         &mut self,
///         _slot: TableSlot,
///         feature: &dyn Feature,
///     ) -> Result<RowVerdict, VerifierError> {
///         if feature.extent().width() <= self.limit {
///             Ok(RowVerdict::Pass)
///         } else {
///             Ok(RowVerdict::Inconclusive)
///         }
///     }
///
///     fn make_record(&self, _slot: TableSlot, feature: &dyn Feature) -> WidthRecord {
///         WidthRecord {
///             id: feature.feature_id(),
///             extent: feature.extent(),
///         }
///     }
///
///     fn report(&mut self, _slot: TableSlot, records: &[WidthRecord]) -> usize {
///         self.issues += records.len();
///         records.len()
///     }
/// }
///
/// let rule = MaxWidth { limit: 10.0, issues: 0 };
/// assert_eq!(rule.name(), "MaxWidth");
/// ```
pub trait Verifier {
    /// The rule's deferred-judgment record type.
    type Record: PendingRecord;

    /// Human-readable rule name for diagnostics.
    fn name(&self) -> &str;

    /// Judge one row against the currently visible area.
    fn evaluate(
        &mut self,
        slot: TableSlot,
        feature: &dyn Feature,
    ) -> Result<RowVerdict, VerifierError>;

    /// Build the pending record for a newly suspicious feature.
    fn make_record(&self, slot: TableSlot, feature: &dyn Feature) -> Self::Record;

    /// Emit final diagnostics for conclusively resolved records.
    ///
    /// Returns the number of issues raised, which need not equal
    /// `records.len()` — a rule may decide at reporting time that some
    /// resolved suspicions are harmless after all.
    fn report(&mut self, slot: TableSlot, records: &[Self::Record]) -> usize;
}
