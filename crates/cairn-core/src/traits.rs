//! Core abstraction traits for feature access and deferred records.

use crate::envelope::Envelope;
use crate::id::FeatureId;

/// Read access to one row of a participating dataset.
///
/// Implemented by storage adapters to expose the two things the
/// verification cache needs from a row: its identity and its bounding
/// extent. Geometry itself never crosses this boundary; spatial
/// predicates are evaluated by the external geometry engine before a
/// verdict reaches the cache.
pub trait Feature {
    /// Row identity, unique within the feature's table slot.
    fn feature_id(&self) -> FeatureId;

    /// Bounding extent of the feature's geometry.
    fn extent(&self) -> Envelope;

    /// Owned copy of the feature for the cache's side store.
    ///
    /// Sources that cannot re-fetch a row by identity alone (computed or
    /// virtual rows) return `Some`, and the cache retains the copy until
    /// the feature resolves. Sources backed by addressable storage keep
    /// the default `None` — the row can be re-queried when needed.
    fn retained_copy(&self) -> Option<Box<dyn Feature>> {
        None
    }
}

/// A deferred-judgment record held by the pending-feature cache.
///
/// Each rule defines its own record type carrying whatever payload the
/// rule needs to finish its judgment later (search extents, candidate
/// counts, partial measurements). The cache only requires the identity
/// and the bounding extent captured at first suspicion; it never re-reads
/// the feature's geometry afterwards.
pub trait PendingRecord {
    /// Identity of the deferred feature.
    fn feature_id(&self) -> FeatureId;

    /// Bounding extent captured when the record was created.
    fn extent(&self) -> &Envelope;
}
