//! The geometry-engine seam consumed by rules.

use cairn_core::{Feature, FeatureId, TableSlot};
use smallvec::SmallVec;

/// Partner ids returned by a probe query.
///
/// Uses `SmallVec<[FeatureId; 8]>` to avoid heap allocation for the
/// common case of a handful of nearby candidates.
pub type PartnerSet = SmallVec<[FeatureId; 8]>;

/// Spatial neighbor queries over the features revealed so far.
///
/// Implemented by the external geometry engine's index. The visible
/// universe grows tile by tile: an empty answer means *no partner seen
/// yet*, not *no partner exists* — which is exactly why rules defer
/// judgments whose search extent is not yet fully processed.
pub trait PartnerProbe {
    /// Ids of features in `slot` within `distance` of `feature`,
    /// excluding the feature itself.
    ///
    /// Distance semantics (edge-to-edge, centroid, etc.) belong to the
    /// geometry engine; callers only rely on the answer being complete
    /// for the area processed so far.
    fn partners_within(
        &self,
        slot: TableSlot,
        feature: &dyn Feature,
        distance: f64,
    ) -> PartnerSet;
}
