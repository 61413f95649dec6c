//! Shared record and issue types for the reference verifiers.

use cairn_core::{Envelope, Feature, FeatureId, PendingRecord, TableSlot};

/// Pending record for search-based rules.
///
/// Captures the feature extent plus the *search extent* — the feature
/// extent grown by the rule's search distance. The search extent is
/// what must be fully processed before a "no partner seen" verdict can
/// become final, so that is what the coverage test sees via
/// [`PendingRecord::extent`]. The raw feature extent rides along for
/// diagnostics.
#[derive(Clone, Debug, PartialEq)]
pub struct SearchRecord {
    id: FeatureId,
    feature_extent: Envelope,
    search_extent: Envelope,
}

impl SearchRecord {
    /// Capture a feature and its search area.
    pub fn capture(feature: &dyn Feature, search_distance: f64) -> Self {
        let feature_extent = feature.extent();
        Self {
            id: feature.feature_id(),
            feature_extent,
            search_extent: feature_extent.expand_by(search_distance),
        }
    }

    /// The raw feature extent, for diagnostics.
    pub fn feature_extent(&self) -> &Envelope {
        &self.feature_extent
    }

    /// The search extent that gates resolution.
    pub fn search_extent(&self) -> &Envelope {
        &self.search_extent
    }
}

impl PendingRecord for SearchRecord {
    fn feature_id(&self) -> FeatureId {
        self.id
    }

    fn extent(&self) -> &Envelope {
        &self.search_extent
    }
}

/// One user-visible diagnostic raised by a reference verifier.
///
/// Real deployments shape their own diagnostics (severity codes, error
/// geometry); the reference rules keep a flat description.
#[derive(Clone, Debug, PartialEq)]
pub struct Issue {
    /// Slot of the offending feature.
    pub slot: TableSlot,
    /// Identity of the offending feature.
    pub feature: FeatureId,
    /// Extent of the offending feature.
    pub extent: Envelope,
    /// Human-readable description.
    pub description: String,
}
