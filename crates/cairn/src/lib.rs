//! Cairn: a tiled cross-boundary verification cache for spatial
//! data-quality rules.
//!
//! Large geographic datasets are verified tile by tile to keep memory
//! bounded. A rule that checks relationships between features ("this
//! feature must touch / be near / match another") cannot always judge a
//! row from one tile alone — the evidence may live in a tile not yet
//! processed. Cairn is the machinery that defers those judgments and
//! makes each one final exactly once, as soon as the processed area
//! provably covers everything that could still matter.
//!
//! This is the top-level facade crate that re-exports the public API
//! from all Cairn sub-crates. For most users, adding `cairn` as a
//! single dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use cairn::prelude::*;
//! use cairn::verifiers::NearbyPartner;
//!
//! // A row adapter exposing identity and bounding extent.
//! struct Station {
//!     id: FeatureId,
//!     extent: Envelope,
//! }
//! impl Feature for Station {
//!     fn feature_id(&self) -> FeatureId {
//!         self.id
//!     }
//!     fn extent(&self) -> Envelope {
//!         self.extent
//!     }
//! }
//!
//! // A geometry-index stub in which nothing has partners.
//! struct EmptyIndex;
//! impl PartnerProbe for EmptyIndex {
//!     fn partners_within(
//!         &self,
//!         _slot: TableSlot,
//!         _feature: &dyn Feature,
//!         _distance: f64,
//!     ) -> PartnerSet {
//!         PartnerSet::new()
//!     }
//! }
//!
//! // Every station must have a partner within 5 map units.
//! let rule = NearbyPartner::new(TableSlot(0), 5.0, EmptyIndex).unwrap();
//! let run_envelope = Envelope::new(0.0, 0.0, 100.0, 100.0).unwrap();
//! let mut driver = TileDriver::new(RunConfig::new(run_envelope), rule);
//!
//! // Tile 1 (west half): the station's search area crosses the seam,
//! // so the missing partner is not yet conclusive.
//! let station = Station {
//!     id: FeatureId(1),
//!     extent: Envelope::new(48.0, 10.0, 49.0, 11.0).unwrap(),
//! };
//! let verdict = driver.evaluate_row(TableSlot(0), &station).unwrap();
//! assert_eq!(verdict, RowVerdict::Inconclusive);
//! let outcome = driver
//!     .complete_tile(&Envelope::new(0.0, 0.0, 50.0, 100.0).unwrap())
//!     .unwrap();
//! assert_eq!(outcome.still_pending, 1);
//!
//! // Final tile: coverage reaches the run envelope and the deferred
//! // judgment becomes final — still no partner, one issue.
//! driver
//!     .complete_run(&Envelope::new(0.0, 0.0, 100.0, 100.0).unwrap())
//!     .unwrap();
//! let (summary, mut rule) = driver.finish().unwrap();
//! assert!(summary.complete);
//! assert_eq!(summary.issues_reported, 1);
//! assert_eq!(rule.take_issues()[0].feature, FeatureId(1));
//! ```
//!
//! # Modules
//!
//! Each module corresponds to a sub-crate. Use them for types not in
//! the prelude:
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `cairn-core` | IDs, envelopes, core traits |
//! | [`cache`] | `cairn-cache` | Pending-feature cache and coverage test |
//! | [`verifier`] | `cairn-verifier` | The `Verifier` rule seam and probe trait |
//! | [`verifiers`] | `cairn-verifiers` | Reference rules (proximity, edge matching) |
//! | [`engine`] | `cairn-engine` | Tile lifecycle driver |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core types, traits, and IDs (`cairn-core`).
///
/// Contains [`types::TableSlot`], [`types::FeatureId`],
/// [`types::Envelope`], and the fundamental traits
/// ([`types::Feature`], [`types::PendingRecord`]).
pub use cairn_core as types;

/// Pending-feature cache and extent coverage test (`cairn-cache`).
///
/// The deferred-judgment core: [`cache::PendingFeatureCache`] and
/// [`cache::coverage::is_fully_checked`].
pub use cairn_cache as cache;

/// The rule seam (`cairn-verifier`).
///
/// The [`verifier::Verifier`] trait is the main extension point for
/// user-defined data-quality rules; [`verifier::PartnerProbe`] is the
/// seam to the external geometry engine.
pub use cairn_verifier as verifier;

/// Reference rule implementations (`cairn-verifiers`).
///
/// Includes [`verifiers::NearbyPartner`] and [`verifiers::EdgeMatch`].
pub use cairn_verifiers as verifiers;

/// Tile lifecycle driver (`cairn-engine`).
///
/// [`engine::TileDriver`] integrates rule, cache, and the external
/// tiling scheme for one verification run.
pub use cairn_engine as engine;

/// Common imports for typical Cairn usage.
///
/// ```rust
/// use cairn::prelude::*;
/// ```
///
/// This imports the most frequently used types: IDs, envelopes, the
/// core and rule traits, and the tile driver.
pub mod prelude {
    // Core types and traits
    pub use cairn_core::{Envelope, EnvelopeError, Feature, FeatureId, PendingRecord, TableSlot, TileIndex};

    // Cache
    pub use cairn_cache::PendingFeatureCache;

    // Rule seam
    pub use cairn_verifier::{PartnerProbe, PartnerSet, RowVerdict, Verifier, VerifierError};

    // Engine
    pub use cairn_engine::{
        RunConfig, RunError, RunMetrics, RunSummary, TileDriver, TileOutcome, TileState,
    };
}
