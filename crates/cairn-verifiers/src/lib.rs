//! Reference verifiers for the Cairn verification framework.
//!
//! Production-quality rules that exercise the full deferred-judgment
//! path: local evaluation against the visible area, record capture at
//! first suspicion, and report-time diagnostics once the pending cache
//! resolves a feature.
//!
//! - [`NearbyPartner`]: every feature must have a partner in its own
//!   dataset within a maximum gap.
//! - [`EdgeMatch`]: features of two datasets must have counterparts in
//!   each other within a tolerance (cross-dataset edge matching).
//!
//! Both delegate spatial queries to a
//! [`PartnerProbe`](cairn_verifier::PartnerProbe) — the geometry
//! engine's index — and never implement predicates themselves. Real
//! deployments supply their own rules; these exist as working templates.

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod edge_match;
pub mod partner;
pub mod record;

pub use edge_match::EdgeMatch;
pub use partner::NearbyPartner;
pub use record::{Issue, SearchRecord};
