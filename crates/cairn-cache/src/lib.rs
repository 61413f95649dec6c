//! Pending-feature cache and extent coverage test for tiled verification.
//!
//! This crate is the heart of Cairn: it decides **when** a deferred
//! cross-tile suspicion becomes final. Datasets too large to hold in
//! memory are verified tile by tile; a feature whose judgment needs
//! information from tiles not yet processed is parked in a
//! [`PendingFeatureCache`] and resolved exactly once, as soon as the
//! processed area provably covers everything that could still interact
//! with it.
//!
//! - [`coverage::is_fully_checked`]: the pure containment decision.
//! - [`PendingFeatureCache`]: per-slot known-OK sets, pending records,
//!   and the retained-feature side store.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod coverage;
pub mod pending;

pub use pending::PendingFeatureCache;
