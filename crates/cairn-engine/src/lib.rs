//! Tile lifecycle driver for the Cairn verification framework.
//!
//! [`TileDriver`] is the single-threaded integration point between an
//! external tiling scheme and the pending-feature cache: the caller
//! streams rows per tile through
//! [`evaluate_row`](TileDriver::evaluate_row), closes each tile with
//! [`complete_tile`](TileDriver::complete_tile), and closes the run
//! with [`complete_run`](TileDriver::complete_run), which forces every
//! still-deferred judgment to resolve.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod driver;
pub mod metrics;
pub mod tile;

pub use config::RunConfig;
pub use driver::{RunError, TileDriver};
pub use metrics::RunMetrics;
pub use tile::{RunSummary, TileOutcome, TileState};
