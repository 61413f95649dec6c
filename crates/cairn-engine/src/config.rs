//! Run configuration.

use cairn_core::Envelope;

/// Configuration for one verification run.
///
/// Deliberately small: tile geometry and traversal order belong to the
/// external tiling scheme, and [`Envelope`] enforces its own invariants
/// at construction, so there is no separate validation step — a
/// `RunConfig` cannot be malformed.
#[derive(Clone, Debug, PartialEq)]
pub struct RunConfig {
    /// Fixed extent of the entire verification run.
    ///
    /// Used to prove that nothing outside the dataset can still
    /// interact with a deferred feature, and to force final resolution
    /// when the last tile completes.
    pub run_envelope: Envelope,
}

impl RunConfig {
    /// Configuration covering `run_envelope`.
    pub fn new(run_envelope: Envelope) -> Self {
        Self { run_envelope }
    }
}
