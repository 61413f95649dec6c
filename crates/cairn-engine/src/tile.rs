//! Tile lifecycle states and per-tile/run result types.

use cairn_core::TileIndex;

use crate::metrics::RunMetrics;

/// Phase of the tile lifecycle state machine.
///
/// The driver starts in `Initial` — before any tile, there is nothing
/// to resolve and no resolution pass runs. Each completed regular tile
/// moves it to `Intermediate`; the last tile moves it to `Final`, after
/// which no further rows or tiles are accepted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TileState {
    /// Before any tile has completed.
    Initial,
    /// After a regular tile completed.
    Intermediate,
    /// After the last tile completed; every judgment is final.
    Final,
}

/// Result of a completed tile.
#[derive(Clone, Debug, PartialEq)]
pub struct TileOutcome {
    /// Ordinal of the completed tile within the run.
    pub tile: TileIndex,
    /// Lifecycle state after this tile.
    pub state: TileState,
    /// Issues raised by the rule's report callback during this tile's
    /// resolution pass.
    pub issues_reported: usize,
    /// Deferred records that resolved (and were evicted) this tile.
    pub resolved: usize,
    /// Deferred records still awaiting coverage after this tile.
    pub still_pending: usize,
}

/// Result of a whole verification run.
///
/// `complete == false` means the run was cancelled before the final
/// tile: every already-resolved judgment stands, but
/// `discarded_pending` features were dropped without judgment. Callers
/// must surface that as *verification incomplete* — never as "all OK".
#[derive(Clone, Debug, PartialEq)]
pub struct RunSummary {
    /// Whether the run reached final resolution.
    pub complete: bool,
    /// Total issues raised across all resolution passes.
    pub issues_reported: usize,
    /// Pending records discarded without judgment (cancellation only).
    pub discarded_pending: usize,
    /// Cumulative run counters.
    pub metrics: RunMetrics,
}
