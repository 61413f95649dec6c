//! Strongly-typed identifiers for datasets, rows, and tiles.

use std::fmt;

/// Identifies one of the datasets participating in a verification run.
///
/// All cache state is partitioned first by table slot; two slots never
/// share an identity space. `TableSlot(n)` corresponds to the n-th
/// dataset registered with the rule under verification.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TableSlot(pub u32);

impl fmt::Display for TableSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for TableSlot {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

/// Row identity, unique within a single [`TableSlot`].
///
/// The same numeric id may exist independently in two different slots;
/// the pair `(TableSlot, FeatureId)` is the composite key everywhere.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FeatureId(pub u64);

impl fmt::Display for FeatureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for FeatureId {
    fn from(v: u64) -> Self {
        Self(v)
    }
}

/// Ordinal of a completed tile within a verification run.
///
/// Tile geometry and traversal order are supplied by the external
/// driver; this index only labels outcomes for diagnostics.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TileIndex(pub u32);

impl fmt::Display for TileIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for TileIndex {
    fn from(v: u32) -> Self {
        Self(v)
    }
}
