use crate::spatial::tiles::TileId;
use bitvec::prelude::*;
use std::fmt;

/// Fixed-size bitset of tile handles
///
/// Used both for a cell's remaining candidates and for the tiles admitted
/// next to a tile in one direction. Iteration is always in ascending
/// [`TileId`] order, which keeps sampling reproducible.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TileBitset {
    bits: BitVec,
}

impl TileBitset {
    /// Create a bitset with no tiles present
    pub fn new(tile_count: usize) -> Self {
        Self {
            bits: bitvec![0; tile_count],
        }
    }

    /// Create a bitset containing every tile of a catalog
    pub fn all(tile_count: usize) -> Self {
        Self {
            bits: bitvec![1; tile_count],
        }
    }

    /// Number of tiles the set can hold
    pub fn capacity(&self) -> usize {
        self.bits.len()
    }

    /// Insert a tile, ignoring handles beyond the capacity
    pub fn insert(&mut self, tile: TileId) {
        if tile.index() < self.bits.len() {
            self.bits.set(tile.index(), true);
        }
    }

    /// Remove a tile
    pub fn remove(&mut self, tile: TileId) {
        if tile.index() < self.bits.len() {
            self.bits.set(tile.index(), false);
        }
    }

    /// Test tile membership
    pub fn contains(&self, tile: TileId) -> bool {
        self.bits.get(tile.index()).as_deref() == Some(&true)
    }

    /// Intersect this bitset with another in-place
    pub fn intersect_with(&mut self, other: &Self) {
        self.bits &= &other.bits;
    }

    /// Create a new bitset containing the intersection
    #[must_use]
    pub fn intersection(&self, other: &Self) -> Self {
        let mut result = self.clone();
        result.intersect_with(other);
        result
    }

    /// Test if no tiles are present
    pub fn is_empty(&self) -> bool {
        self.bits.not_any()
    }

    /// Count tiles in the set
    pub fn count(&self) -> usize {
        self.bits.count_ones()
    }

    /// Iterate present tiles in ascending order
    pub fn iter(&self) -> impl Iterator<Item = TileId> + '_ {
        self.bits.iter_ones().map(TileId)
    }

    /// Extract all present tiles as a vector
    pub fn to_vec(&self) -> Vec<TileId> {
        self.iter().collect()
    }

    /// Whether every tile of `self` is also in `other`
    pub fn is_subset(&self, other: &Self) -> bool {
        self.iter().all(|tile| other.contains(tile))
    }
}

impl fmt::Display for TileBitset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let indices: Vec<usize> = self.iter().map(TileId::index).collect();
        write!(f, "TileBitset({} tiles: {indices:?})", self.count())
    }
}
