//! Directional compatibility between catalog tiles
//!
//! Tile `b` may sit next to tile `a` in a direction when the touching edges
//! agree. `Up` compares `a.top` with `b.bottom`, `Down` compares `a.bottom`
//! with `b.top`, and likewise for `Left`/`Right` with the columns. The same
//! predicate evaluated from `b` in the opposite direction compares the same
//! pair of edges, so the index is symmetric by construction.

use crate::algorithm::bitset::TileBitset;
use crate::io::error::{Result, invariant_violation};
use crate::spatial::tiles::{Tile, TileId, flip_horizontal, flip_vertical};
use log::info;

/// Neighbour direction on the output grid
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Row above
    Up,
    /// Row below
    Down,
    /// Column to the left
    Left,
    /// Column to the right
    Right,
}

impl Direction {
    /// All directions in propagation order
    pub const ALL: [Self; 4] = [Self::Up, Self::Down, Self::Left, Self::Right];

    /// Direction pointing back at the origin
    pub const fn opposite(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    /// Grid offset as (row, col)
    pub const fn offset(self) -> (isize, isize) {
        match self {
            Self::Up => (-1, 0),
            Self::Down => (1, 0),
            Self::Left => (0, -1),
            Self::Right => (0, 1),
        }
    }

    /// Slot of this direction in per-tile rule arrays
    pub const fn index(self) -> usize {
        match self {
            Self::Up => 0,
            Self::Down => 1,
            Self::Left => 2,
            Self::Right => 3,
        }
    }

    /// Neighbouring cell inside a `rows x cols` grid, if any
    pub fn neighbor(self, row: usize, col: usize, rows: usize, cols: usize) -> Option<[usize; 2]> {
        let (dr, dc) = self.offset();
        let r = row.checked_add_signed(dr)?;
        let c = col.checked_add_signed(dc)?;
        (r < rows && c < cols).then_some([r, c])
    }
}

/// Edge comparison used when building the index
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum AdjacencyMode {
    /// Touching edges must be identical
    #[default]
    Exact,
    /// Touching edges must be identical or mirror images of each other
    Mirrored,
}

impl AdjacencyMode {
    /// Mode for a `mirror_aware` flag
    pub const fn from_mirror_aware(mirror_aware: bool) -> Self {
        if mirror_aware {
            Self::Mirrored
        } else {
            Self::Exact
        }
    }

    /// Whether tile `b` may sit in `direction` from tile `a`
    pub fn compatible(self, a: &Tile, b: &Tile, direction: Direction) -> bool {
        let (own, other) = match direction {
            Direction::Up => (a.top(), b.bottom()),
            Direction::Down => (a.bottom(), b.top()),
            Direction::Left => (a.left(), b.right()),
            Direction::Right => (a.right(), b.left()),
        };

        if own == other {
            return true;
        }

        match self {
            Self::Exact => false,
            Self::Mirrored => {
                let mirrored = match direction {
                    Direction::Up | Direction::Down => flip_vertical(other),
                    Direction::Left | Direction::Right => flip_horizontal(other),
                };
                own == mirrored.as_slice()
            }
        }
    }
}

/// For every tile and direction, the set of tiles allowed as that neighbour
#[derive(Clone, Debug)]
pub struct AdjacencyIndex {
    rules: Vec<[TileBitset; 4]>,
}

impl AdjacencyIndex {
    /// Compare every ordered pair of `tiles` (including a tile with itself)
    ///
    /// Handles are positions in `tiles`, matching the catalog arena.
    pub fn build(tiles: &[Tile], mode: AdjacencyMode) -> Self {
        let index = Self::from_predicate(tiles.len(), |a, direction, b| {
            match (tiles.get(a.index()), tiles.get(b.index())) {
                (Some(tile_a), Some(tile_b)) => mode.compatible(tile_a, tile_b, direction),
                _ => false,
            }
        });

        info!(
            "Adjacency ({mode:?}): {} rules over {} tiles",
            index.rule_count(),
            tiles.len()
        );
        index
    }

    /// Build an index from an arbitrary predicate over (a, direction, b)
    ///
    /// The predicate is taken as given; use [`Self::is_symmetric`] to check a
    /// hand-written rule set.
    pub fn from_predicate<F>(tile_count: usize, mut admits: F) -> Self
    where
        F: FnMut(TileId, Direction, TileId) -> bool,
    {
        let mut rules = Vec::with_capacity(tile_count);
        for a in (0..tile_count).map(TileId) {
            let mut sets = [
                TileBitset::new(tile_count),
                TileBitset::new(tile_count),
                TileBitset::new(tile_count),
                TileBitset::new(tile_count),
            ];
            for direction in Direction::ALL {
                for b in (0..tile_count).map(TileId) {
                    if admits(a, direction, b) {
                        if let Some(set) = sets.get_mut(direction.index()) {
                            set.insert(b);
                        }
                    }
                }
            }
            rules.push(sets);
        }

        Self { rules }
    }

    /// Number of tiles covered by the index
    pub fn tile_count(&self) -> usize {
        self.rules.len()
    }

    /// Tiles allowed in `direction` from `tile`
    ///
    /// # Errors
    ///
    /// Returns an invariant violation if `tile` is not covered by the index
    pub fn allowed(&self, tile: TileId, direction: Direction) -> Result<&TileBitset> {
        self.rules
            .get(tile.index())
            .and_then(|sets| sets.get(direction.index()))
            .ok_or_else(|| {
                invariant_violation(
                    "adjacency lookup",
                    &format!(
                        "tile {tile} is not in an index of {} tiles",
                        self.rules.len()
                    ),
                )
            })
    }

    /// Whether `b` may sit in `direction` from `a`
    pub fn admits(&self, a: TileId, direction: Direction, b: TileId) -> bool {
        self.allowed(a, direction)
            .is_ok_and(|set| set.contains(b))
    }

    /// Check `b in adj[a][d]` iff `a in adj[b][opposite(d)]` for all pairs
    pub fn is_symmetric(&self) -> bool {
        let ids = || (0..self.rules.len()).map(TileId);
        ids().all(|a| {
            Direction::ALL.iter().all(|&direction| {
                ids().all(|b| {
                    self.admits(a, direction, b) == self.admits(b, direction.opposite(), a)
                })
            })
        })
    }

    /// Total number of (tile, direction, neighbour) rules
    pub fn rule_count(&self) -> usize {
        self.rules
            .iter()
            .flat_map(|sets| sets.iter())
            .map(TileBitset::count)
            .sum()
    }
}
