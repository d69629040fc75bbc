//! Tiles sampled from a source bitmap and their edge projections
//!
//! A tile is an immutable block of symbols. Its four edges are projected once
//! at construction so adjacency checks only compare short sequences. Sampling
//! wraps around both axes of the bitmap, so every bitmap position yields a
//! complete tile.

use crate::io::error::{AlgorithmError, Result};
use ndarray::{Array2, Axis};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Opaque token for one quantized colour of the source bitmap
pub type Symbol = usize;

/// Handle of a unique tile inside a [`crate::analysis::weights::TileCatalog`]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TileId(pub usize);

impl TileId {
    /// Position of the tile in the catalog's arena
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for TileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Immutable block of symbols with precomputed edges
///
/// Equality and hashing only consider the symbol matrix; the edges are
/// derived from it.
#[derive(Clone, Debug)]
pub struct Tile {
    cells: Array2<Symbol>,
    top: Vec<Symbol>,
    bottom: Vec<Symbol>,
    left: Vec<Symbol>,
    right: Vec<Symbol>,
}

impl Tile {
    /// Build a tile from a `height x width` symbol matrix
    pub fn new(cells: Array2<Symbol>) -> Self {
        let mut rows = cells.axis_iter(Axis(0));
        let top = rows.next().map(|row| row.to_vec()).unwrap_or_default();
        let bottom = rows
            .next_back()
            .map_or_else(|| top.clone(), |row| row.to_vec());

        let mut columns = cells.axis_iter(Axis(1));
        let left = columns.next().map(|col| col.to_vec()).unwrap_or_default();
        let right = columns
            .next_back()
            .map_or_else(|| left.clone(), |col| col.to_vec());

        Self {
            cells,
            top,
            bottom,
            left,
            right,
        }
    }

    /// Build a tile from row slices
    ///
    /// # Errors
    ///
    /// Returns an error if there are no rows, a row is empty, or the rows have
    /// different lengths
    pub fn from_rows(rows: &[&[Symbol]]) -> Result<Self> {
        let width = rows.first().map_or(0, |row| row.len());
        if width == 0 || rows.iter().any(|row| row.len() != width) {
            return Err(AlgorithmError::InvalidSourceData {
                reason: "Tile rows must be non-empty and of equal length".to_string(),
            });
        }

        let flat: Vec<Symbol> = rows.iter().flat_map(|row| row.iter().copied()).collect();
        let cells = Array2::from_shape_vec((rows.len(), width), flat).map_err(|e| {
            AlgorithmError::InvalidSourceData {
                reason: e.to_string(),
            }
        })?;

        Ok(Self::new(cells))
    }

    /// Symbol matrix indexed by (row, col)
    pub const fn cells(&self) -> &Array2<Symbol> {
        &self.cells
    }

    /// Number of symbol columns
    pub fn width(&self) -> usize {
        self.cells.ncols()
    }

    /// Number of symbol rows
    pub fn height(&self) -> usize {
        self.cells.nrows()
    }

    /// First row, left to right
    pub fn top(&self) -> &[Symbol] {
        &self.top
    }

    /// Last row, left to right
    pub fn bottom(&self) -> &[Symbol] {
        &self.bottom
    }

    /// First column, top to bottom
    pub fn left(&self) -> &[Symbol] {
        &self.left
    }

    /// Last column, top to bottom
    pub fn right(&self) -> &[Symbol] {
        &self.right
    }
}

impl PartialEq for Tile {
    fn eq(&self, other: &Self) -> bool {
        self.cells == other.cells
    }
}

impl Eq for Tile {}

impl Hash for Tile {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.cells.dim().hash(state);
        for symbol in &self.cells {
            symbol.hash(state);
        }
    }
}

/// Mirror an edge across the vertical axis (reverses a row edge)
pub fn flip_horizontal(edge: &[Symbol]) -> Vec<Symbol> {
    edge.iter().rev().copied().collect()
}

/// Mirror an edge across the horizontal axis (reverses a column edge)
pub fn flip_vertical(edge: &[Symbol]) -> Vec<Symbol> {
    edge.iter().rev().copied().collect()
}

/// Extract the tile whose top-left corner sits at (`row`, `col`)
///
/// Reads wrap toroidally, so cell (i, j) of the tile is
/// `bitmap[(row + i) mod height][(col + j) mod width]`. Returns `None` for an
/// empty bitmap or a zero tile size.
pub fn extract_window(
    bitmap: &Array2<Symbol>,
    row: usize,
    col: usize,
    tile_width: usize,
    tile_height: usize,
) -> Option<Tile> {
    let (height, width) = bitmap.dim();
    if height == 0 || width == 0 || tile_width == 0 || tile_height == 0 {
        return None;
    }

    let cells = Array2::from_shape_fn((tile_height, tile_width), |(i, j)| {
        bitmap
            .get(((row + i) % height, (col + j) % width))
            .copied()
            .unwrap_or_default()
    });

    Some(Tile::new(cells))
}
