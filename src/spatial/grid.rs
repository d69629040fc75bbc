//! Output grid of cells in superposition or collapsed to one tile
//!
//! The grid's dimensions are fixed at construction. Every fresh cell shares
//! one candidate set through an `Arc`; a cell only gets its own copy the
//! first time propagation narrows it. Mutation is crate-private so the
//! collapse engine is the single place that maintains cell invariants.

use crate::algorithm::bitset::TileBitset;
use crate::io::error::{Result, invalid_parameter, invariant_violation};
use crate::spatial::tiles::TileId;
use ndarray::Array2;
use std::sync::Arc;

/// State of one grid cell
#[derive(Clone, Debug)]
pub enum CellState {
    /// Remaining candidate tiles; empty means contradiction
    Superposed(Arc<TileBitset>),
    /// Fixed to a single tile
    Collapsed(TileId),
}

/// One position of the output grid
#[derive(Clone, Debug)]
pub struct Cell {
    state: CellState,
}

impl Cell {
    /// Uncollapsed cell sharing `candidates`
    pub fn superposed(candidates: Arc<TileBitset>) -> Self {
        Self {
            state: CellState::Superposed(candidates),
        }
    }

    /// Current state
    pub const fn state(&self) -> &CellState {
        &self.state
    }

    /// Whether the cell holds a single chosen tile
    pub const fn is_collapsed(&self) -> bool {
        matches!(self.state, CellState::Collapsed(_))
    }

    /// Chosen tile, once collapsed
    pub const fn chosen(&self) -> Option<TileId> {
        match &self.state {
            CellState::Collapsed(tile) => Some(*tile),
            CellState::Superposed(_) => None,
        }
    }

    /// Remaining candidates while uncollapsed
    pub fn candidates(&self) -> Option<&TileBitset> {
        match &self.state {
            CellState::Superposed(candidates) => Some(candidates.as_ref()),
            CellState::Collapsed(_) => None,
        }
    }

    /// Number of remaining candidates (0 once collapsed)
    pub fn entropy(&self) -> usize {
        self.candidates().map_or(0, TileBitset::count)
    }

    /// Uncollapsed with no candidates left
    pub fn is_contradiction(&self) -> bool {
        self.candidates().is_some_and(TileBitset::is_empty)
    }

    /// Fix the cell to `tile` and drop its candidates
    pub(crate) fn collapse(&mut self, tile: TileId) -> Result<()> {
        match &self.state {
            CellState::Collapsed(existing) => {
                return Err(invariant_violation(
                    "collapse",
                    &format!("cell already collapsed to tile {existing}"),
                ));
            }
            CellState::Superposed(candidates) => {
                if !candidates.contains(tile) {
                    return Err(invariant_violation(
                        "collapse",
                        &format!("tile {tile} is not a candidate of the cell"),
                    ));
                }
            }
        }

        self.state = CellState::Collapsed(tile);
        Ok(())
    }

    /// Intersect the candidates with `allowed`
    ///
    /// Returns the number of candidates left.
    pub(crate) fn restrict(&mut self, allowed: &TileBitset) -> Result<usize> {
        match &mut self.state {
            CellState::Collapsed(existing) => Err(invariant_violation(
                "propagate",
                &format!("cell already collapsed to tile {existing}"),
            )),
            CellState::Superposed(candidates) => {
                if !candidates.is_subset(allowed) {
                    Arc::make_mut(candidates).intersect_with(allowed);
                }
                Ok(candidates.count())
            }
        }
    }
}

/// Fixed-size 2D array of cells indexed by (row, col)
#[derive(Clone, Debug)]
pub struct Grid {
    cells: Array2<Cell>,
}

impl Grid {
    /// Create a `height x width` grid with every cell holding `candidates`
    ///
    /// # Errors
    ///
    /// Returns an error if either dimension is zero or `candidates` is empty
    pub fn new(height: usize, width: usize, candidates: &Arc<TileBitset>) -> Result<Self> {
        if height == 0 || width == 0 {
            return Err(invalid_parameter(
                "grid_size",
                &format!("{width}x{height}"),
                &"grid dimensions must be at least 1",
            ));
        }
        if candidates.is_empty() {
            return Err(invariant_violation(
                "grid initialization",
                &"initial candidate set is empty",
            ));
        }

        let cells = Array2::from_shape_fn((height, width), |_| {
            Cell::superposed(Arc::clone(candidates))
        });

        Ok(Self { cells })
    }

    /// Number of rows
    pub fn height(&self) -> usize {
        self.cells.nrows()
    }

    /// Number of columns
    pub fn width(&self) -> usize {
        self.cells.ncols()
    }

    /// Total number of cells
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Always false; a grid has at least one cell
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Cell at (`row`, `col`)
    pub fn cell(&self, row: usize, col: usize) -> Option<&Cell> {
        self.cells.get([row, col])
    }

    /// Iterate `([row, col], cell)` in row-major order
    pub fn indexed_cells(&self) -> impl Iterator<Item = ([usize; 2], &Cell)> + '_ {
        self.cells
            .indexed_iter()
            .map(|((row, col), cell)| ([row, col], cell))
    }

    /// Number of collapsed cells
    pub fn collapsed_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_collapsed()).count()
    }

    /// Whether every cell is collapsed
    pub fn is_fully_collapsed(&self) -> bool {
        self.cells.iter().all(Cell::is_collapsed)
    }

    /// Chosen tile per cell, `None` where uncollapsed
    pub fn chosen_tiles(&self) -> Array2<Option<TileId>> {
        self.cells.map(Cell::chosen)
    }

    pub(crate) fn cell_mut(&mut self, position: [usize; 2]) -> Result<&mut Cell> {
        let (height, width) = self.cells.dim();
        self.cells.get_mut(position).ok_or_else(|| {
            invariant_violation(
                "grid access",
                &format!("cell {position:?} is outside the {width}x{height} grid"),
            )
        })
    }
}
