use crate::{
    algorithm::adjacency::AdjacencyIndex,
    algorithm::bitset::TileBitset,
    algorithm::propagation::propagate,
    algorithm::selection::{RandomSelector, choose_cell, minimum_entropy_cells, sample_tile},
    analysis::weights::TileCatalog,
    io::configuration::GenerationConfig,
    io::error::{Result, invariant_violation},
    spatial::grid::{Cell, Grid},
    spatial::tiles::{Symbol, TileId},
};
use log::debug;
use ndarray::Array2;
use std::sync::Arc;

/// Catalog and adjacency index built once per source bitmap
///
/// Read-only after construction, so one model can back any number of runs,
/// including runs on other threads.
#[derive(Clone, Debug)]
pub struct TileModel {
    catalog: TileCatalog,
    adjacency: AdjacencyIndex,
    all_tiles: Arc<TileBitset>,
}

impl TileModel {
    /// Extract the catalog from `bitmap` and derive its adjacency index
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The configuration is invalid
    /// - The tile size exceeds the smallest bitmap dimension
    /// - The bitmap is empty
    pub fn build(bitmap: &Array2<Symbol>, config: &GenerationConfig) -> Result<Self> {
        config.validate()?;
        let catalog = TileCatalog::build(bitmap, config.tile_width, config.tile_height)?;
        let adjacency = AdjacencyIndex::build(catalog.tiles(), config.adjacency);
        Self::from_parts(catalog, adjacency)
    }

    /// Pair a catalog with an externally built adjacency index
    ///
    /// # Errors
    ///
    /// Returns an invariant violation if the index does not cover exactly the
    /// catalog's tiles
    pub fn from_parts(catalog: TileCatalog, adjacency: AdjacencyIndex) -> Result<Self> {
        if adjacency.tile_count() != catalog.len() {
            return Err(invariant_violation(
                "model assembly",
                &format!(
                    "adjacency covers {} tiles but the catalog holds {}",
                    adjacency.tile_count(),
                    catalog.len()
                ),
            ));
        }

        let all_tiles = Arc::new(TileBitset::all(catalog.len()));
        Ok(Self {
            catalog,
            adjacency,
            all_tiles,
        })
    }

    /// Unique tiles and their weights
    pub const fn catalog(&self) -> &TileCatalog {
        &self.catalog
    }

    /// Directional compatibility rules
    pub const fn adjacency(&self) -> &AdjacencyIndex {
        &self.adjacency
    }

    /// Start a run on a fresh `grid_height x grid_width` grid
    ///
    /// # Errors
    ///
    /// Returns an error if either grid dimension is zero
    pub fn engine(
        &self,
        grid_height: usize,
        grid_width: usize,
        seed: u64,
    ) -> Result<CollapseEngine<'_>> {
        let grid = Grid::new(grid_height, grid_width, &self.all_tiles)?;
        Ok(CollapseEngine {
            model: self,
            grid,
            selector: RandomSelector::new(seed),
            state: RunState::Running,
            collapses: 0,
            last_collapse: None,
        })
    }

    /// Run a fresh grid to completion or contradiction
    ///
    /// # Errors
    ///
    /// Returns an error if the grid cannot be created or an internal
    /// invariant is broken; a contradiction is a normal [`RunResult`]
    pub fn generate(&self, grid_height: usize, grid_width: usize, seed: u64) -> Result<RunResult> {
        self.engine(grid_height, grid_width, seed)?.collapse_grid()
    }
}

/// Lifecycle of one run
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunState {
    /// Uncollapsed cells remain and none has run out of candidates
    Running,
    /// Every cell is collapsed
    Done,
    /// The cell at (row, col) ran out of candidates
    Contradiction([usize; 2]),
}

/// Terminal outcome of a run
#[derive(Clone, Debug)]
pub enum RunResult {
    /// Every cell collapsed
    Done(Grid),
    /// A cell ran out of candidates; no backtracking is attempted
    Contradiction {
        /// Grid as it stood when the contradiction surfaced
        grid: Grid,
        /// Failing cell as (row, col)
        cell: [usize; 2],
    },
}

impl RunResult {
    /// Whether the run finished without contradiction
    pub const fn is_done(&self) -> bool {
        matches!(self, Self::Done(_))
    }

    /// Failing cell, if the run contradicted
    pub const fn contradiction(&self) -> Option<[usize; 2]> {
        match self {
            Self::Done(_) => None,
            Self::Contradiction { cell, .. } => Some(*cell),
        }
    }

    /// Final grid
    pub const fn grid(&self) -> &Grid {
        match self {
            Self::Done(grid) | Self::Contradiction { grid, .. } => grid,
        }
    }

    /// Take ownership of the final grid
    pub fn into_grid(self) -> Grid {
        match self {
            Self::Done(grid) | Self::Contradiction { grid, .. } => grid,
        }
    }
}

/// Collapse loop over one exclusively owned grid
///
/// Each call to [`Self::step`] selects the minimum-entropy cell, samples a
/// tile for it, collapses it and propagates to its neighbours. The grid is
/// well-formed between steps, so callers may stop at any step boundary.
pub struct CollapseEngine<'a> {
    model: &'a TileModel,
    grid: Grid,
    selector: RandomSelector,
    state: RunState,
    collapses: usize,
    last_collapse: Option<([usize; 2], TileId)>,
}

impl CollapseEngine<'_> {
    /// Current lifecycle state
    pub const fn state(&self) -> RunState {
        self.state
    }

    /// Grid as it stands after the last step
    pub const fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Number of cells collapsed so far
    pub const fn collapses(&self) -> usize {
        self.collapses
    }

    /// Cell and tile of the most recent collapse
    pub const fn last_collapse(&self) -> Option<([usize; 2], TileId)> {
        self.last_collapse
    }

    /// Perform one select-collapse-propagate iteration
    ///
    /// Does nothing once the run is terminal.
    ///
    /// # Errors
    ///
    /// Returns an invariant violation if the engine state and the grid
    /// disagree (never expected in practice)
    pub fn step(&mut self) -> Result<RunState> {
        if self.state != RunState::Running {
            return Ok(self.state);
        }

        let Some(scan) = minimum_entropy_cells(&self.grid) else {
            self.state = RunState::Done;
            return Ok(self.state);
        };

        // An uncollapsed cell without candidates is a contradiction even when
        // no propagation reported it
        if scan.min_entropy == 0 {
            if let Some(&cell) = scan.cells.first() {
                self.state = RunState::Contradiction(cell);
                return Ok(self.state);
            }
        }

        let position = choose_cell(&scan, &mut self.selector)?;
        let candidates = self
            .grid
            .cell(position[0], position[1])
            .and_then(Cell::candidates)
            .ok_or_else(|| {
                invariant_violation(
                    "collapse",
                    &format!("selected cell {position:?} is not in superposition"),
                )
            })?;
        let tile = sample_tile(candidates, &self.model.catalog, &mut self.selector)?;

        self.grid.cell_mut(position)?.collapse(tile)?;
        self.collapses += 1;
        self.last_collapse = Some((position, tile));
        debug!(
            "Collapse {} at {position:?} to {tile} (entropy {})",
            self.collapses, scan.min_entropy
        );

        let report = propagate(&mut self.grid, &self.model.adjacency, position, tile)?;

        self.state = if let Some(cell) = report.contradiction {
            RunState::Contradiction(cell)
        } else if self.collapses == self.grid.len() {
            RunState::Done
        } else {
            RunState::Running
        };

        Ok(self.state)
    }

    /// Step until the run is done or contradicts
    ///
    /// At most one step per cell is taken before the run is terminal.
    ///
    /// # Errors
    ///
    /// Propagates invariant violations raised by [`Self::step`]
    pub fn collapse_grid(mut self) -> Result<RunResult> {
        while self.step()? == RunState::Running {}
        self.into_result()
    }

    /// Convert a terminal engine into its result
    ///
    /// # Errors
    ///
    /// Returns an invariant violation if the run is still in progress
    pub fn into_result(self) -> Result<RunResult> {
        match self.state {
            RunState::Done => Ok(RunResult::Done(self.grid)),
            RunState::Contradiction(cell) => Ok(RunResult::Contradiction {
                grid: self.grid,
                cell,
            }),
            RunState::Running => Err(invariant_violation(
                "run result",
                &format!(
                    "run stopped after {} of {} collapses",
                    self.collapses,
                    self.grid.len()
                ),
            )),
        }
    }
}
