//! Minimum-entropy cell selection and weighted tile sampling
//!
//! Entropy here is the number of remaining candidates of an uncollapsed cell.
//! Ties between equally constrained cells are broken uniformly at random and
//! tiles are drawn proportionally to their catalog weight. All randomness
//! flows through one seeded [`RandomSelector`], so a run is reproducible
//! from its seed.

use crate::algorithm::bitset::TileBitset;
use crate::analysis::weights::TileCatalog;
use crate::io::error::{Result, invariant_violation};
use crate::spatial::grid::Grid;
use crate::spatial::tiles::TileId;
use rand::{Rng, SeedableRng, rngs::StdRng};

/// Seeded random selector for reproducible stochastic choices
pub struct RandomSelector {
    rng: StdRng,
}

impl RandomSelector {
    /// Create a deterministic random selector
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Weighted random selection
    ///
    /// Returns an index into `weights` drawn from the cumulative distribution.
    /// Returns `None` when no weight is positive.
    pub fn weighted_choice(&mut self, weights: &[f64]) -> Option<usize> {
        let total: f64 = weights.iter().filter(|w| **w > 0.0).sum();
        if total <= 0.0 {
            return None;
        }

        let mut rand_val = self.rng.random::<f64>() * total;
        let mut last_positive = None;
        for (i, &weight) in weights.iter().enumerate() {
            if weight <= 0.0 {
                continue;
            }
            last_positive = Some(i);
            rand_val -= weight;
            if rand_val <= 0.0 {
                return Some(i);
            }
        }
        // Rounding can leave a sliver of mass past the last weight
        last_positive
    }

    /// Uniform choice of an index below `len`
    pub fn uniform_index(&mut self, len: usize) -> Option<usize> {
        (len > 0).then(|| self.rng.random_range(0..len))
    }
}

/// Uncollapsed cells sharing the smallest candidate count
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntropyScan {
    /// Smallest candidate count among uncollapsed cells
    pub min_entropy: usize,
    /// Every uncollapsed cell with that count, in row-major order
    pub cells: Vec<[usize; 2]>,
}

/// Scan all uncollapsed cells for the minimum entropy
///
/// Returns `None` once every cell is collapsed.
pub fn minimum_entropy_cells(grid: &Grid) -> Option<EntropyScan> {
    let mut scan: Option<EntropyScan> = None;

    for (position, cell) in grid.indexed_cells() {
        let Some(candidates) = cell.candidates() else {
            continue;
        };
        let entropy = candidates.count();

        let is_new_minimum = scan
            .as_ref()
            .is_none_or(|current| entropy < current.min_entropy);

        if is_new_minimum {
            scan = Some(EntropyScan {
                min_entropy: entropy,
                cells: vec![position],
            });
        } else if let Some(current) = scan.as_mut() {
            if entropy == current.min_entropy {
                current.cells.push(position);
            }
        }
    }

    scan
}

/// Pick one of the tied minimum-entropy cells uniformly
///
/// # Errors
///
/// Returns an invariant violation if the scan holds no cells
pub fn choose_cell(scan: &EntropyScan, selector: &mut RandomSelector) -> Result<[usize; 2]> {
    selector
        .uniform_index(scan.cells.len())
        .and_then(|index| scan.cells.get(index).copied())
        .ok_or_else(|| invariant_violation("cell selection", &"entropy scan holds no cells"))
}

/// Draw one tile from `candidates` proportionally to catalog weight
///
/// Candidates are visited in ascending [`TileId`] order.
///
/// # Errors
///
/// Returns an invariant violation if a candidate is not in the catalog or
/// the candidate set is empty
pub fn sample_tile(
    candidates: &TileBitset,
    catalog: &TileCatalog,
    selector: &mut RandomSelector,
) -> Result<TileId> {
    let tiles = candidates.to_vec();
    let weights = tiles
        .iter()
        .map(|&tile| catalog.weight(tile))
        .collect::<Result<Vec<f64>>>()?;

    selector
        .weighted_choice(&weights)
        .and_then(|index| tiles.get(index).copied())
        .ok_or_else(|| invariant_violation("tile sampling", &"no candidate carries weight"))
}
