//! Tile frequency statistics of generated grids
//!
//! Weighted sampling is meant to reproduce the tile distribution of the
//! source bitmap. These statistics measure how closely a finished grid
//! follows the catalog weights.

use crate::analysis::weights::TileCatalog;
use crate::spatial::grid::Grid;

/// Observed tile frequencies of a grid compared against catalog weights
#[derive(Clone, Debug, PartialEq)]
pub struct OutputStatistics {
    counts: Vec<usize>,
    collapsed: usize,
    total_cells: usize,
}

impl OutputStatistics {
    /// Count the chosen tile of every collapsed cell
    ///
    /// Tiles outside the catalog are ignored.
    pub fn from_grid(grid: &Grid, catalog: &TileCatalog) -> Self {
        let mut counts = vec![0; catalog.len()];
        let mut collapsed = 0;

        for (_, cell) in grid.indexed_cells() {
            if let Some(tile) = cell.chosen() {
                if let Some(count) = counts.get_mut(tile.index()) {
                    *count += 1;
                    collapsed += 1;
                }
            }
        }

        Self {
            counts,
            collapsed,
            total_cells: grid.len(),
        }
    }

    /// Occurrences of each catalog tile, indexed by tile handle
    pub fn counts(&self) -> &[usize] {
        &self.counts
    }

    /// Number of collapsed cells counted
    pub const fn collapsed(&self) -> usize {
        self.collapsed
    }

    /// Fraction of the grid that is collapsed
    pub fn coverage(&self) -> f64 {
        if self.total_cells == 0 {
            0.0
        } else {
            self.collapsed as f64 / self.total_cells as f64
        }
    }

    /// Observed relative frequency of each tile among collapsed cells
    pub fn frequencies(&self) -> Vec<f64> {
        if self.collapsed == 0 {
            return vec![0.0; self.counts.len()];
        }
        let total = self.collapsed as f64;
        self.counts.iter().map(|&c| c as f64 / total).collect()
    }

    /// Number of distinct tiles used at least once
    pub fn distinct_tiles(&self) -> usize {
        self.counts.iter().filter(|&&c| c > 0).count()
    }

    /// Total variation distance between observed frequencies and `weights`
    ///
    /// Half the sum of absolute differences; 0 for identical distributions
    /// and 1 for disjoint ones.
    pub fn total_variation_distance(&self, weights: &[f64]) -> f64 {
        let frequencies = self.frequencies();
        let len = frequencies.len().max(weights.len());
        let sum: f64 = (0..len)
            .map(|i| {
                let observed = frequencies.get(i).copied().unwrap_or(0.0);
                let expected = weights.get(i).copied().unwrap_or(0.0);
                (observed - expected).abs()
            })
            .sum();
        sum / 2.0
    }
}
