//! Constraint propagation from a freshly collapsed cell
//!
//! Propagation is a single hop: the four direct neighbours of the collapsed
//! cell are intersected with the tiles its chosen tile admits in that
//! direction. Narrowed neighbours are not requeued, so a neighbour of a
//! neighbour only learns about the collapse when it is itself adjacent to a
//! later collapse. A contradiction that needs two hops to surface is
//! therefore detected late, at the collapse that finally touches it.

use crate::algorithm::adjacency::{AdjacencyIndex, Direction};
use crate::io::error::Result;
use crate::spatial::grid::Grid;
use crate::spatial::tiles::TileId;
use log::debug;

/// Outcome of propagating one collapse
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropagationReport {
    /// Neighbours whose candidate set shrank, with the remaining count
    pub narrowed: Vec<([usize; 2], usize)>,
    /// First neighbour left without candidates, in propagation order
    pub contradiction: Option<[usize; 2]>,
}

impl PropagationReport {
    /// Whether a neighbour ran out of candidates
    pub const fn is_contradiction(&self) -> bool {
        self.contradiction.is_some()
    }
}

/// Narrow the uncollapsed neighbours of `origin` after it collapsed to `chosen`
///
/// Every in-bounds uncollapsed neighbour is narrowed, even after a
/// contradiction was found, so the grid is left in a consistent state.
///
/// # Errors
///
/// Returns an invariant violation if `origin` is outside the grid or
/// `chosen` is not covered by the adjacency index
pub fn propagate(
    grid: &mut Grid,
    adjacency: &AdjacencyIndex,
    origin: [usize; 2],
    chosen: TileId,
) -> Result<PropagationReport> {
    // Validates the origin before touching neighbours
    grid.cell_mut(origin)?;

    let (rows, cols) = (grid.height(), grid.width());
    let mut report = PropagationReport::default();

    for direction in Direction::ALL {
        let Some(position) = direction.neighbor(origin[0], origin[1], rows, cols) else {
            continue;
        };

        let cell = grid.cell_mut(position)?;
        if cell.is_collapsed() {
            continue;
        }

        let before = cell.entropy();
        let remaining = cell.restrict(adjacency.allowed(chosen, direction)?)?;

        if remaining < before {
            report.narrowed.push((position, remaining));
        }
        if remaining == 0 && report.contradiction.is_none() {
            debug!("Contradiction at {position:?} after {chosen} collapsed at {origin:?}");
            report.contradiction = Some(position);
        }
    }

    Ok(report)
}
