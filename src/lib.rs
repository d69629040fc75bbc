//! Simple-tiled wave function collapse
//!
//! A source bitmap is cut into overlapping tiles, the unique tiles become a
//! weighted catalog, and tiles whose facing edges agree are recorded as
//! compatible neighbours. Generation starts with every cell of an output grid
//! admitting every tile, then repeatedly collapses the lowest-entropy cell to a
//! weighted random tile and narrows its neighbours, until the grid is filled
//! or a cell runs out of candidates.

#![forbid(unsafe_code)]

/// Adjacency rules, entropy selection, propagation and the collapse loop
pub mod algorithm;
/// Source bitmap loading, tile cataloguing and output statistics
pub mod analysis;
/// Configuration, errors, rendering, progress and the command line
pub mod io;
/// Tiles and the output grid
pub mod spatial;

pub use io::error::{AlgorithmError, Result};
