//! Spatial data structures
//!
//! This module contains:
//! - Tile data structures and toroidal window extraction
//! - The output grid of cells and their candidate sets

/// Output grid and cell states
pub mod grid;
/// Tile data structures and extraction
pub mod tiles;

pub use grid::{Cell, CellState, Grid};
