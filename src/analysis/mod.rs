//! Source analysis and output measurement

/// PNG loading and colour quantization
pub mod patterns;
/// Tile frequency statistics of generated grids
pub mod statistics;
/// Tile catalog with occurrence weights
pub mod weights;
