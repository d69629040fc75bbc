/// Directional compatibility between tiles
pub mod adjacency;
/// Bit-vector sets of tile handles
pub mod bitset;
/// Tile model, collapse engine and run results
pub mod executor;
/// Single-hop neighbour narrowing
pub mod propagation;
/// Minimum-entropy cell selection and weighted tile sampling
pub mod selection;
