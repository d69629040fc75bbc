//! Tile catalog with occurrence weights sampled from the source bitmap
//!
//! Every bitmap position is the top-left corner of exactly one tile (windows
//! wrap around both axes), so an `H x W` bitmap always yields `H * W` tiles.
//! Unique tiles are stored once, in first-seen scan order, and referenced by
//! [`TileId`] everywhere else.

use crate::io::error::{AlgorithmError, Result, invariant_violation};
use crate::spatial::tiles::{Symbol, Tile, TileId, extract_window};
use log::info;
use ndarray::Array2;
use std::collections::HashMap;

/// Arena of unique tiles with their relative frequencies
#[derive(Clone, Debug)]
pub struct TileCatalog {
    tiles: Vec<Tile>,
    weights: Vec<f64>,
    counts: Vec<usize>,
    occurrences: Vec<TileId>,
    lookup: HashMap<Tile, TileId>,
    tile_width: usize,
    tile_height: usize,
}

impl TileCatalog {
    /// Extract, deduplicate and weigh all tiles of `bitmap`
    ///
    /// Scans positions row by row. The weight of a tile is its occurrence
    /// count divided by the number of bitmap positions.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The bitmap is empty
    /// - A tile dimension is zero
    /// - A tile dimension exceeds the smallest bitmap dimension
    pub fn build(bitmap: &Array2<Symbol>, tile_width: usize, tile_height: usize) -> Result<Self> {
        let (bitmap_height, bitmap_width) = bitmap.dim();
        if bitmap_height == 0 || bitmap_width == 0 {
            return Err(AlgorithmError::InvalidSourceData {
                reason: "Source bitmap has no pixels".to_string(),
            });
        }
        if tile_width == 0 || tile_height == 0 {
            return Err(crate::io::error::invalid_parameter(
                "tile_size",
                &format!("{tile_width}x{tile_height}"),
                &"tile dimensions must be at least 1",
            ));
        }

        let min_dimension = bitmap_width.min(bitmap_height);
        if tile_width > min_dimension || tile_height > min_dimension {
            return Err(AlgorithmError::TileDimensions {
                tile_width,
                tile_height,
                bitmap_width,
                bitmap_height,
            });
        }

        let mut tiles: Vec<Tile> = Vec::new();
        let mut counts: Vec<usize> = Vec::new();
        let mut lookup: HashMap<Tile, TileId> = HashMap::new();
        let mut occurrences = Vec::with_capacity(bitmap_height * bitmap_width);

        for row in 0..bitmap_height {
            for col in 0..bitmap_width {
                let tile = extract_window(bitmap, row, col, tile_width, tile_height).ok_or_else(
                    || invariant_violation("tile extraction", &"window outside a non-empty bitmap"),
                )?;

                let id = if let Some(&id) = lookup.get(&tile) {
                    id
                } else {
                    let id = TileId(tiles.len());
                    lookup.insert(tile.clone(), id);
                    tiles.push(tile);
                    counts.push(0);
                    id
                };

                if let Some(count) = counts.get_mut(id.index()) {
                    *count += 1;
                }
                occurrences.push(id);
            }
        }

        let total = (bitmap_height * bitmap_width) as f64;
        let weights = counts.iter().map(|&c| c as f64 / total).collect();

        info!(
            "Catalog: {} unique {tile_width}x{tile_height} tiles from a {bitmap_width}x{bitmap_height} bitmap",
            tiles.len()
        );

        Ok(Self {
            tiles,
            weights,
            counts,
            occurrences,
            lookup,
            tile_width,
            tile_height,
        })
    }

    /// Number of unique tiles
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    /// Whether the catalog holds no tiles
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Unique tiles indexed by [`TileId`]
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    /// Handles of every unique tile in ascending order
    pub fn ids(&self) -> impl Iterator<Item = TileId> + '_ {
        (0..self.tiles.len()).map(TileId)
    }

    /// Resolve a handle to its tile
    ///
    /// # Errors
    ///
    /// Returns an invariant violation if the handle is not in the catalog
    pub fn tile(&self, id: TileId) -> Result<&Tile> {
        self.tiles.get(id.index()).ok_or_else(|| self.unknown(id))
    }

    /// Relative frequency of a tile, in (0, 1]
    ///
    /// # Errors
    ///
    /// Returns an invariant violation if the handle is not in the catalog
    pub fn weight(&self, id: TileId) -> Result<f64> {
        self.weights
            .get(id.index())
            .copied()
            .ok_or_else(|| self.unknown(id))
    }

    /// Weights indexed by [`TileId`], summing to 1
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// Occurrence counts indexed by [`TileId`]
    pub fn counts(&self) -> &[usize] {
        &self.counts
    }

    /// Look up the handle of a tile by value
    pub fn id_of(&self, tile: &Tile) -> Option<TileId> {
        self.lookup.get(tile).copied()
    }

    /// Every extracted tile in scan order, duplicates included
    pub fn all_tiles(&self) -> impl Iterator<Item = &Tile> + '_ {
        self.occurrences
            .iter()
            .filter_map(|id| self.tiles.get(id.index()))
    }

    /// Handles of every extracted tile in scan order
    pub fn occurrences(&self) -> &[TileId] {
        &self.occurrences
    }

    /// Tile size as (width, height)
    pub const fn tile_dimensions(&self) -> (usize, usize) {
        (self.tile_width, self.tile_height)
    }

    fn unknown(&self, id: TileId) -> AlgorithmError {
        invariant_violation(
            "catalog lookup",
            &format!("tile {id} is not in a catalog of {} tiles", self.tiles.len()),
        )
    }
}
