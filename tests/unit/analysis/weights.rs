//! Tests for tile extraction, deduplication and weighting

#[cfg(test)]
mod tests {
    use ndarray::{Array2, array};
    use tilewave::AlgorithmError;
    use tilewave::analysis::weights::TileCatalog;
    use tilewave::spatial::tiles::{Tile, TileId};

    fn checkerboard(size: usize) -> Array2<usize> {
        Array2::from_shape_fn((size, size), |(r, c)| (r + c) % 2)
    }

    // Tests a 4x4 checkerboard yields two 2x2 tiles of equal weight
    // Verified by dividing counts by the unique tile count
    #[test]
    #[allow(clippy::float_cmp)]
    fn test_checkerboard_catalog() {
        let catalog = TileCatalog::build(&checkerboard(4), 2, 2).expect("Failed to build catalog");

        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.weights(), &[0.5, 0.5]);
        assert_eq!(catalog.counts(), &[8, 8]);
        assert_eq!(catalog.tile_dimensions(), (2, 2));
    }

    // Tests unique tiles are numbered in first-seen scan order
    // Verified by scanning column-major
    #[test]
    fn test_first_seen_order() {
        let catalog = TileCatalog::build(&checkerboard(4), 2, 2).expect("Failed to build catalog");
        let first = Tile::new(array![[0, 1], [1, 0]]);
        let second = Tile::new(array![[1, 0], [0, 1]]);

        assert_eq!(catalog.id_of(&first), Some(TileId(0)));
        assert_eq!(catalog.id_of(&second), Some(TileId(1)));
        assert_eq!(catalog.id_of(&Tile::new(array![[0, 0], [0, 0]])), None);
    }

    // Tests every position contributes exactly one tile
    // Verified by skipping positions whose window wraps
    #[test]
    fn test_occurrences_cover_every_position() {
        let bitmap = array![[0, 1, 2], [3, 4, 5]];
        let catalog = TileCatalog::build(&bitmap, 2, 2).expect("Failed to build catalog");

        assert_eq!(catalog.occurrences().len(), 6);
        assert_eq!(catalog.all_tiles().count(), 6);
        assert_eq!(catalog.len(), 6);
        assert_eq!(catalog.counts().iter().sum::<usize>(), 6);
    }

    // Tests a uniform bitmap collapses to a single tile of weight 1
    // Verified by counting duplicate tiles as new entries
    #[test]
    fn test_uniform_bitmap_single_tile() {
        let bitmap = Array2::from_elem((5, 5), 3);
        let catalog = TileCatalog::build(&bitmap, 2, 2).expect("Failed to build catalog");

        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.weight(TileId(0)).ok(), Some(1.0));
        assert!(!catalog.is_empty());
    }

    // Tests weights are proportional to occurrence counts and sum to 1
    // Verified by using counts as weights directly
    #[test]
    #[allow(clippy::float_cmp)]
    fn test_weights_proportional() {
        let bitmap = array![[0, 0, 0, 1]];
        let catalog = TileCatalog::build(&bitmap, 1, 1).expect("Failed to build catalog");

        assert_eq!(catalog.weights(), &[0.75, 0.25]);
        let total: f64 = catalog.weights().iter().sum();
        assert!((total - 1.0).abs() < 1e-12);
    }

    // Tests tiles larger than the bitmap are a dimension error
    // Verified by comparing against the larger bitmap dimension
    #[test]
    fn test_tile_larger_than_bitmap() {
        let bitmap = Array2::from_elem((2, 5), 0);
        let result = TileCatalog::build(&bitmap, 3, 3);
        assert!(matches!(
            result,
            Err(AlgorithmError::TileDimensions {
                tile_width: 3,
                tile_height: 3,
                bitmap_width: 5,
                bitmap_height: 2,
            })
        ));
    }

    // Tests empty bitmaps and zero tile sizes are rejected
    // Verified by removing the empty bitmap guard
    #[test]
    fn test_degenerate_inputs() {
        let empty = Array2::<usize>::zeros((0, 3));
        assert!(matches!(
            TileCatalog::build(&empty, 1, 1),
            Err(AlgorithmError::InvalidSourceData { .. })
        ));
        assert!(matches!(
            TileCatalog::build(&checkerboard(2), 0, 1),
            Err(AlgorithmError::InvalidParameter { .. })
        ));
    }

    // Tests unknown handles are reported as invariant violations
    // Verified by returning a default weight for unknown tiles
    #[test]
    fn test_unknown_handle() {
        let catalog = TileCatalog::build(&checkerboard(2), 1, 1).expect("Failed to build catalog");
        assert!(matches!(
            catalog.weight(TileId(2)),
            Err(AlgorithmError::InvariantViolation { .. })
        ));
        assert!(catalog.tile(TileId(2)).is_err());
        assert_eq!(catalog.ids().collect::<Vec<_>>(), vec![TileId(0), TileId(1)]);
    }
}
