//! Tests for directions, edge compatibility and the adjacency index

#[cfg(test)]
mod tests {
    use tilewave::AlgorithmError;
    use tilewave::algorithm::adjacency::{AdjacencyIndex, AdjacencyMode, Direction};
    use tilewave::spatial::tiles::{Tile, TileId};

    fn tile(rows: &[&[usize]]) -> Tile {
        Tile::from_rows(rows).expect("Failed to build tile")
    }

    // Tests opposite directions pair up and offsets cancel
    // Verified by mapping Left to Left in opposite()
    #[test]
    fn test_direction_opposites() {
        for direction in Direction::ALL {
            assert_eq!(direction.opposite().opposite(), direction);
            let (dr, dc) = direction.offset();
            let (or, oc) = direction.opposite().offset();
            assert_eq!((dr + or, dc + oc), (0, 0));
        }
    }

    // Tests neighbours stop at the grid border
    // Verified by wrapping neighbour coordinates
    #[test]
    fn test_neighbor_bounds() {
        assert_eq!(Direction::Up.neighbor(0, 0, 3, 3), None);
        assert_eq!(Direction::Left.neighbor(1, 0, 3, 3), None);
        assert_eq!(Direction::Down.neighbor(1, 1, 3, 3), Some([2, 1]));
        assert_eq!(Direction::Right.neighbor(1, 2, 3, 3), None);
        assert_eq!(Direction::Right.neighbor(1, 1, 3, 3), Some([1, 2]));
    }

    // Tests exact mode compares the facing edges
    // Verified by comparing a.top with b.top for Up
    #[test]
    fn test_exact_compatibility_uses_facing_edges() {
        let a = tile(&[&[1, 2], &[3, 4]]);
        let below = tile(&[&[3, 4], &[0, 0]]);
        let right = tile(&[&[2, 9], &[4, 9]]);

        assert!(AdjacencyMode::Exact.compatible(&a, &below, Direction::Down));
        assert!(AdjacencyMode::Exact.compatible(&below, &a, Direction::Up));
        assert!(AdjacencyMode::Exact.compatible(&a, &right, Direction::Right));
        assert!(AdjacencyMode::Exact.compatible(&right, &a, Direction::Left));
        assert!(!AdjacencyMode::Exact.compatible(&a, &below, Direction::Up));
    }

    // Tests mirrored mode also accepts reversed edges
    // Verified by reversing the own edge as well as the neighbour's
    #[test]
    fn test_mirrored_accepts_reversed_edge() {
        let a = tile(&[&[1, 2], &[3, 4]]);
        let reversed_below = tile(&[&[4, 3], &[0, 0]]);

        assert!(!AdjacencyMode::Exact.compatible(&a, &reversed_below, Direction::Down));
        assert!(AdjacencyMode::Mirrored.compatible(&a, &reversed_below, Direction::Down));
        assert!(AdjacencyMode::Mirrored.compatible(&reversed_below, &a, Direction::Up));
    }

    // Tests the mode flag maps onto the two modes
    // Verified by ignoring the flag
    #[test]
    fn test_mode_from_flag() {
        assert_eq!(AdjacencyMode::from_mirror_aware(false), AdjacencyMode::Exact);
        assert_eq!(AdjacencyMode::from_mirror_aware(true), AdjacencyMode::Mirrored);
        assert_eq!(AdjacencyMode::default(), AdjacencyMode::Exact);
    }

    // Tests a checkerboard pair is cross-compatible but not self-compatible
    // Verified by adding every tile as its own neighbour
    #[test]
    fn test_checkerboard_index() {
        let tiles = vec![tile(&[&[0, 1], &[1, 0]]), tile(&[&[1, 0], &[0, 1]])];
        let index = AdjacencyIndex::build(&tiles, AdjacencyMode::Exact);

        for direction in Direction::ALL {
            assert!(index.admits(TileId(0), direction, TileId(1)));
            assert!(index.admits(TileId(1), direction, TileId(0)));
            assert!(!index.admits(TileId(0), direction, TileId(0)));
            assert!(!index.admits(TileId(1), direction, TileId(1)));
        }
        assert!(index.is_symmetric());
        assert_eq!(index.rule_count(), 8);
        assert_eq!(index.tile_count(), 2);
    }

    // Tests built indices are symmetric in both modes
    // Verified by skipping the reversed check in Mirrored mode
    #[test]
    fn test_built_index_is_symmetric() {
        let tiles = vec![
            tile(&[&[0, 1, 2], &[1, 1, 0], &[2, 0, 1]]),
            tile(&[&[2, 1, 0], &[0, 0, 1], &[1, 2, 2]]),
            tile(&[&[1, 1, 1], &[0, 2, 0], &[2, 2, 2]]),
        ];
        for mode in [AdjacencyMode::Exact, AdjacencyMode::Mirrored] {
            assert!(AdjacencyIndex::build(&tiles, mode).is_symmetric());
        }
    }

    // Tests hand-written rules are taken verbatim and can be asymmetric
    // Verified by symmetrizing the predicate in from_predicate
    #[test]
    fn test_from_predicate_asymmetric() {
        let index = AdjacencyIndex::from_predicate(2, |a, direction, b| {
            direction == Direction::Right && a == TileId(0) && b == TileId(1)
        });
        assert!(index.admits(TileId(0), Direction::Right, TileId(1)));
        assert!(!index.admits(TileId(1), Direction::Left, TileId(0)));
        assert!(!index.is_symmetric());
    }

    // Tests unknown handles are reported, not panicked on
    // Verified by indexing the rule vector directly
    #[test]
    fn test_unknown_tile_lookup() {
        let index = AdjacencyIndex::from_predicate(1, |_, _, _| true);
        assert!(matches!(
            index.allowed(TileId(4), Direction::Up),
            Err(AlgorithmError::InvariantViolation { .. })
        ));
        assert!(!index.admits(TileId(4), Direction::Up, TileId(0)));
    }
}
