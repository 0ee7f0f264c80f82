//! Graph traversal over linked tiles.
//!
//! Two tiles share an edge only when both point a connector across it, so
//! the graph changes every time a tile turns. Traversals use an explicit
//! stack and visited set; grids of any size are safe.

use crate::puzzle::Puzzle;
use crate::tile::SourceColor;
use crate::topology::Position;
use serde::{Deserialize, Serialize};

/// Per-tile outcome of an evaluation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileStatus {
    pub pos: Position,
    /// Source colors reaching the tile, in source order
    pub colors: Vec<SourceColor>,
    pub leaking: bool,
    pub idle: bool,
}

/// Result of evaluating the whole grid
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Evaluation {
    /// Tiles in storage order
    pub tiles: Vec<TileStatus>,
    pub win: bool,
}

impl Evaluation {
    pub fn status(&self, index: usize) -> Option<&TileStatus> {
        self.tiles.get(index)
    }

    pub fn leak_count(&self) -> usize {
        self.tiles.iter().filter(|t| t.leaking).count()
    }

    /// Tiles no source currently reaches
    pub fn dry_count(&self) -> usize {
        self.tiles.iter().filter(|t| t.colors.is_empty()).count()
    }
}

/// Every tile is reached from at least one source.
///
/// Runs on the current physical rotation and ignores idle state; the
/// generator relies on it while rotations are still the solved pose.
pub(crate) fn fully_connected(puzzle: &Puzzle) -> bool {
    let topology = puzzle.topology();
    let mut visited = vec![false; topology.len()];
    let mut remaining = topology.len();
    let mut stack: Vec<Position> = puzzle.sources().to_vec();

    while let Some(pos) = stack.pop() {
        let index = topology.index(pos);
        if visited[index] {
            continue;
        }
        visited[index] = true;
        remaining -= 1;
        for (_, other) in puzzle.linked_neighbors(pos) {
            if !visited[topology.index(other)] {
                stack.push(other);
            }
        }
    }

    remaining == 0
}

/// Recompute connected colors on every tile and derive the win state.
///
/// Each source floods its color over linked tiles. A tile that is still
/// turning stops the flood and stays dry unless it is a source itself.
/// Any turning or leaking tile reached this way rules out a win.
pub(crate) fn evaluate(puzzle: &mut Puzzle) -> Evaluation {
    for tile in &mut puzzle.tiles {
        tile.clear_colors();
    }

    let mut winning = true;
    let sources = puzzle.sources.clone();
    let len = puzzle.topology.len();

    for source in sources {
        let Some(color) = puzzle.tile(source).source_color() else {
            continue;
        };
        let mut visited = vec![false; len];
        let mut stack = vec![source];

        while let Some(pos) = stack.pop() {
            let idle = puzzle.tile(pos).is_idle();
            if !idle || puzzle.is_leaking(pos) {
                winning = false;
            }
            if idle || puzzle.tile(pos).is_source() {
                puzzle.tile_mut(pos).add_color(color);
            }

            let index = puzzle.topology.index(pos);
            if visited[index] || !idle {
                continue;
            }
            visited[index] = true;
            for (_, other) in puzzle.linked_neighbors(pos) {
                if !visited[puzzle.topology.index(other)] {
                    stack.push(other);
                }
            }
        }
    }

    let tiles: Vec<TileStatus> = puzzle
        .tiles
        .iter()
        .map(|tile| TileStatus {
            pos: tile.pos(),
            colors: tile.connected_colors().to_vec(),
            leaking: puzzle.is_leaking(tile.pos()),
            idle: tile.is_idle(),
        })
        .collect();

    let win = winning
        && tiles
            .iter()
            .all(|t| t.idle && !t.leaking && !t.colors.is_empty());

    Evaluation { tiles, win }
}

#[cfg(test)]
mod tests {
    use crate::config::{PuzzleConfig, SettleMode};
    use crate::direction::Direction;
    use crate::puzzle::Puzzle;
    use crate::topology::Position;

    fn config(width: usize, height: usize, seed: u64) -> PuzzleConfig {
        PuzzleConfig {
            width,
            height,
            sources: 1,
            locks: 0,
            tunnels: 0,
            distinct_source_colors: false,
            connections_to_remove: 0,
            remove_attempts: 10,
            seed: Some(seed),
            settle: SettleMode::Instant,
        }
    }

    fn solve_all(puzzle: &mut Puzzle) {
        let positions: Vec<Position> = puzzle.topology().positions().collect();
        for pos in positions {
            let original = puzzle.tile(pos).original_rotation();
            while puzzle.tile(pos).target_rotation() != original {
                puzzle.rotate_right(pos);
            }
        }
    }

    #[test]
    fn test_single_tile_wins_immediately() {
        let puzzle = Puzzle::generate(&config(1, 1, 3)).unwrap();
        let tile = puzzle.tile(Position::new(0, 0));
        assert_eq!(tile.connector_count(), 0);
        assert!(tile.is_idle());
        assert!(puzzle.fully_connected());
        assert!(puzzle.is_won());
    }

    #[test]
    fn test_untrimmed_three_by_three() {
        let puzzle = Puzzle::generate(&config(3, 3, 5)).unwrap();
        assert!(puzzle.fully_connected());
        let center = puzzle.tile(Position::new(1, 1));
        assert_eq!(center.connector_count(), 4);
        let corner = puzzle.tile(Position::new(0, 0));
        assert_eq!(corner.connector_count(), 2);
        let edge = puzzle.tile(Position::new(1, 0));
        assert_eq!(edge.connector_count(), 3);
    }

    #[test]
    fn test_evaluate_is_idempotent() {
        let mut puzzle = Puzzle::generate(&config(5, 4, 17)).unwrap();
        let first = puzzle.evaluate().clone();
        let second = puzzle.evaluate().clone();
        assert_eq!(first, second);
    }

    #[test]
    fn test_solved_grid_colors_everything() {
        let mut cfg = config(4, 4, 21);
        cfg.sources = 2;
        cfg.distinct_source_colors = true;
        cfg.connections_to_remove = 50;
        let mut puzzle = Puzzle::generate(&cfg).unwrap();
        solve_all(&mut puzzle);

        let evaluation = puzzle.evaluation();
        assert!(evaluation.win);
        assert_eq!(evaluation.leak_count(), 0);
        assert_eq!(evaluation.dry_count(), 0);
        for source in puzzle.sources() {
            let color = puzzle.tile(*source).source_color().unwrap();
            assert!(puzzle.tile(*source).connected_colors().contains(&color));
        }
    }

    #[test]
    fn test_turning_tile_blocks_flow_and_win() {
        let cfg = config(3, 1, 8).with_settle(SettleMode::Deferred);
        let mut puzzle = Puzzle::generate(&cfg).unwrap();
        solve_all(&mut puzzle);
        puzzle.settle_all();
        assert!(puzzle.is_won());

        // Spin the middle tile all the way round: same pose, still turning
        let middle = Position::new(1, 0);
        for _ in 0..4 {
            puzzle.rotate_right(middle);
        }
        assert!(!puzzle.tile(middle).is_idle());
        assert!(!puzzle.is_won());

        let source = puzzle.sources()[0];
        let middle_status = &puzzle.evaluation().tiles[puzzle.topology().index(middle)];
        assert!(!middle_status.idle);
        if source != middle {
            // Color stops at the turning tile and does not fill it
            assert!(middle_status.colors.is_empty());
            let far = if source.x == 0 { Position::new(2, 0) } else { Position::new(0, 0) };
            assert!(puzzle.tile(far).connected_colors().is_empty());
        }

        puzzle.settle(middle);
        assert!(puzzle.is_won());
    }

    #[test]
    fn test_turning_neighbor_of_source_stays_dry() {
        let cfg = config(3, 1, 8).with_settle(SettleMode::Deferred);
        let mut puzzle = Puzzle::generate(&cfg).unwrap();
        solve_all(&mut puzzle);
        puzzle.settle_all();

        let source = puzzle.sources()[0];
        let color = puzzle.tile(source).source_color().unwrap();
        let (_, neighbor) = puzzle.linked_neighbors(source)[0];
        for _ in 0..4 {
            puzzle.rotate_right(neighbor);
        }

        assert!(!puzzle.tile(neighbor).is_idle());
        assert!(puzzle.tile(neighbor).connected_colors().is_empty());
        assert_eq!(puzzle.tile(source).connected_colors(), &[color]);
        assert!(!puzzle.is_won());
    }

    #[test]
    fn test_turning_source_keeps_own_color() {
        let cfg = config(3, 1, 8).with_settle(SettleMode::Deferred);
        let mut puzzle = Puzzle::generate(&cfg).unwrap();
        solve_all(&mut puzzle);
        puzzle.settle_all();

        let source = puzzle.sources()[0];
        let color = puzzle.tile(source).source_color().unwrap();
        for _ in 0..4 {
            puzzle.rotate_left(source);
        }

        assert!(!puzzle.tile(source).is_idle());
        assert_eq!(puzzle.tile(source).connected_colors(), &[color]);
        let index = puzzle.topology().index(source);
        assert!(!puzzle.evaluation().tiles[index].colors.is_empty());
        assert!(!puzzle.is_won());
    }

    #[test]
    fn test_status_lookup_by_index() {
        let mut puzzle = Puzzle::generate(&config(2, 1, 4)).unwrap();
        solve_all(&mut puzzle);
        let left = Position::new(0, 0);
        puzzle.rotate_right(left);

        let evaluation = puzzle.evaluation();
        let status = evaluation.status(puzzle.topology().index(left)).unwrap();
        assert_eq!(status.pos, left);
        assert!(status.leaking);
        assert!(evaluation.status(puzzle.topology().len()).is_none());
    }

    #[test]
    fn test_leak_detection() {
        let mut puzzle = Puzzle::generate(&config(2, 1, 4)).unwrap();
        solve_all(&mut puzzle);
        let left = Position::new(0, 0);
        assert!(puzzle.tile(left).connector_present(Direction::East));
        assert!(!puzzle.is_leaking(left));

        puzzle.rotate_right(left);
        assert!(puzzle.is_leaking(left));
        assert!(puzzle.is_leaking(Position::new(1, 0)));
        assert!(!puzzle.is_won());
    }

    #[test]
    fn test_no_sources_never_connected() {
        let mut cfg = config(2, 2, 1);
        cfg.sources = 0;
        let puzzle = Puzzle::generate(&cfg).unwrap();
        assert!(!puzzle.fully_connected());
        assert!(!puzzle.is_won());
    }
}
