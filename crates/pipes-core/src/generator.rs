use crate::config::PuzzleConfig;
use crate::connectivity::Evaluation;
use crate::direction::{Direction, Rotation};
use crate::error::PuzzleResult;
use crate::event::PuzzleEvent;
use crate::puzzle::Puzzle;
use crate::rng::{random_seed, PuzzleRng};
use crate::tile::{SourceColor, Tile};
use crate::topology::{Position, Topology};
use serde::{Deserialize, Serialize};

/// Why the connection removal phase stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RemovalStop {
    /// Removed as many connections as requested
    #[default]
    TargetReached,
    /// Hit the cap of consecutive failed attempts
    AttemptsExhausted,
    /// Two or fewer tiles still had spare connections
    CandidatesExhausted,
}

/// Summary of a generation run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationReport {
    pub removed_connections: usize,
    /// Failed attempts since the last successful removal
    pub failed_attempts: usize,
    pub stop: RemovalStop,
}

/// Seeded puzzle generator.
///
/// Phases run in a fixed order and all draw from one random stream:
/// tunnels, grid, sources, connection removal, locks, scramble.
pub struct Generator {
    config: PuzzleConfig,
    seed: u64,
    rng: PuzzleRng,
}

impl Generator {
    /// Validate the configuration and seed the random stream
    pub fn new(config: PuzzleConfig) -> PuzzleResult<Self> {
        config.validate()?;
        let seed = config.seed.unwrap_or_else(random_seed);
        Ok(Self {
            config,
            seed,
            rng: PuzzleRng::with_seed(seed),
        })
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Run every phase and return the finished puzzle
    pub fn generate(mut self) -> PuzzleResult<Puzzle> {
        let topology = self.place_tunnels();
        let tiles = self.build_grid(&topology);

        let mut puzzle = Puzzle {
            topology,
            tiles,
            sources: Vec::new(),
            seed: self.seed,
            rng: PuzzleRng::with_seed(self.seed),
            settle_mode: self.config.settle,
            report: GenerationReport::default(),
            evaluation: Evaluation::default(),
            won: false,
            events: Vec::new(),
        };

        self.place_sources(&mut puzzle);
        puzzle.report = self.remove_connections(&mut puzzle);
        self.place_locks(&mut puzzle);
        self.scramble(&mut puzzle);

        log::info!(
            "generated {}x{} puzzle with seed {} ({} connections removed)",
            puzzle.width(),
            puzzle.height(),
            self.seed,
            puzzle.report.removed_connections
        );

        // Later draws (hints) continue the same stream
        puzzle.rng = self.rng;
        let snapshot = puzzle.snapshot();
        puzzle.events.push(PuzzleEvent::GridGenerated(snapshot));
        puzzle.evaluate();
        Ok(puzzle)
    }

    /// Pick distinct rows and columns to wrap around, weighting the choice
    /// of dimension by how many lines are still free in each
    fn place_tunnels(&mut self) -> Topology {
        let width = self.config.width;
        let height = self.config.height;
        let mut topology = Topology::new(width, height);

        let count = self.config.tunnels.min(width + height);
        for _ in 0..count {
            let free_columns = width - topology.column_tunnels().len();
            let free_rows = height - topology.row_tunnels().len();

            if self.rng.below(free_columns + free_rows) < free_columns {
                let x = loop {
                    let x = self.rng.below(width);
                    if !topology.is_column_tunnel(x) {
                        break x;
                    }
                };
                topology.add_column_tunnel(x);
            } else {
                let y = loop {
                    let y = self.rng.below(height);
                    if !topology.is_row_tunnel(y) {
                        break y;
                    }
                };
                topology.add_row_tunnel(y);
            }
        }

        log::debug!(
            "tunnels: columns {:?}, rows {:?}",
            topology.column_tunnels(),
            topology.row_tunnels()
        );
        topology
    }

    /// Full tiles with random solved poses; connectors facing the outside
    /// of the grid are dropped
    fn build_grid(&mut self, topology: &Topology) -> Vec<Tile> {
        topology
            .positions()
            .map(|pos| {
                let rotation = Rotation::from_quarter_turns(self.rng.below(4) as u8);
                let mut tile = Tile::new(pos, rotation);
                for direction in Direction::ALL {
                    if topology.neighbor(pos, direction).is_none() {
                        tile.remove_connector(direction);
                    }
                }
                tile
            })
            .collect()
    }

    fn place_sources(&mut self, puzzle: &mut Puzzle) {
        let cells = puzzle.topology.len();
        let count = self.config.sources.min(cells);

        for i in 0..count {
            let pos = loop {
                let x = self.rng.below(puzzle.width());
                let y = self.rng.below(puzzle.height());
                let pos = Position::new(x, y);
                if !puzzle.tile(pos).is_source() {
                    break pos;
                }
            };

            let color = if self.config.distinct_source_colors {
                SourceColor::PALETTE[i % SourceColor::PALETTE.len()]
            } else {
                SourceColor::DEFAULT
            };
            puzzle.tile_mut(pos).make_source(color);
            puzzle.sources.push(pos);
        }

        log::debug!("sources at {:?}", puzzle.sources);
    }

    /// Prune redundant connections while every tile stays reachable from a
    /// source. Tunnel connections are never removed.
    fn remove_connections(&mut self, puzzle: &mut Puzzle) -> GenerationReport {
        let mut candidates: Vec<Position> = puzzle
            .topology
            .positions()
            .filter(|&pos| puzzle.linked_neighbors(pos).len() > 1)
            .collect();

        let mut report = GenerationReport::default();

        loop {
            if report.removed_connections >= self.config.connections_to_remove {
                report.stop = RemovalStop::TargetReached;
                break;
            }
            if report.failed_attempts >= self.config.remove_attempts {
                report.stop = RemovalStop::AttemptsExhausted;
                break;
            }
            if candidates.len() <= 2 {
                report.stop = RemovalStop::CandidatesExhausted;
                break;
            }

            let current = candidates[self.rng.below(candidates.len())];
            let links = puzzle.linked_neighbors(current);
            if links.is_empty() {
                report.failed_attempts += 1;
                continue;
            }
            let (direction, other) = links[self.rng.below(links.len())];

            if !candidates.contains(&other) || puzzle.tunnel_partners(current).contains(&other) {
                report.failed_attempts += 1;
                continue;
            }

            puzzle.tile_mut(current).remove_connector(direction);
            puzzle.tile_mut(other).remove_connector(direction.opposite());

            if !puzzle.fully_connected() {
                puzzle.tile_mut(current).restore_connector(direction);
                puzzle.tile_mut(other).restore_connector(direction.opposite());
                report.failed_attempts += 1;
                continue;
            }

            report.removed_connections += 1;
            report.failed_attempts = 0;

            for pos in [current, other] {
                if puzzle.linked_neighbors(pos).len() < 2 {
                    candidates.retain(|&c| c != pos);
                }
            }
        }

        log::debug!(
            "removed {} connections, stopped by {:?}",
            report.removed_connections,
            report.stop
        );
        report
    }

    fn place_locks(&mut self, puzzle: &mut Puzzle) {
        let count = self.config.locks.min(puzzle.topology.len());
        for _ in 0..count {
            let pos = loop {
                let x = self.rng.below(puzzle.width());
                let y = self.rng.below(puzzle.height());
                let pos = Position::new(x, y);
                if !puzzle.tile(pos).is_locked() {
                    break pos;
                }
            };
            puzzle.tile_mut(pos).make_lock();
        }
        log::debug!("placed {} locks", count);
    }

    /// Random pose for every unlocked tile; locked tiles keep the solved pose
    fn scramble(&mut self, puzzle: &mut Puzzle) {
        for tile in &mut puzzle.tiles {
            let rotation = if tile.is_locked() {
                tile.rotation()
            } else {
                Rotation::from_quarter_turns(self.rng.below(4) as u8)
            };
            tile.set_pose(rotation);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SettleMode;

    fn config(width: usize, height: usize, seed: u64) -> PuzzleConfig {
        PuzzleConfig {
            width,
            height,
            sources: 2,
            locks: 3,
            tunnels: 2,
            distinct_source_colors: true,
            connections_to_remove: 200,
            remove_attempts: 80,
            seed: Some(seed),
            settle: SettleMode::Instant,
        }
    }

    /// Rotate every tile back to its solved pose, leaving other state alone
    fn solved(mut puzzle: Puzzle) -> Puzzle {
        for tile in &mut puzzle.tiles {
            let original = tile.original_rotation();
            tile.set_pose(original);
        }
        puzzle
    }

    #[test]
    fn test_generated_puzzle_is_solvable() {
        for seed in [1, 2, 3, 42, 999] {
            let puzzle = Puzzle::generate(&config(6, 5, seed)).unwrap();
            let puzzle = solved(puzzle);
            assert!(puzzle.fully_connected(), "seed {} not fully connected", seed);
        }
    }

    #[test]
    fn test_same_seed_same_puzzle() {
        let a = Puzzle::generate(&config(7, 6, 1234)).unwrap();
        let b = Puzzle::generate(&config(7, 6, 1234)).unwrap();
        assert_eq!(a.snapshot(), b.snapshot());
        assert_eq!(a.report(), b.report());
    }

    #[test]
    fn test_different_seed_different_puzzle() {
        let a = Puzzle::generate(&config(7, 6, 1)).unwrap();
        let b = Puzzle::generate(&config(7, 6, 2)).unwrap();
        assert_ne!(a.snapshot().tiles, b.snapshot().tiles);
    }

    #[test]
    fn test_random_seed_is_reported() {
        let mut cfg = config(3, 3, 0);
        cfg.seed = None;
        let puzzle = Puzzle::generate(&cfg).unwrap();

        let replay = Puzzle::generate(&cfg.clone().with_seed(puzzle.seed())).unwrap();
        assert_eq!(puzzle.snapshot(), replay.snapshot());
    }

    #[test]
    fn test_generator_reports_its_seed() {
        let generator = Generator::new(config(4, 4, 42)).unwrap();
        assert_eq!(generator.seed(), 42);
        let puzzle = generator.generate().unwrap();
        assert_eq!(puzzle.seed(), 42);

        let mut cfg = config(4, 4, 0);
        cfg.seed = None;
        let generator = Generator::new(cfg).unwrap();
        assert!(generator.seed() < crate::rng::SEED_RANGE);
    }

    #[test]
    fn test_counts_are_clamped() {
        let cfg = PuzzleConfig {
            sources: 50,
            locks: 50,
            tunnels: 50,
            ..config(3, 2, 7)
        };
        let puzzle = Puzzle::generate(&cfg).unwrap();
        assert_eq!(puzzle.sources().len(), 6);
        assert!(puzzle.tiles().iter().all(|t| t.is_locked()));
        assert_eq!(puzzle.topology().column_tunnels().len(), 3);
        assert_eq!(puzzle.topology().row_tunnels().len(), 2);
    }

    #[test]
    fn test_boundary_trimmed_except_tunnels() {
        let puzzle = solved(Puzzle::generate(&config(5, 4, 77)).unwrap());
        let topology = puzzle.topology().clone();
        for pos in topology.positions() {
            let tile = puzzle.tile(pos);
            for direction in Direction::ALL {
                if topology.neighbor(pos, direction).is_none() {
                    assert!(!tile.connector_present(direction), "{} leaks {}", pos, direction);
                }
            }
        }
    }

    #[test]
    fn test_tunnel_connections_survive_pruning() {
        let cfg = PuzzleConfig {
            tunnels: 4,
            connections_to_remove: 1000,
            remove_attempts: 200,
            ..config(5, 5, 31)
        };
        let puzzle = solved(Puzzle::generate(&cfg).unwrap());
        let topology = puzzle.topology();
        for &x in topology.column_tunnels() {
            assert!(puzzle.is_linked(Position::new(x, 0), Direction::South));
        }
        for &y in topology.row_tunnels() {
            assert!(puzzle.is_linked(Position::new(0, y), Direction::West));
        }
    }

    #[test]
    fn test_no_removal_keeps_full_grid() {
        let cfg = PuzzleConfig {
            connections_to_remove: 0,
            tunnels: 0,
            ..config(4, 3, 5)
        };
        let puzzle = Puzzle::generate(&cfg).unwrap();
        assert_eq!(puzzle.report().removed_connections, 0);
        assert_eq!(puzzle.report().stop, RemovalStop::TargetReached);
        assert_eq!(puzzle.tile(Position::new(1, 1)).connector_count(), 4);
    }

    #[test]
    fn test_attempt_cap_terminates() {
        let cfg = PuzzleConfig {
            sources: 0,
            remove_attempts: 5,
            ..config(4, 4, 9)
        };
        let puzzle = Puzzle::generate(&cfg).unwrap();
        assert_eq!(puzzle.report().removed_connections, 0);
        assert_eq!(puzzle.report().stop, RemovalStop::AttemptsExhausted);
    }

    #[test]
    fn test_locked_tiles_keep_solved_pose() {
        let puzzle = Puzzle::generate(&config(6, 6, 55)).unwrap();
        for tile in puzzle.tiles().iter().filter(|t| t.is_locked()) {
            assert_eq!(tile.rotation(), tile.original_rotation());
            assert_eq!(tile.target_rotation(), tile.original_rotation());
        }
        assert_eq!(puzzle.tiles().iter().filter(|t| t.is_locked()).count(), 3);
    }

    #[test]
    fn test_single_colour_mode() {
        let cfg = PuzzleConfig {
            distinct_source_colors: false,
            sources: 3,
            ..config(4, 4, 3)
        };
        let puzzle = Puzzle::generate(&cfg).unwrap();
        for &pos in puzzle.sources() {
            assert_eq!(puzzle.tile(pos).source_color(), Some(SourceColor::DEFAULT));
        }
    }

    #[test]
    fn test_invalid_config_rejected() {
        let cfg = PuzzleConfig {
            height: 0,
            ..config(4, 4, 3)
        };
        assert!(Puzzle::generate(&cfg).is_err());
    }

    #[test]
    fn test_generation_events() {
        let mut puzzle = Puzzle::generate(&config(3, 3, 8)).unwrap();
        let events = puzzle.drain_events();
        assert!(matches!(events[0], PuzzleEvent::GridGenerated(_)));
        assert!(matches!(events[1], PuzzleEvent::ConnectivityEvaluated(_)));
        assert!(puzzle.drain_events().is_empty());
    }
}
