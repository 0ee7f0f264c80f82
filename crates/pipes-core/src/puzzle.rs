use crate::config::{PuzzleConfig, SettleMode};
use crate::connectivity::{self, Evaluation};
use crate::direction::{Direction, Turn};
use crate::error::PuzzleResult;
use crate::event::{PuzzleEvent, PuzzleSnapshot};
use crate::generator::{GenerationReport, Generator};
use crate::hint;
use crate::rng::PuzzleRng;
use crate::tile::Tile;
use crate::topology::{Position, Topology};

/// Outcome of a rotation command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotateResult {
    /// Target rotation changed
    Accepted,
    /// The tile is locked, nothing changed
    Rejected,
}

/// A generated puzzle: topology, tiles, sources and the derived win state.
///
/// Every mutation runs to completion and re-evaluates connectivity before
/// returning, so `is_won()` always reflects the current tiles.
#[derive(Debug, Clone)]
pub struct Puzzle {
    pub(crate) topology: Topology,
    pub(crate) tiles: Vec<Tile>,
    pub(crate) sources: Vec<Position>,
    pub(crate) seed: u64,
    pub(crate) rng: PuzzleRng,
    pub(crate) settle_mode: SettleMode,
    pub(crate) report: GenerationReport,
    pub(crate) evaluation: Evaluation,
    pub(crate) won: bool,
    pub(crate) events: Vec<PuzzleEvent>,
}

impl Puzzle {
    /// Generate a puzzle, drawing a fresh seed if the config has none
    pub fn generate(config: &PuzzleConfig) -> PuzzleResult<Self> {
        let generator = Generator::new(config.clone())?;
        log::debug!(
            "generating {}x{} puzzle with seed {}",
            config.width,
            config.height,
            generator.seed()
        );
        generator.generate()
    }

    pub fn topology(&self) -> &Topology {
        &self.topology
    }

    pub fn width(&self) -> usize {
        self.topology.width()
    }

    pub fn height(&self) -> usize {
        self.topology.height()
    }

    /// The seed this puzzle was generated from, for replaying it
    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn settle_mode(&self) -> SettleMode {
        self.settle_mode
    }

    /// How the generation run went
    pub fn report(&self) -> &GenerationReport {
        &self.report
    }

    /// Tiles in storage order (column by column)
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    /// Source positions in placement order
    pub fn sources(&self) -> &[Position] {
        &self.sources
    }

    /// Tile at `pos`. Panics if `pos` is outside the grid.
    pub fn tile(&self, pos: Position) -> &Tile {
        &self.tiles[self.topology.index(pos)]
    }

    pub fn get(&self, pos: Position) -> Option<&Tile> {
        if self.topology.contains(pos) {
            Some(self.tile(pos))
        } else {
            None
        }
    }

    pub(crate) fn tile_mut(&mut self, pos: Position) -> &mut Tile {
        let index = self.topology.index(pos);
        &mut self.tiles[index]
    }

    pub fn is_won(&self) -> bool {
        self.won
    }

    /// Result of the latest connectivity evaluation
    pub fn evaluation(&self) -> &Evaluation {
        &self.evaluation
    }

    /// Whether `pos` and its neighbor across `direction` are joined: both
    /// tiles point a connector at each other at their current rotation.
    pub fn is_linked(&self, pos: Position, direction: Direction) -> bool {
        if !self.tile(pos).connector_present(direction) {
            return false;
        }
        match self.topology.neighbor(pos, direction) {
            Some(other) => self.tile(other).connector_present(direction.opposite()),
            None => false,
        }
    }

    /// Every edge of `pos` that is joined to a neighbor, with the neighbor
    pub fn linked_neighbors(&self, pos: Position) -> Vec<(Direction, Position)> {
        Direction::ALL
            .into_iter()
            .filter(|&d| self.is_linked(pos, d))
            .filter_map(|d| self.topology.neighbor(pos, d).map(|other| (d, other)))
            .collect()
    }

    /// Neighbors joined to `pos` through a tunnel edge
    pub fn tunnel_partners(&self, pos: Position) -> Vec<Position> {
        self.linked_neighbors(pos)
            .into_iter()
            .filter(|&(d, _)| self.topology.crosses_tunnel(pos, d))
            .map(|(_, other)| other)
            .collect()
    }

    /// A connector points somewhere without a matching connector back
    pub fn is_leaking(&self, pos: Position) -> bool {
        self.linked_neighbors(pos).len() != self.tile(pos).connector_count()
    }

    /// Every tile is reachable from some source (rotation as it stands,
    /// idle state ignored)
    pub fn fully_connected(&self) -> bool {
        connectivity::fully_connected(self)
    }

    /// Recompute colors, leaks and the win flag for the whole grid
    pub fn evaluate(&mut self) -> &Evaluation {
        let evaluation = connectivity::evaluate(self);
        let was_won = self.won;
        self.won = evaluation.win;
        log::trace!("evaluated connectivity, win = {}", self.won);

        self.events
            .push(PuzzleEvent::ConnectivityEvaluated(evaluation.clone()));
        if self.won && !was_won {
            log::info!("puzzle {} solved", self.seed);
            self.events.push(PuzzleEvent::WinReached);
        }
        self.evaluation = evaluation;
        &self.evaluation
    }

    /// Turn a tile 90 degrees counter-clockwise
    pub fn rotate_left(&mut self, pos: Position) -> RotateResult {
        self.rotate(pos, Turn::Left)
    }

    /// Turn a tile 90 degrees clockwise
    pub fn rotate_right(&mut self, pos: Position) -> RotateResult {
        self.rotate(pos, Turn::Right)
    }

    pub fn rotate(&mut self, pos: Position, turn: Turn) -> RotateResult {
        let tile = self.tile_mut(pos);
        if !tile.rotate(turn) {
            log::trace!("rotation of locked tile {} rejected", pos);
            self.events.push(PuzzleEvent::RotationRejected { pos });
            return RotateResult::Rejected;
        }
        let target = tile.target_rotation();
        log::trace!("tile {} turning {:?} to {}", pos, turn, target);

        self.events.push(PuzzleEvent::RotationRequested {
            pos,
            target,
            turn: Some(turn),
        });
        self.start_transition(pos);
        self.evaluate();
        RotateResult::Accepted
    }

    /// Report that the tile at `pos` finished its transition.
    /// Returns false if it was already settled.
    pub fn settle(&mut self, pos: Position) -> bool {
        if !self.tile_mut(pos).settle() {
            return false;
        }
        self.events.push(PuzzleEvent::TileSettled { pos });
        self.evaluate();
        true
    }

    /// Settle every turning tile at once and evaluate a single time
    pub fn settle_all(&mut self) -> usize {
        let mut settled = Vec::new();
        for tile in &mut self.tiles {
            if tile.settle() {
                settled.push(tile.pos());
            }
        }
        if settled.is_empty() {
            return 0;
        }
        for &pos in &settled {
            self.events.push(PuzzleEvent::TileSettled { pos });
        }
        self.evaluate();
        settled.len()
    }

    /// Tiles a hint could solve right now
    pub fn solvable_tiles(&self) -> Vec<Position> {
        hint::solvable_tiles(self)
    }

    /// Solve and lock one wrongly rotated tile, chosen from the puzzle's
    /// random stream. `None` when no tile qualifies.
    pub fn hint(&mut self) -> Option<Position> {
        let pos = hint::find_solvable_tile(self)?;
        let tile = self.tile_mut(pos);
        tile.solve();
        let target = tile.target_rotation();
        log::debug!("hint solved tile {}", pos);

        self.events.push(PuzzleEvent::RotationRequested {
            pos,
            target,
            turn: None,
        });
        self.start_transition(pos);
        self.evaluate();
        Some(pos)
    }

    /// Take all events raised since the last call
    pub fn drain_events(&mut self) -> Vec<PuzzleEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn snapshot(&self) -> PuzzleSnapshot {
        PuzzleSnapshot {
            seed: self.seed,
            topology: self.topology.clone(),
            tiles: self.tiles.clone(),
            sources: self.sources.clone(),
        }
    }

    fn start_transition(&mut self, pos: Position) {
        let settle_mode = self.settle_mode;
        let tile = self.tile_mut(pos);
        match settle_mode {
            SettleMode::Instant => {
                tile.settle();
            }
            SettleMode::Deferred => tile.begin_turn(),
        }
    }
}
