use pipes_core::{Position, Puzzle, PuzzleEvent, SettleMode};
use std::collections::HashMap;

/// Ticks a quarter turn takes to land (100ms ticks)
pub const TURN_TICKS: u8 = 3;

/// Something the app should react to after puzzle events were applied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cue {
    Generated,
    Rejected(Position),
    Won,
}

/// Plays rotation transitions and reports them settled to the puzzle.
///
/// Each accepted rotation restarts the tile's transition timer; when it
/// runs out the tile lands on its target pose via `Puzzle::settle`.
#[derive(Debug, Default)]
pub struct Actuator {
    turning: HashMap<Position, u8>,
}

impl Actuator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply pending puzzle events and translate them into cues
    pub fn consume(&mut self, puzzle: &mut Puzzle) -> Vec<Cue> {
        let deferred = puzzle.settle_mode() == SettleMode::Deferred;
        let mut cues = Vec::new();
        for event in puzzle.drain_events() {
            match event {
                PuzzleEvent::GridGenerated(_) => {
                    self.turning.clear();
                    cues.push(Cue::Generated);
                }
                PuzzleEvent::RotationRequested { pos, .. } if deferred => {
                    self.turning.insert(pos, TURN_TICKS);
                }
                PuzzleEvent::RotationRejected { pos } => cues.push(Cue::Rejected(pos)),
                PuzzleEvent::WinReached => cues.push(Cue::Won),
                _ => {}
            }
        }
        cues
    }

    /// Advance every transition by one tick, settling the finished ones
    pub fn tick(&mut self, puzzle: &mut Puzzle) -> Vec<Cue> {
        let mut landed = Vec::new();
        for (pos, ticks) in self.turning.iter_mut() {
            *ticks = ticks.saturating_sub(1);
            if *ticks == 0 {
                landed.push(*pos);
            }
        }
        // Settle in a stable order so evaluations are reproducible
        landed.sort();
        for pos in landed {
            self.turning.remove(&pos);
            puzzle.settle(pos);
        }
        self.consume(puzzle)
    }

    /// Share of the transition still ahead of the tile, if it is turning
    pub fn remaining(&self, pos: Position) -> Option<f32> {
        self.turning
            .get(&pos)
            .map(|&ticks| ticks as f32 / TURN_TICKS as f32)
    }

    pub fn is_busy(&self) -> bool {
        !self.turning.is_empty()
    }
}
