use crate::error::{PuzzleError, PuzzleResult};
use serde::{Deserialize, Serialize};

/// How rotation commands reach the physical pose of a tile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SettleMode {
    /// Rotations apply immediately, tiles are always idle after a command
    #[default]
    Instant,
    /// Tiles stay turning until the front-end reports them settled
    Deferred,
}

/// Configuration for puzzle generation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PuzzleConfig {
    /// Grid width, at least 1
    pub width: usize,
    /// Grid height, at least 1
    pub height: usize,
    /// Number of source tiles (clamped to the grid size)
    pub sources: usize,
    /// Number of locked tiles (clamped to the grid size)
    pub locks: usize,
    /// Number of wrapping rows/columns (clamped to width + height)
    pub tunnels: usize,
    /// Give every source its own palette color
    pub distinct_source_colors: bool,
    /// How many connections the pruning phase tries to remove
    pub connections_to_remove: usize,
    /// Consecutive failed removals before pruning stops, at least 1
    pub remove_attempts: usize,
    /// Fixed seed; a fresh one is drawn when absent
    pub seed: Option<u64>,
    pub settle: SettleMode,
}

impl Default for PuzzleConfig {
    fn default() -> Self {
        Self::medium()
    }
}

impl PuzzleConfig {
    pub fn easy() -> Self {
        Self {
            width: 4,
            height: 4,
            sources: 1,
            locks: 2,
            tunnels: 0,
            distinct_source_colors: false,
            connections_to_remove: 100,
            remove_attempts: 50,
            seed: None,
            settle: SettleMode::Instant,
        }
    }

    pub fn medium() -> Self {
        Self {
            width: 6,
            height: 6,
            sources: 1,
            locks: 2,
            tunnels: 1,
            distinct_source_colors: false,
            connections_to_remove: 200,
            remove_attempts: 100,
            seed: None,
            settle: SettleMode::Instant,
        }
    }

    pub fn hard() -> Self {
        Self {
            width: 9,
            height: 7,
            sources: 2,
            locks: 1,
            tunnels: 2,
            distinct_source_colors: true,
            connections_to_remove: 400,
            remove_attempts: 150,
            seed: None,
            settle: SettleMode::Instant,
        }
    }

    pub fn expert() -> Self {
        Self {
            width: 12,
            height: 9,
            sources: 3,
            locks: 0,
            tunnels: 4,
            distinct_source_colors: true,
            connections_to_remove: 1000,
            remove_attempts: 300,
            seed: None,
            settle: SettleMode::Instant,
        }
    }

    /// Builder-style seed override
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_settle(mut self, settle: SettleMode) -> Self {
        self.settle = settle;
        self
    }

    /// Reject configurations generation cannot run on
    pub fn validate(&self) -> PuzzleResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(PuzzleError::InvalidConfiguration(format!(
                "grid must be at least 1x1, got {}x{}",
                self.width, self.height
            )));
        }
        if self.remove_attempts == 0 {
            return Err(PuzzleError::InvalidConfiguration(
                "remove attempt cap must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
