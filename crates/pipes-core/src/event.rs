use crate::connectivity::Evaluation;
use crate::direction::{Rotation, Turn};
use crate::tile::Tile;
use crate::topology::{Position, Topology};
use serde::{Deserialize, Serialize};

/// Full state of a freshly generated puzzle, handed to the front-end
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PuzzleSnapshot {
    pub seed: u64,
    pub topology: Topology,
    /// Tiles in storage order (column by column)
    pub tiles: Vec<Tile>,
    pub sources: Vec<Position>,
}

/// Notifications for whatever animates and renders the puzzle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PuzzleEvent {
    GridGenerated(PuzzleSnapshot),
    RotationRequested {
        pos: Position,
        target: Rotation,
        turn: Option<Turn>,
    },
    /// A rotation command hit a locked tile and changed nothing
    RotationRejected {
        pos: Position,
    },
    TileSettled {
        pos: Position,
    },
    ConnectivityEvaluated(Evaluation),
    WinReached,
}
