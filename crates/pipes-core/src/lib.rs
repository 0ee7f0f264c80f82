//! Pipes puzzle engine.
//!
//! A rectangular grid of rotatable pipe tiles must be turned so that every
//! tile is reached from a colored source with no open connectors. This
//! crate generates solvable puzzles from a seed, evaluates connectivity
//! after each move, and hands out hints.

pub mod config;
pub mod connectivity;
pub mod direction;
pub mod error;
pub mod event;
pub mod generator;
pub mod hint;
pub mod puzzle;
pub mod rng;
pub mod tile;
pub mod topology;

pub use config::{PuzzleConfig, SettleMode};
pub use connectivity::{Evaluation, TileStatus};
pub use direction::{ConnectorSet, Direction, Rotation, Turn};
pub use error::{PuzzleError, PuzzleResult};
pub use event::{PuzzleEvent, PuzzleSnapshot};
pub use generator::{GenerationReport, Generator, RemovalStop};
pub use puzzle::{Puzzle, RotateResult};
pub use rng::random_seed;
pub use tile::{SourceColor, Tile};
pub use topology::{Position, Topology};
