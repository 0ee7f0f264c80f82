use thiserror::Error;

/// Result type for puzzle operations
pub type PuzzleResult<T> = Result<T, PuzzleError>;

/// Errors that reject a puzzle before generation starts
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PuzzleError {
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
}
