//! Error types for the puzzle engine.

use thiserror::Error;

/// Errors raised by the puzzle engine.
///
/// All of these are recoverable: a front end should re-prompt or start a
/// fresh puzzle rather than abort.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PuzzleError {
    #[error("invalid grid size {0}, expected 2..=16")]
    InvalidGridSize(usize),

    #[error("malformed board: {0}")]
    MalformedBoard(String),

    #[error("move starts at cell {expected}, but the empty cell is at {actual}")]
    StaleMove { expected: usize, actual: usize },

    #[error("shuffle returned to the solved state {attempts} times in a row")]
    ShuffleExhausted { attempts: u32 },
}

/// Errors raised by a [`KeyValueStore`](crate::scores::KeyValueStore).
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("failed to encode value for key {key}")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("storage backend failed: {0}")]
    Backend(String),
}
