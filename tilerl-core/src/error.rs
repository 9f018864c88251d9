//! Errors in the library.
use thiserror::Error;

/// Errors in the library.
#[derive(Error, Debug)]
pub enum TilerlError {
    /// More transitions were requested than the replay buffer holds.
    #[error("Insufficient data in replay buffer: requested {requested}, available {available}")]
    InsufficientData {
        /// Requested batch size.
        requested: usize,

        /// Number of transitions in the buffer.
        available: usize,
    },

    /// Every worker of a collection round failed.
    #[error("All {0} workers failed in this round")]
    AllWorkersFailed(usize),

    /// A configuration value is out of range.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The model returned scores of unexpected length.
    #[error("Model output has {got} scores, expected {expected}")]
    ModelOutput {
        /// Expected number of scores.
        expected: usize,

        /// Number of scores returned by the model.
        got: usize,
    },

    /// The environment was used after being closed.
    #[error("Environment is already closed")]
    EnvClosed,

    /// Record key error.
    #[error("Record key error: {0}")]
    RecordKeyError(String),

    /// Record value type error.
    #[error("Record value type error: {0}")]
    RecordValueTypeError(String),
}
