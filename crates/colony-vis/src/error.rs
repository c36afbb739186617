//! Error types for colony-vis.

use thiserror::Error;

/// Result type for colony-vis operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while loading or driving a playback.
#[derive(Debug, Error)]
pub enum Error {
    /// The input could not be read as a farm (or was an upstream error report).
    #[error(transparent)]
    Parse(#[from] colony_graph::Error),

    /// A schedule refers to tokens or rooms the farm does not have.
    #[error("invalid schedule: {0}")]
    InvalidSchedule(String),

    /// Playback settings that would stall or never finish a glide.
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    /// Stepping is only allowed while paused.
    #[error("cannot step while playing")]
    NotPaused,

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
