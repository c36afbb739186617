//! Error types for colony-graph.

use thiserror::Error;

/// Result type for colony-graph operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Coarse classification of a failed parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The input itself is an error report from the upstream solver.
    UpstreamError,
    /// The input could not be turned into a farm and schedule.
    MalformedInput,
}

/// Errors that can occur while reading a farm description.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The upstream solver reported a failure; the payload is its raw output.
    #[error("{0}")]
    Upstream(String),

    /// A line could not be parsed. `line` is 1-based, 0 means the whole input.
    #[error("line {line}: {message}")]
    Malformed { line: usize, message: String },

    /// No node was ever flagged `##start`, so tokens have nowhere to stand.
    #[error("start room not defined")]
    MissingStartNode,
}

impl Error {
    pub(crate) fn malformed(line: usize, message: impl Into<String>) -> Self {
        Error::Malformed {
            line,
            message: message.into(),
        }
    }

    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Upstream(_) => ErrorKind::UpstreamError,
            Error::Malformed { .. } | Error::MissingStartNode => ErrorKind::MalformedInput,
        }
    }
}
