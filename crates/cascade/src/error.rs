//! Error type shared by every fallible operation in the crate.

use thiserror::Error;

/// Failure modes of grid, cluster, cascade and session operations.
///
/// A call that returns one of these has left the grid and ledger untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("grid dimensions must be positive, got {width}x{height}")]
    InvalidDimension { width: usize, height: usize },

    #[error("invalid session configuration: {reason}")]
    InvalidConfiguration { reason: String },

    #[error("coordinate ({x}, {y}) is outside the grid")]
    OutOfBounds { x: i32, y: i32 },

    /// Cluster search was seeded on an Empty cell.
    #[error("cannot search for a cluster from empty cell ({x}, {y})")]
    EmptySeed { x: i32, y: i32 },

    /// A cascade is already being processed.
    #[error("a cascade is already in progress")]
    Busy,

    #[error("failed to parse session config: {0}")]
    Config(String),

    #[error("failed to serialize ledger snapshot: {0}")]
    Snapshot(String),
}

impl Error {
    pub(crate) fn invalid_configuration(reason: impl Into<String>) -> Self {
        Self::InvalidConfiguration {
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
