//! Error types for store access.

use std::time::Duration;

use thiserror::Error;

/// Errors that can occur while reading from (or seeding) a log store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store could not be reached.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// A store call did not complete within its bound.
    #[error("store call timed out after {0:?}")]
    Timeout(Duration),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A seed file line could not be indexed.
    #[error("seed line {line}: {reason}")]
    Seed {
        /// 1-based line number in the seed file.
        line: usize,
        /// Why the line was rejected.
        reason: String,
    },
}

/// Result type alias for store operations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;
