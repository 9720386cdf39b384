//! Error types for log retrieval.

use logview_store::StoreError;
use thiserror::Error;

/// Errors that can occur while retrieving logs.
#[derive(Debug, Error)]
pub enum RetrievalError {
    /// The store could not serve the query (connectivity, timeout, I/O).
    #[error("store access failed: {0}")]
    StoreUnavailable(#[from] StoreError),

    /// A stored entry could not be turned into a log record.
    ///
    /// The retriever skips such entries; this variant only escapes from the
    /// record decoder itself.
    #[error("malformed record: {0}")]
    MalformedRecord(String),

    /// The query criteria are unusable (non-positive limit, inverted range).
    ///
    /// The retriever answers such queries with an empty result set; this
    /// variant is returned by [`QueryCriteria::validate`](crate::QueryCriteria::validate).
    #[error("invalid criteria: {0}")]
    InvalidCriteria(String),
}

impl RetrievalError {
    /// Returns true if the error is a whole-query store failure.
    #[must_use]
    pub const fn is_store_unavailable(&self) -> bool {
        matches!(self, Self::StoreUnavailable(_))
    }
}

/// Result type alias for retrieval operations.
pub type Result<T> = std::result::Result<T, RetrievalError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_messages() {
        let err = RetrievalError::from(StoreError::Unavailable("refused".to_string()));
        assert_eq!(
            err.to_string(),
            "store access failed: store unavailable: refused"
        );

        let err = RetrievalError::MalformedRecord("not an object".to_string());
        assert_eq!(err.to_string(), "malformed record: not an object");

        let err = RetrievalError::InvalidCriteria("limit must be positive".to_string());
        assert_eq!(err.to_string(), "invalid criteria: limit must be positive");
    }

    #[test]
    fn store_errors_are_store_unavailable() {
        let err: RetrievalError = StoreError::Timeout(std::time::Duration::from_secs(1)).into();
        assert!(err.is_store_unavailable());
        assert!(!RetrievalError::MalformedRecord(String::new()).is_store_unavailable());
    }

    #[test]
    fn source_is_preserved() {
        use std::error::Error as _;
        let err = RetrievalError::from(StoreError::Unavailable("x".to_string()));
        assert!(err.source().is_some());
    }

    #[test]
    fn error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<RetrievalError>();
    }
}
