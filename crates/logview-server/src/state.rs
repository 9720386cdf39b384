//! Shared state for the query surface.

use std::sync::Arc;
use std::time::Instant;

use logview_core::{LogRetriever, RetrievalError};
use logview_store::{LogStoreAdapter, StoreError};
use tracing::warn;

use crate::config::LogviewConfig;
use crate::error::{ServerError, ServerResult};

/// The retriever type the server works with.
pub type SharedRetriever = LogRetriever<Arc<dyn LogStoreAdapter>>;

/// Shared state for the HTTP handlers.
///
/// The retriever is handed in at construction. A server built without one
/// answers log queries with [`ServerError::RetrieverUnavailable`].
pub struct AppState {
    /// Server configuration.
    config: LogviewConfig,
    /// Retriever, if a store was configured.
    retriever: Option<SharedRetriever>,
    /// Server start time.
    start_time: Instant,
}

impl AppState {
    /// Create state with a retriever.
    pub fn new(config: LogviewConfig, retriever: SharedRetriever) -> Self {
        Self {
            config,
            retriever: Some(retriever),
            start_time: Instant::now(),
        }
    }

    /// Create state for a server that has no store.
    pub fn without_retriever(config: LogviewConfig) -> Self {
        Self {
            config,
            retriever: None,
            start_time: Instant::now(),
        }
    }

    /// Get the configuration.
    #[must_use]
    pub const fn config(&self) -> &LogviewConfig {
        &self.config
    }

    /// Get the retriever.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::RetrieverUnavailable`] if none was configured.
    pub fn retriever(&self) -> ServerResult<&SharedRetriever> {
        self.retriever.as_ref().ok_or(ServerError::RetrieverUnavailable)
    }

    /// Returns true if a retriever was configured.
    #[must_use]
    pub const fn has_retriever(&self) -> bool {
        self.retriever.is_some()
    }

    /// Get the server uptime in seconds.
    #[must_use]
    pub fn uptime_secs(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }

    /// Runs a blocking retriever call on the blocking pool, bounded by the
    /// configured store timeout.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::RetrieverUnavailable`] without a retriever,
    /// a store-unavailable error on timeout, and whatever `call` returns.
    pub async fn with_retriever<T, F>(self: &Arc<Self>, call: F) -> ServerResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&SharedRetriever) -> logview_core::Result<T> + Send + 'static,
    {
        let state = Arc::clone(self);
        let timeout = self.config.store.timeout();
        let task = tokio::task::spawn_blocking(move || {
            let retriever = state.retriever()?;
            call(retriever).map_err(ServerError::from)
        });

        match tokio::time::timeout(timeout, task).await {
            Ok(Ok(result)) => result,
            Ok(Err(join_err)) => Err(ServerError::Internal(format!(
                "retrieval task failed: {join_err}"
            ))),
            Err(_) => {
                warn!(timeout_ms = timeout.as_millis() as u64, "retrieval timed out");
                Err(ServerError::Retrieval(RetrievalError::StoreUnavailable(
                    StoreError::Timeout(timeout),
                )))
            }
        }
    }
}
