//! Query server implementation.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::info;

use crate::config::LogviewConfig;
use crate::error::{ServerError, ServerResult};
use crate::routes::create_router;
use crate::state::{AppState, SharedRetriever};

/// HTTP server exposing the log query API.
#[derive(Clone)]
pub struct LogviewServer {
    state: Arc<AppState>,
}

impl LogviewServer {
    /// Create a server backed by `retriever`.
    #[must_use]
    pub fn new(config: LogviewConfig, retriever: SharedRetriever) -> Self {
        Self {
            state: Arc::new(AppState::new(config, retriever)),
        }
    }

    /// Create a server with no store.
    ///
    /// Discovery endpoints answer with the configured defaults and log
    /// queries fail with 503.
    #[must_use]
    pub fn without_retriever(config: LogviewConfig) -> Self {
        Self {
            state: Arc::new(AppState::without_retriever(config)),
        }
    }

    /// Get the shared state.
    #[must_use]
    pub fn state(&self) -> Arc<AppState> {
        Arc::clone(&self.state)
    }

    /// Start the server and listen for connections.
    ///
    /// This method runs until the server encounters a fatal error.
    ///
    /// # Errors
    ///
    /// Returns an error if binding to the address fails.
    pub async fn serve(&self, addr: SocketAddr) -> ServerResult<()> {
        self.serve_with_shutdown(addr, std::future::pending()).await
    }

    /// Start the server with graceful shutdown support.
    ///
    /// The server will shut down when the provided future completes.
    ///
    /// # Errors
    ///
    /// Returns an error if binding to the address fails.
    pub async fn serve_with_shutdown<F>(&self, addr: SocketAddr, shutdown: F) -> ServerResult<()>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| ServerError::BindFailed(addr, e))?;

        let local = listener.local_addr().unwrap_or(addr);
        info!(addr = %local, "logview server listening");

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(|e| ServerError::Internal(e.to_string()))?;

        info!("logview server shut down");
        Ok(())
    }

    /// Create the router without starting the server.
    pub fn router(&self) -> axum::Router {
        create_router(self.state())
    }
}
