//! # logview-server
//!
//! HTTP query surface for logs stored in sorted-set indices.
//!
//! The server owns a [`LogRetriever`](logview_core::LogRetriever) handed to
//! it at construction and exposes it over a small JSON API built on axum.
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use logview_core::LogRetriever;
//! use logview_server::{LogviewConfig, LogviewServer};
//! use logview_store::{LogStoreAdapter, MemoryStore};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = LogviewConfig::default();
//!     let store: Arc<dyn LogStoreAdapter> = Arc::new(MemoryStore::new());
//!     let addr = config.server.bind_addr;
//!
//!     let server = LogviewServer::new(config, LogRetriever::new(store));
//!     // server.serve(addr).await.unwrap();
//! }
//! ```
//!
//! ## API Endpoints
//!
//! | Endpoint | Method | Description |
//! |----------|--------|-------------|
//! | `/api/logs` | GET | Records by level, service, or time range, newest first |
//! | `/api/log-levels` | GET | Levels with stored records |
//! | `/api/services` | GET | Services with stored records |
//! | `/api/health` | GET | Liveness and store reachability |

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod handlers;
pub mod params;
pub mod routes;
pub mod server;
pub mod state;

pub use config::{DiscoverySettings, LogviewConfig, ServerSettings, StoreSettings};
pub use error::{ServerError, ServerResult};
pub use params::{LogsParams, parse_time};
pub use routes::create_router;
pub use server::LogviewServer;
pub use state::{AppState, SharedRetriever};
