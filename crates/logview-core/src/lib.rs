//! # logview-core
//!
//! Log retrieval for the logview service.
//!
//! This crate provides:
//!
//! - [`LogRecord`]: One stored log line as structured data
//! - [`LogLevel`]: The conventional severity levels
//! - [`QueryCriteria`] / [`LogQuery`]: One filter mode plus a result bound
//! - [`LogRetriever`]: Turns criteria into bounded, newest-first result sets
//! - [`RetrievalError`]: Typed failures surfaced to callers
//!
//! ## Example
//!
//! ```rust
//! use logview_core::{LogRecord, LogRetriever, QueryCriteria};
//! use logview_store::{KeyLayout, MemoryStore};
//!
//! let store = MemoryStore::new();
//! let record = LogRecord::new(1000, "error", "monarch", "upstream timed out");
//! let payload = serde_json::to_vec(&record).unwrap_or_default();
//! store.index_record(&KeyLayout::default(), 1000, "error", "monarch", &payload);
//!
//! let retriever = LogRetriever::new(store);
//! let errors = retriever
//!     .query(&QueryCriteria::level("error").with_limit(10))
//!     .unwrap_or_default();
//! assert_eq!(errors.len(), 1);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod codec;
pub mod criteria;
pub mod error;
pub mod retriever;
pub mod types;

pub use codec::decode_member;
pub use criteria::{DEFAULT_LIMIT, LogQuery, QueryCriteria, TimeRange, bounded_limit};
pub use error::{Result, RetrievalError};
pub use retriever::{DEFAULT_SERVICE, DiscoveryDefaults, LogRetriever};
pub use types::{LogLevel, LogRecord};
