//! # logview-store
//!
//! Store access for the logview retriever.
//!
//! This crate provides:
//!
//! - [`LogStoreAdapter`]: The read contract over a sorted-set capable store
//! - [`KeyLayout`]: Key names for the time index, secondary indices, and
//!   discovery sets
//! - [`MemoryStore`]: Thread-safe in-memory implementation
//! - [`load_jsonl`]: Seeding a [`MemoryStore`] from a JSON-lines file
//!
//! ## Example
//!
//! ```rust
//! use logview_store::{KeyLayout, LogStoreAdapter, MemoryStore};
//!
//! let store = MemoryStore::new();
//! let keys = KeyLayout::default();
//! store.index_record(&keys, 1000, "info", "monarch", br#"{"timestamp":1000}"#);
//!
//! let newest = store.range_by_score(&keys.timeline(), 0, 2000, 10).unwrap_or_default();
//! assert_eq!(newest.len(), 1);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod keys;
pub mod memory;
pub mod seed;
pub mod traits;

pub use error::{StoreError, StoreResult};
pub use keys::{DEFAULT_PREFIX, KeyLayout, normalize_level, service_name};
pub use memory::MemoryStore;
pub use seed::{SeedReport, load_jsonl, load_reader, timestamp_millis};
pub use traits::{LogStoreAdapter, ScoredMember};
