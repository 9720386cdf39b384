//! The log retriever.
//!
//! [`LogRetriever`] turns filter criteria into bounded reads against a
//! [`LogStoreAdapter`] and assembles newest-first result sets:
//!
//! - time-range queries read the global timeline by score range
//! - level and service queries read the matching secondary index
//! - discovery reads the level and service sets
//!
//! The retriever holds no mutable state. Concurrent calls are independent.

use std::collections::BTreeSet;

use logview_store::{KeyLayout, LogStoreAdapter, normalize_level};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::codec::decode_member;
use crate::criteria::{LogQuery, QueryCriteria, TimeRange, bounded_limit};
use crate::error::Result;
use crate::types::{LogLevel, LogRecord};

/// Placeholder service reported when no service index exists.
pub const DEFAULT_SERVICE: &str = "monarch";

/// Values reported by discovery when the store has nothing to say.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscoveryDefaults {
    /// Levels reported when no level index exists or the store fails.
    pub levels: BTreeSet<String>,
    /// Services reported when no service index exists or the store fails.
    pub services: BTreeSet<String>,
}

impl Default for DiscoveryDefaults {
    fn default() -> Self {
        Self {
            levels: LogLevel::ALL.iter().map(|l| l.as_str().to_string()).collect(),
            services: BTreeSet::from([DEFAULT_SERVICE.to_string()]),
        }
    }
}

/// Retrieves log records from a store.
pub struct LogRetriever<S> {
    store: S,
    keys: KeyLayout,
    defaults: DiscoveryDefaults,
}

impl<S: LogStoreAdapter> LogRetriever<S> {
    /// Creates a retriever over `store` with the default key layout and
    /// discovery defaults.
    #[must_use]
    pub fn new(store: S) -> Self {
        Self {
            store,
            keys: KeyLayout::default(),
            defaults: DiscoveryDefaults::default(),
        }
    }

    /// Uses a different key layout.
    #[must_use]
    pub fn with_layout(mut self, keys: KeyLayout) -> Self {
        self.keys = keys;
        self
    }

    /// Uses different discovery defaults.
    #[must_use]
    pub fn with_defaults(mut self, defaults: DiscoveryDefaults) -> Self {
        self.defaults = defaults;
        self
    }

    /// Returns the underlying store.
    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Returns the key layout.
    #[must_use]
    pub const fn keys(&self) -> &KeyLayout {
        &self.keys
    }

    /// Returns the discovery defaults.
    #[must_use]
    pub const fn defaults(&self) -> &DiscoveryDefaults {
        &self.defaults
    }

    /// Runs a query described by `criteria`.
    ///
    /// Invalid criteria yield an empty result rather than an error.
    ///
    /// # Errors
    ///
    /// Returns [`RetrievalError::StoreUnavailable`](crate::RetrievalError::StoreUnavailable)
    /// if the store cannot be read.
    pub fn query(&self, criteria: &QueryCriteria) -> Result<Vec<LogRecord>> {
        if let Err(e) = criteria.validate() {
            debug!(error = %e, "normalizing invalid criteria to an empty result");
            return Ok(Vec::new());
        }

        match &criteria.query {
            LogQuery::ByTimeRange(range) => {
                self.get_logs_by_timerange(range.start_ms, range.end_ms, criteria.limit)
            }
            LogQuery::ByLevel { level } => self.get_logs_by_level(level, criteria.limit),
            LogQuery::ByService { service } => self.get_logs_by_service(service, criteria.limit),
        }
    }

    /// Returns up to `limit` records with `start_ms <= timestamp <= end_ms`,
    /// newest first.
    ///
    /// An inverted range or a non-positive limit yields an empty result.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub fn get_logs_by_timerange(
        &self,
        start_ms: i64,
        end_ms: i64,
        limit: i64,
    ) -> Result<Vec<LogRecord>> {
        let range = TimeRange::new(start_ms, end_ms);
        let Some(limit) = bounded_limit(limit) else {
            return Ok(Vec::new());
        };
        if !range.is_ordered() {
            return Ok(Vec::new());
        }

        self.fetch(&self.keys.timeline(), range, limit, |record| {
            range.contains(record.timestamp)
        })
    }

    /// Returns the `limit` most recent records of `level`, newest first.
    ///
    /// The level is normalized before lookup. Unknown levels yield an
    /// empty result.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub fn get_logs_by_level(&self, level: &str, limit: i64) -> Result<Vec<LogRecord>> {
        let Some(limit) = bounded_limit(limit) else {
            return Ok(Vec::new());
        };
        // A blank query names no level; only stored records fold blank to info.
        if level.trim().is_empty() {
            return Ok(Vec::new());
        }
        let level = normalize_level(level);

        self.fetch(
            &self.keys.level_index(&level),
            TimeRange::new(i64::MIN, i64::MAX),
            limit,
            |record| record.level == level,
        )
    }

    /// Returns the `limit` most recent records of `service`, newest first.
    ///
    /// Unknown services yield an empty result.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub fn get_logs_by_service(&self, service: &str, limit: i64) -> Result<Vec<LogRecord>> {
        let Some(limit) = bounded_limit(limit) else {
            return Ok(Vec::new());
        };

        self.fetch(
            &self.keys.service_index(service),
            TimeRange::new(i64::MIN, i64::MAX),
            limit,
            |record| record.service == service,
        )
    }

    /// Returns the levels that currently have an index.
    ///
    /// An empty level set is reported as the configured defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read. Use
    /// [`available_log_levels_or_default`](Self::available_log_levels_or_default)
    /// to fall back instead.
    pub fn get_available_log_levels(&self) -> Result<BTreeSet<String>> {
        let levels: BTreeSet<String> = self
            .store
            .members(&self.keys.levels_set())?
            .iter()
            .map(|l| normalize_level(l))
            .collect();

        if levels.is_empty() {
            return Ok(self.defaults.levels.clone());
        }
        Ok(levels)
    }

    /// Returns the services that currently have an index.
    ///
    /// An empty service set is reported as the configured defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub fn get_available_services(&self) -> Result<BTreeSet<String>> {
        let services: BTreeSet<String> = self
            .store
            .members(&self.keys.services_set())?
            .into_iter()
            .filter(|s| !s.is_empty())
            .collect();

        if services.is_empty() {
            return Ok(self.defaults.services.clone());
        }
        Ok(services)
    }

    /// Like [`get_available_log_levels`](Self::get_available_log_levels) but
    /// never fails: store errors are logged and the defaults returned.
    pub fn available_log_levels_or_default(&self) -> BTreeSet<String> {
        self.get_available_log_levels().unwrap_or_else(|e| {
            warn!(error = %e, "level discovery failed, using defaults");
            self.defaults.levels.clone()
        })
    }

    /// Like [`get_available_services`](Self::get_available_services) but
    /// never fails: store errors are logged and the defaults returned.
    pub fn available_services_or_default(&self) -> BTreeSet<String> {
        self.get_available_services().unwrap_or_else(|e| {
            warn!(error = %e, "service discovery failed, using defaults");
            self.defaults.services.clone()
        })
    }

    /// Reads one index, decodes members, drops those failing `keep`, and
    /// returns the rest newest first.
    fn fetch(
        &self,
        index_key: &str,
        range: TimeRange,
        limit: usize,
        keep: impl Fn(&LogRecord) -> bool,
    ) -> Result<Vec<LogRecord>> {
        let members = self
            .store
            .range_by_score(index_key, range.start_ms, range.end_ms, limit)?;

        let fetched = members.len();
        let mut skipped = 0usize;
        let mut records = Vec::with_capacity(fetched);

        for member in &members {
            match decode_member(member) {
                Ok(record) if keep(&record) => records.push(record),
                Ok(record) => {
                    debug!(
                        index = index_key,
                        timestamp = record.timestamp,
                        "dropping record that does not match its index"
                    );
                    skipped += 1;
                }
                Err(e) => {
                    debug!(index = index_key, score = member.score, error = %e, "skipping malformed record");
                    skipped += 1;
                }
            }
        }

        // Stable: equal timestamps keep the store's deterministic order.
        records.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        records.truncate(limit);

        debug!(
            index = index_key,
            fetched,
            returned = records.len(),
            skipped,
            "log query complete"
        );
        Ok(records)
    }
}
