//! Query criteria.
//!
//! A query has exactly one primary filter mode, expressed as the
//! [`LogQuery`] variant, plus a result bound.

use serde::{Deserialize, Serialize};

use crate::error::{Result, RetrievalError};

/// Result bound used when the caller does not give one.
pub const DEFAULT_LIMIT: i64 = 100;

/// Inclusive millisecond time range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    /// Start of the range (inclusive), ms since epoch.
    pub start_ms: i64,
    /// End of the range (inclusive), ms since epoch.
    pub end_ms: i64,
}

impl TimeRange {
    /// Creates a range. No ordering check is made here.
    #[must_use]
    pub const fn new(start_ms: i64, end_ms: i64) -> Self {
        Self { start_ms, end_ms }
    }

    /// Range covering `lookback_ms` milliseconds up to and including `end_ms`.
    #[must_use]
    pub const fn ending_at(end_ms: i64, lookback_ms: i64) -> Self {
        Self {
            start_ms: end_ms.saturating_sub(lookback_ms),
            end_ms,
        }
    }

    /// Returns true if `start_ms <= end_ms`.
    #[must_use]
    pub const fn is_ordered(&self) -> bool {
        self.start_ms <= self.end_ms
    }

    /// Checks if a timestamp falls within this range.
    #[must_use]
    pub const fn contains(&self, timestamp_ms: i64) -> bool {
        timestamp_ms >= self.start_ms && timestamp_ms <= self.end_ms
    }
}

/// The primary filter mode of a query. Modes are mutually exclusive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum LogQuery {
    /// Records whose timestamp falls in the range.
    ByTimeRange(TimeRange),
    /// Most recent records of one level.
    ByLevel {
        /// Requested level.
        level: String,
    },
    /// Most recent records of one service.
    ByService {
        /// Requested service.
        service: String,
    },
}

/// One retrieval request: a filter mode plus a result bound.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryCriteria {
    /// Primary filter mode.
    pub query: LogQuery,
    /// Maximum number of records to return.
    #[serde(default = "default_limit")]
    pub limit: i64,
}

const fn default_limit() -> i64 {
    DEFAULT_LIMIT
}

impl QueryCriteria {
    /// Creates criteria with the default limit.
    #[must_use]
    pub const fn new(query: LogQuery) -> Self {
        Self {
            query,
            limit: DEFAULT_LIMIT,
        }
    }

    /// Time-range criteria.
    #[must_use]
    pub const fn time_range(start_ms: i64, end_ms: i64) -> Self {
        Self::new(LogQuery::ByTimeRange(TimeRange::new(start_ms, end_ms)))
    }

    /// Level criteria.
    #[must_use]
    pub fn level(level: impl Into<String>) -> Self {
        Self::new(LogQuery::ByLevel {
            level: level.into(),
        })
    }

    /// Service criteria.
    #[must_use]
    pub fn service(service: impl Into<String>) -> Self {
        Self::new(LogQuery::ByService {
            service: service.into(),
        })
    }

    /// Sets the result bound.
    #[must_use]
    pub const fn with_limit(mut self, limit: i64) -> Self {
        self.limit = limit;
        self
    }

    /// Checks the criteria invariants.
    ///
    /// # Errors
    ///
    /// Returns [`RetrievalError::InvalidCriteria`] for a non-positive limit
    /// or an inverted time range.
    pub fn validate(&self) -> Result<()> {
        if self.limit <= 0 {
            return Err(RetrievalError::InvalidCriteria(format!(
                "limit must be positive, got {}",
                self.limit
            )));
        }
        if let LogQuery::ByTimeRange(range) = &self.query {
            if !range.is_ordered() {
                return Err(RetrievalError::InvalidCriteria(format!(
                    "start {} is after end {}",
                    range.start_ms, range.end_ms
                )));
            }
        }
        Ok(())
    }
}

/// Converts a caller-supplied limit into a usable bound.
///
/// Returns `None` for zero or negative limits.
#[must_use]
pub fn bounded_limit(limit: i64) -> Option<usize> {
    usize::try_from(limit).ok().filter(|l| *l > 0)
}
