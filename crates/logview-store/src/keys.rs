//! Key layout shared by the ingestion path and the retriever.
//!
//! All keys live under one prefix (default `logs`):
//!
//! | Key | Type | Content |
//! |-----|------|---------|
//! | `{prefix}:timeline` | sorted set | score = timestamp ms, member = record JSON |
//! | `{prefix}:level:{level}` | sorted set | same, one per level |
//! | `{prefix}:service:{service}` | sorted set | same, one per service |
//! | `{prefix}:levels` | set | levels that have an index |
//! | `{prefix}:services` | set | services that have an index |

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Default key prefix.
pub const DEFAULT_PREFIX: &str = "logs";

/// Key names for one log keyspace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyLayout {
    prefix: String,
}

impl Default for KeyLayout {
    fn default() -> Self {
        Self::new(DEFAULT_PREFIX)
    }
}

impl KeyLayout {
    /// Creates a layout rooted at `prefix`.
    #[must_use]
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    /// Returns the key prefix.
    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Global time-ordered index.
    #[must_use]
    pub fn timeline(&self) -> String {
        format!("{}:timeline", self.prefix)
    }

    /// Secondary index for one level. The level is normalized first.
    #[must_use]
    pub fn level_index(&self, level: &str) -> String {
        format!("{}:level:{}", self.prefix, normalize_level(level))
    }

    /// Secondary index for one service.
    #[must_use]
    pub fn service_index(&self, service: &str) -> String {
        format!("{}:service:{service}", self.prefix)
    }

    /// Set of levels that have a secondary index.
    #[must_use]
    pub fn levels_set(&self) -> String {
        format!("{}:levels", self.prefix)
    }

    /// Set of services that have a secondary index.
    #[must_use]
    pub fn services_set(&self) -> String {
        format!("{}:services", self.prefix)
    }
}

/// Canonical spelling of a level as used in keys and records.
///
/// Trims, lower-cases, and folds `warn` into `warning`. An empty level
/// becomes `info`.
#[must_use]
pub fn normalize_level(level: &str) -> String {
    let level = level.trim().to_lowercase();
    match level.as_str() {
        "" => "info".to_string(),
        "warn" => "warning".to_string(),
        _ => level,
    }
}

/// Service name of a raw record's `service` value.
///
/// Strings are kept verbatim, other JSON values use their JSON text, and a
/// missing or null service is empty.
#[must_use]
pub fn service_name(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}
