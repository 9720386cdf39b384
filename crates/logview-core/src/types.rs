//! Core record types.
//!
//! This module provides:
//! - [`LogLevel`]: The conventional severity levels
//! - [`LogRecord`]: One stored log line as structured data

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use logview_store::normalize_level;
use serde::{Deserialize, Serialize};

/// Conventional severity levels.
///
/// Records carry their level as a string so that levels outside this set
/// survive retrieval unchanged; this enum names the well-known ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Debugging information
    Debug,
    /// General information
    Info,
    /// Warning conditions
    Warning,
    /// Error conditions
    Error,
}

impl LogLevel {
    /// All conventional levels, in the order the viewer lists them.
    pub const ALL: [Self; 4] = [Self::Info, Self::Error, Self::Warning, Self::Debug];

    /// Returns the canonical string form.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_level(s).as_str() {
            "debug" => Ok(Self::Debug),
            "info" => Ok(Self::Info),
            "warning" => Ok(Self::Warning),
            "error" => Ok(Self::Error),
            other => Err(format!("unknown log level: {other}")),
        }
    }
}

/// One emitted log line.
///
/// Records are produced by the ingestion path and never mutated here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogRecord {
    /// Milliseconds since the Unix epoch.
    pub timestamp: i64,
    /// Normalized severity level (see [`normalize_level`]).
    pub level: String,
    /// Identifier of the emitting component.
    pub service: String,
    /// Text payload.
    pub message: String,
    /// Additional structured context.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub fields: BTreeMap<String, serde_json::Value>,
}

impl LogRecord {
    /// Creates a record without structured fields. The level is normalized.
    #[must_use]
    pub fn new(
        timestamp: i64,
        level: &str,
        service: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            timestamp,
            level: normalize_level(level),
            service: service.into(),
            message: message.into(),
            fields: BTreeMap::new(),
        }
    }

    /// Adds a structured field.
    #[must_use]
    pub fn with_field(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.fields.insert(key.into(), value);
        self
    }

    /// Returns true if the timestamp lies in `[start_ms, end_ms]`.
    #[must_use]
    pub const fn is_within(&self, start_ms: i64, end_ms: i64) -> bool {
        self.timestamp >= start_ms && self.timestamp <= end_ms
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn log_level_as_str() {
        assert_eq!(LogLevel::Debug.as_str(), "debug");
        assert_eq!(LogLevel::Info.as_str(), "info");
        assert_eq!(LogLevel::Warning.as_str(), "warning");
        assert_eq!(LogLevel::Error.as_str(), "error");
        assert_eq!(LogLevel::Warning.to_string(), "warning");
    }

    #[test_case("info", LogLevel::Info ; "lower")]
    #[test_case("ERROR", LogLevel::Error ; "upper")]
    #[test_case("warn", LogLevel::Warning ; "warn alias")]
    #[test_case(" Debug ", LogLevel::Debug ; "padded")]
    fn log_level_from_str(input: &str, expected: LogLevel) {
        assert_eq!(input.parse::<LogLevel>(), Ok(expected));
    }

    #[test]
    fn log_level_from_str_unknown() {
        assert!("fatal".parse::<LogLevel>().is_err());
    }

    #[test]
    fn log_level_serialization() {
        let json = serde_json::to_string(&LogLevel::Warning).unwrap();
        assert_eq!(json, "\"warning\"");
    }

    #[test]
    fn record_new_normalizes_level() {
        let record = LogRecord::new(1000, "WARN", "monarch", "slow request");
        assert_eq!(record.level, "warning");
        assert_eq!(record.level.parse::<LogLevel>(), Ok(LogLevel::Warning));
        assert!(record.fields.is_empty());
    }

    #[test]
    fn record_unknown_level_is_kept() {
        let record = LogRecord::new(1000, "critical", "monarch", "disk full");
        assert_eq!(record.level, "critical");
        assert!(record.level.parse::<LogLevel>().is_err());
    }

    #[test]
    fn record_is_within_is_inclusive() {
        let record = LogRecord::new(2000, "info", "svc", "m");
        assert!(record.is_within(2000, 2000));
        assert!(record.is_within(1000, 3000));
        assert!(!record.is_within(2001, 3000));
        assert!(!record.is_within(1000, 1999));
    }

    #[test]
    fn record_serializes_as_plain_object() {
        let record = LogRecord::new(1000, "info", "monarch", "started")
            .with_field("request_id", serde_json::json!("abc"));
        let value = serde_json::to_value(&record).unwrap();

        assert_eq!(value["timestamp"], 1000);
        assert_eq!(value["level"], "info");
        assert_eq!(value["service"], "monarch");
        assert_eq!(value["message"], "started");
        assert_eq!(value["fields"]["request_id"], "abc");
    }

    #[test]
    fn record_without_fields_omits_key() {
        let record = LogRecord::new(1, "info", "s", "m");
        let value = serde_json::to_value(&record).unwrap();
        assert!(value.get("fields").is_none());
    }
}
