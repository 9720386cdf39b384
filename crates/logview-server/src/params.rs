//! Parsing `/api/logs` query parameters into retrieval criteria.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use logview_core::{LogQuery, QueryCriteria, TimeRange};
use serde::Deserialize;

use crate::config::ServerSettings;
use crate::error::{ServerError, ServerResult};

/// Naive date-time layouts accepted for `start_time` / `end_time`.
const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Raw query parameters for `/api/logs`.
///
/// Empty values are treated as absent.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct LogsParams {
    /// Start of the time range (ISO-8601 or epoch milliseconds).
    pub start_time: Option<String>,
    /// End of the time range (ISO-8601 or epoch milliseconds).
    pub end_time: Option<String>,
    /// Level filter.
    pub level: Option<String>,
    /// Service filter.
    pub service: Option<String>,
    /// Result bound.
    pub limit: Option<String>,
}

impl LogsParams {
    /// Builds criteria for these parameters.
    ///
    /// A level filter wins over a service filter, which wins over the time
    /// range. Missing times default to the configured look-back window
    /// ending at `now`. The limit is capped at `settings.max_limit`.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::InvalidRequest`] for a non-numeric limit or an
    /// unparseable time.
    pub fn to_criteria(
        &self,
        now: DateTime<Utc>,
        settings: &ServerSettings,
    ) -> ServerResult<QueryCriteria> {
        let limit = match present(self.limit.as_ref()) {
            Some(raw) => raw.parse::<i64>().map_err(|_| {
                ServerError::InvalidRequest(format!("limit must be an integer, got '{raw}'"))
            })?,
            None => settings.default_limit,
        }
        .min(settings.max_limit);

        let query = if let Some(level) = present(self.level.as_ref()) {
            LogQuery::ByLevel {
                level: level.to_string(),
            }
        } else if let Some(service) = present(self.service.as_ref()) {
            LogQuery::ByService {
                service: service.to_string(),
            }
        } else {
            let end_ms = match present(self.end_time.as_ref()) {
                Some(raw) => parse_time(raw)?,
                None => now.timestamp_millis(),
            };
            let start_ms = match present(self.start_time.as_ref()) {
                Some(raw) => parse_time(raw)?,
                None => TimeRange::ending_at(now.timestamp_millis(), settings.lookback_ms()).start_ms,
            };
            LogQuery::ByTimeRange(TimeRange::new(start_ms, end_ms))
        };

        Ok(QueryCriteria::new(query).with_limit(limit))
    }
}

fn present(value: Option<&String>) -> Option<&str> {
    value.map(|v| v.trim()).filter(|v| !v.is_empty())
}

/// Parses a wire time into epoch milliseconds.
///
/// Accepts RFC 3339 (`2024-05-01T12:00:00Z`, `...+02:00`), naive
/// date-times (read as UTC), bare dates (midnight UTC), and integer epoch
/// milliseconds.
///
/// # Errors
///
/// Returns [`ServerError::InvalidRequest`] if no accepted layout matches.
pub fn parse_time(raw: &str) -> ServerResult<i64> {
    let raw = raw.trim();

    if let Ok(millis) = raw.parse::<i64>() {
        return Ok(millis);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.timestamp_millis());
    }
    for format in NAIVE_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, format) {
            return Ok(dt.and_utc().timestamp_millis());
        }
    }
    if let Some(dt) = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
    {
        return Ok(dt.and_utc().timestamp_millis());
    }

    Err(ServerError::InvalidRequest(format!(
        "unrecognized time '{raw}', expected ISO-8601 or epoch milliseconds"
    )))
}
