//! Turning stored sorted-set members into [`LogRecord`]s.
//!
//! Members are JSON objects written by the ingestion path. Decoding is
//! lenient about shape and strict about identity: a record must be an
//! object and must have a timestamp, either its own or the score it was
//! stored under.

use std::collections::BTreeMap;

use logview_store::{ScoredMember, normalize_level, service_name, timestamp_millis};
use serde_json::{Map, Value};

use crate::error::{Result, RetrievalError};
use crate::types::LogRecord;

const KNOWN_KEYS: [&str; 5] = ["timestamp", "level", "service", "message", "fields"];

/// Decodes one scored member.
///
/// # Errors
///
/// Returns [`RetrievalError::MalformedRecord`] if the member is not a JSON
/// object or carries a timestamp that cannot be read.
pub fn decode_member(member: &ScoredMember) -> Result<LogRecord> {
    let value: Value = serde_json::from_slice(&member.member)
        .map_err(|e| RetrievalError::MalformedRecord(format!("invalid JSON: {e}")))?;

    match value {
        Value::Object(object) => decode_object(object, member.score),
        other => Err(RetrievalError::MalformedRecord(format!(
            "expected a JSON object, found {}",
            kind(&other)
        ))),
    }
}

fn decode_object(mut object: Map<String, Value>, score: i64) -> Result<LogRecord> {
    let timestamp = match object.get("timestamp") {
        None | Some(Value::Null) => score,
        Some(raw) => timestamp_millis(raw).ok_or_else(|| {
            RetrievalError::MalformedRecord(format!("unreadable timestamp: {raw}"))
        })?,
    };

    let level = normalize_level(object.get("level").and_then(Value::as_str).unwrap_or_default());
    let service = service_name(object.get("service"));
    let message = text(object.get("message"));

    let fields = match object.remove("fields") {
        Some(Value::Object(map)) => map.into_iter().collect(),
        Some(Value::Null) | None => object
            .into_iter()
            .filter(|(key, _)| !KNOWN_KEYS.contains(&key.as_str()))
            .collect(),
        Some(other) => BTreeMap::from([("fields".to_string(), other)]),
    };

    Ok(LogRecord {
        timestamp,
        level,
        service,
        message,
        fields,
    })
}

fn text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

const fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
