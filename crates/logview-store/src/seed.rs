//! Seeding a [`MemoryStore`] from a JSON-lines file.
//!
//! Each non-blank line is one serialized log record. The line is stored
//! verbatim as the sorted-set member, scored by its `timestamp`, and indexed
//! under its `level` and `service`. Lines that cannot be indexed are skipped
//! and counted.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use serde_json::Value;
use tracing::{info, warn};

use crate::error::{StoreError, StoreResult};
use crate::keys::{KeyLayout, service_name};
use crate::memory::MemoryStore;

/// Outcome of a seed run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedReport {
    /// Lines written to the store.
    pub indexed: usize,
    /// Lines rejected.
    pub skipped: usize,
}

/// Index fields extracted from one seed line.
#[derive(Debug, Clone, PartialEq, Eq)]
struct SeedLine {
    timestamp_ms: i64,
    level: String,
    service: String,
}

/// Loads a JSON-lines file into `store`.
///
/// # Errors
///
/// Returns an error if the file cannot be opened or read. Malformed lines
/// are not errors; they are counted in [`SeedReport::skipped`].
pub fn load_jsonl(
    store: &MemoryStore,
    keys: &KeyLayout,
    path: impl AsRef<Path>,
) -> StoreResult<SeedReport> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let report = load_reader(store, keys, BufReader::new(file))?;

    info!(
        path = %path.display(),
        indexed = report.indexed,
        skipped = report.skipped,
        "seeded store from file"
    );
    Ok(report)
}

/// Loads JSON lines from any buffered reader into `store`.
///
/// # Errors
///
/// Returns an error if reading fails.
pub fn load_reader(
    store: &MemoryStore,
    keys: &KeyLayout,
    reader: impl BufRead,
) -> StoreResult<SeedReport> {
    let mut report = SeedReport::default();

    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        match parse_line(idx + 1, trimmed) {
            Ok(seed) => {
                store.index_record(
                    keys,
                    seed.timestamp_ms,
                    &seed.level,
                    &seed.service,
                    trimmed.as_bytes(),
                );
                report.indexed += 1;
            }
            Err(e) => {
                warn!(error = %e, "skipping seed line");
                report.skipped += 1;
            }
        }
    }

    Ok(report)
}

fn parse_line(line_no: usize, line: &str) -> StoreResult<SeedLine> {
    let reject = |reason: String| StoreError::Seed {
        line: line_no,
        reason,
    };

    let value: Value = serde_json::from_str(line).map_err(|e| reject(format!("invalid JSON: {e}")))?;
    let object = value
        .as_object()
        .ok_or_else(|| reject("record is not a JSON object".to_string()))?;

    let timestamp_ms = object
        .get("timestamp")
        .and_then(timestamp_millis)
        .ok_or_else(|| reject("missing or invalid timestamp".to_string()))?;

    let level = object
        .get("level")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    let service = service_name(object.get("service"));

    Ok(SeedLine {
        timestamp_ms,
        level,
        service,
    })
}

/// Reads a millisecond timestamp written as an integer, a float, or a
/// numeric string.
#[must_use]
pub fn timestamp_millis(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().filter(|f| f.is_finite()).map(|f| f as i64))
        }
        _ => None,
    }
}
