//! In-memory store with sorted sets, sets, and plain values.
//!
//! This module provides:
//! - [`MemoryStore`]: Thread-safe store implementing [`LogStoreAdapter`]
//! - Store-level write primitives used by seeding and tests
//!
//! Sorted sets keep members in a `BTreeSet<(score, member)>`, so a score
//! range read costs `O(log n + k)` for `k` returned members.

use std::collections::{BTreeSet, HashMap};
use std::ops::Bound;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::RwLock;
use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::keys::{KeyLayout, normalize_level};
use crate::traits::{LogStoreAdapter, ScoredMember};

/// One sorted set. A member appears at most once; re-adding it moves it.
#[derive(Debug, Default)]
struct SortedSet {
    ordered: BTreeSet<(i64, Vec<u8>)>,
    scores: HashMap<Vec<u8>, i64>,
}

impl SortedSet {
    fn insert(&mut self, score: i64, member: Vec<u8>) -> bool {
        if let Some(old) = self.scores.insert(member.clone(), score) {
            self.ordered.remove(&(old, member.clone()));
            self.ordered.insert((score, member));
            false
        } else {
            self.ordered.insert((score, member));
            true
        }
    }

    fn range_rev(&self, min: i64, max: i64, limit: usize) -> Vec<ScoredMember> {
        let lower = Bound::Included((min, Vec::new()));
        let upper = match max.checked_add(1) {
            Some(next) => Bound::Excluded((next, Vec::new())),
            None => Bound::Unbounded,
        };

        self.ordered
            .range((lower, upper))
            .rev()
            .take(limit)
            .map(|(score, member)| ScoredMember::new(*score, member.clone()))
            .collect()
    }

    fn len(&self) -> usize {
        self.ordered.len()
    }
}

#[derive(Debug, Default)]
struct StoreData {
    sorted: HashMap<String, SortedSet>,
    sets: HashMap<String, BTreeSet<String>>,
    values: HashMap<String, Vec<u8>>,
}

/// Thread-safe in-memory store.
///
/// Reads go through [`LogStoreAdapter`]. Writes are plain store primitives
/// (`zadd`, `sadd`, `set`) plus [`MemoryStore::index_record`], which writes
/// one serialized record under every key of a [`KeyLayout`].
#[derive(Debug)]
pub struct MemoryStore {
    data: RwLock<StoreData>,
    available: AtomicBool,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    /// Creates an empty, reachable store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            data: RwLock::new(StoreData::default()),
            available: AtomicBool::new(true),
        }
    }

    /// Makes every subsequent read succeed (`true`) or fail with
    /// [`StoreError::Unavailable`] (`false`).
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::Release);
    }

    /// Returns whether reads are currently served.
    #[must_use]
    pub fn is_available(&self) -> bool {
        self.available.load(Ordering::Acquire)
    }

    /// Adds `member` to the sorted set at `key` with `score`.
    ///
    /// Returns `true` if the member was new, `false` if its score was updated.
    pub fn zadd(&self, key: &str, score: i64, member: impl Into<Vec<u8>>) -> bool {
        self.data
            .write()
            .sorted
            .entry(key.to_string())
            .or_default()
            .insert(score, member.into())
    }

    /// Adds `member` to the set at `key`. Returns `true` if it was new.
    pub fn sadd(&self, key: &str, member: impl Into<String>) -> bool {
        self.data
            .write()
            .sets
            .entry(key.to_string())
            .or_default()
            .insert(member.into())
    }

    /// Stores a plain value.
    pub fn set(&self, key: &str, value: impl Into<Vec<u8>>) {
        self.data.write().values.insert(key.to_string(), value.into());
    }

    /// Number of members in the sorted set at `key`.
    #[must_use]
    pub fn zcard(&self, key: &str) -> usize {
        self.data.read().sorted.get(key).map_or(0, SortedSet::len)
    }

    /// Writes one serialized record into the timeline, its level and service
    /// indices, and the discovery sets.
    #[allow(clippy::significant_drop_tightening)]
    pub fn index_record(
        &self,
        keys: &KeyLayout,
        timestamp_ms: i64,
        level: &str,
        service: &str,
        payload: &[u8],
    ) {
        let level = normalize_level(level);
        let mut data = self.data.write();

        for key in [
            keys.timeline(),
            keys.level_index(&level),
            keys.service_index(service),
        ] {
            data.sorted
                .entry(key)
                .or_default()
                .insert(timestamp_ms, payload.to_vec());
        }

        data.sets
            .entry(keys.levels_set())
            .or_default()
            .insert(level.clone());
        data.sets
            .entry(keys.services_set())
            .or_default()
            .insert(service.to_string());

        debug!(timestamp_ms, level = %level, service, "indexed record");
    }

    fn check_available(&self) -> StoreResult<()> {
        if self.is_available() {
            Ok(())
        } else {
            Err(StoreError::Unavailable(
                "memory store marked unavailable".to_string(),
            ))
        }
    }
}

impl LogStoreAdapter for MemoryStore {
    fn get(&self, key: &str) -> StoreResult<Option<Vec<u8>>> {
        self.check_available()?;
        Ok(self.data.read().values.get(key).cloned())
    }

    fn range_by_score(
        &self,
        index_key: &str,
        min: i64,
        max: i64,
        limit: usize,
    ) -> StoreResult<Vec<ScoredMember>> {
        self.check_available()?;
        if min > max || limit == 0 {
            return Ok(Vec::new());
        }
        Ok(self
            .data
            .read()
            .sorted
            .get(index_key)
            .map(|set| set.range_rev(min, max, limit))
            .unwrap_or_default())
    }

    fn members(&self, set_key: &str) -> StoreResult<BTreeSet<String>> {
        self.check_available()?;
        Ok(self
            .data
            .read()
            .sets
            .get(set_key)
            .cloned()
            .unwrap_or_default())
    }

    fn ping(&self) -> StoreResult<()> {
        self.check_available()
    }
}
