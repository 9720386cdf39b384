//! The store adapter contract.
//!
//! This module provides the [`LogStoreAdapter`] trait for abstracting over
//! key-value / sorted-set capable backends (Valkey, the in-memory store, ...).
//! The retriever only ever reads through this trait.

use std::collections::BTreeSet;

use crate::error::StoreResult;

/// One sorted-set member together with its score.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoredMember {
    /// Score the member was stored under (timestamp in milliseconds).
    pub score: i64,
    /// Raw member bytes (a serialized record).
    pub member: Vec<u8>,
}

impl ScoredMember {
    /// Creates a scored member.
    #[must_use]
    pub fn new(score: i64, member: impl Into<Vec<u8>>) -> Self {
        Self {
            score,
            member: member.into(),
        }
    }
}

/// Read capabilities the retriever needs from a store.
///
/// Implementors own connection handling, retries, and per-call timeouts.
/// Every method may fail with a connectivity error.
pub trait LogStoreAdapter: Send + Sync {
    /// Reads a plain value. Returns `None` if the key does not exist.
    fn get(&self, key: &str) -> StoreResult<Option<Vec<u8>>>;

    /// Reads members of a sorted set with `min <= score <= max`.
    ///
    /// Results are ordered by score descending (most recent first), with
    /// equal scores ordered by member bytes descending, and hold at most
    /// `limit` members. A missing key yields an empty vector.
    fn range_by_score(
        &self,
        index_key: &str,
        min: i64,
        max: i64,
        limit: usize,
    ) -> StoreResult<Vec<ScoredMember>>;

    /// Reads all members of a set. A missing key yields an empty set.
    fn members(&self, set_key: &str) -> StoreResult<BTreeSet<String>>;

    /// Checks that the store is reachable.
    fn ping(&self) -> StoreResult<()>;
}

impl<T: LogStoreAdapter + ?Sized> LogStoreAdapter for std::sync::Arc<T> {
    fn get(&self, key: &str) -> StoreResult<Option<Vec<u8>>> {
        (**self).get(key)
    }

    fn range_by_score(
        &self,
        index_key: &str,
        min: i64,
        max: i64,
        limit: usize,
    ) -> StoreResult<Vec<ScoredMember>> {
        (**self).range_by_score(index_key, min, max, limit)
    }

    fn members(&self, set_key: &str) -> StoreResult<BTreeSet<String>> {
        (**self).members(set_key)
    }

    fn ping(&self) -> StoreResult<()> {
        (**self).ping()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;
    use std::sync::Arc;

    /// A store that is never reachable.
    struct DownStore;

    impl LogStoreAdapter for DownStore {
        fn get(&self, _key: &str) -> StoreResult<Option<Vec<u8>>> {
            Err(StoreError::Unavailable("down".to_string()))
        }

        fn range_by_score(
            &self,
            _index_key: &str,
            _min: i64,
            _max: i64,
            _limit: usize,
        ) -> StoreResult<Vec<ScoredMember>> {
            Err(StoreError::Unavailable("down".to_string()))
        }

        fn members(&self, _set_key: &str) -> StoreResult<BTreeSet<String>> {
            Err(StoreError::Unavailable("down".to_string()))
        }

        fn ping(&self) -> StoreResult<()> {
            Err(StoreError::Unavailable("down".to_string()))
        }
    }

    #[test]
    fn scored_member_new() {
        let m = ScoredMember::new(42, "payload");
        assert_eq!(m.score, 42);
        assert_eq!(m.member, b"payload".to_vec());
    }

    #[test]
    fn arc_forwards_to_inner() {
        let store: Arc<dyn LogStoreAdapter> = Arc::new(DownStore);
        assert!(store.ping().is_err());
        assert!(store.get("k").is_err());
        assert!(store.members("s").is_err());
        assert!(store.range_by_score("z", 0, 1, 10).is_err());
    }

    #[test]
    fn trait_object_is_send_sync() {
        fn assert_send_sync<T: Send + Sync + ?Sized>() {}
        assert_send_sync::<dyn LogStoreAdapter>();
    }
}
