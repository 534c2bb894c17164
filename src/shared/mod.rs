//! Thread-safe cache handle
//!
//! `TriIndexCache` is single-threaded. `SharedCache` serializes every call
//! behind one mutex so no thread ever sees the three indexes half-updated.
//! Lookups return owned clones because a borrowed record cannot outlive the lock.

use crate::error::CacheResult;
use crate::store::{CacheStats, Record, RecordDraft, TriIndexCache};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::warn;

/// Cloneable, thread-safe handle to a single cache
#[derive(Debug, Clone, Default)]
pub struct SharedCache {
    inner: Arc<Mutex<TriIndexCache>>,
}

impl SharedCache {
    /// Create a handle to a new, empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap an existing cache
    pub fn from_cache(cache: TriIndexCache) -> Self {
        SharedCache {
            inner: Arc::new(Mutex::new(cache)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, TriIndexCache> {
        // Cache operations never panic halfway through a mutation,
        // so a poisoned lock still guards consistent indexes.
        self.inner.lock().unwrap_or_else(|poisoned| {
            warn!("Cache lock was poisoned, recovering");
            poisoned.into_inner()
        })
    }

    /// Number of records in the cache
    pub fn size(&self) -> usize {
        self.lock().size()
    }

    /// Add a record, see [`TriIndexCache::add`]
    pub fn add(&self, record: Record) -> bool {
        self.lock().add(record)
    }

    /// Add a record that may be absent, see [`TriIndexCache::try_add`]
    pub fn try_add(&self, record: Option<Record>) -> CacheResult<bool> {
        self.lock().try_add(record)
    }

    /// Add a record built from a draft, see [`TriIndexCache::add_draft`]
    pub fn add_draft(&self, draft: RecordDraft) -> CacheResult<bool> {
        self.lock().add_draft(draft)
    }

    /// Get a copy of the record with the given account
    pub fn get_by_account(&self, account: i64) -> Option<Record> {
        self.lock().get_by_account(account).cloned()
    }

    /// Get a copy of the record with the given name
    pub fn get_by_name(&self, name: &str) -> Option<Record> {
        self.lock().get_by_name(name).cloned()
    }

    /// Get a copy of the record with the given value
    pub fn get_by_value(&self, value: f64) -> Option<Record> {
        self.lock().get_by_value(value).cloned()
    }

    /// Change an account, see [`TriIndexCache::update_account`]
    pub fn update_account(&self, old: i64, new: i64) -> Option<Record> {
        self.lock().update_account(old, new).cloned()
    }

    /// Change a name, see [`TriIndexCache::update_name`]
    pub fn update_name(&self, old: &str, new: impl Into<String>) -> Option<Record> {
        self.lock().update_name(old, new).cloned()
    }

    /// Change a value, see [`TriIndexCache::update_value`]
    pub fn update_value(&self, old: f64, new: f64) -> Option<Record> {
        self.lock().update_value(old, new).cloned()
    }

    /// Remove a record, see [`TriIndexCache::remove`]
    pub fn remove(&self, record: &Record) -> bool {
        self.lock().remove(record)
    }

    /// Get statistics about the cache
    pub fn stats(&self) -> CacheStats {
        self.lock().stats()
    }

    /// Run a closure with exclusive access to the cache
    ///
    /// Use this to make several operations appear as one step to other threads.
    pub fn with<R>(&self, f: impl FnOnce(&mut TriIndexCache) -> R) -> R {
        f(&mut *self.lock())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_concurrent_adds_keep_uniqueness() {
        let cache = SharedCache::new();

        // Every thread races to add the same 100 records
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let cache = cache.clone();
                thread::spawn(move || {
                    (0..100)
                        .filter(|&i| cache.add(Record::new(i, format!("r{}", i), i as f64)))
                        .count()
                })
            })
            .collect();

        let admitted: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();

        assert_eq!(admitted, 100);
        assert_eq!(cache.size(), 100);
    }

    #[test]
    fn test_with_groups_operations() {
        let cache = SharedCache::new();
        cache.add(Record::new(1, "Alice", 10.0));

        let moved = cache.with(|c| {
            let record = c.get_by_account(1).cloned();
            record.map(|r| c.remove(&r) && c.add(Record::new(5, r.name(), r.value())))
        });

        assert_eq!(moved, Some(true));
        assert_eq!(cache.get_by_name("Alice"), Some(Record::new(5, "Alice", 10.0)));
    }

    #[test]
    fn test_from_cache_keeps_records() {
        let mut inner = TriIndexCache::new();
        inner.add(Record::new(1, "Alice", 10.0));

        let cache = SharedCache::from_cache(inner);

        assert_eq!(cache.get_by_value(10.0), Some(Record::new(1, "Alice", 10.0)));
        assert_eq!(cache.stats().records, 1);
    }

    #[test]
    fn test_absent_and_incomplete_records() {
        let cache = SharedCache::new();

        assert!(cache.try_add(None).is_err());
        assert_eq!(cache.try_add(Some(Record::new(1, "Alice", 10.0))), Ok(true));
        assert!(cache.add_draft(RecordDraft::default()).is_err());
        assert_eq!(cache.add_draft(RecordDraft::complete(2, "Bob", 20.0)), Ok(true));
        assert_eq!(cache.size(), 2);
    }

    #[test]
    fn test_update_then_remove() {
        let cache = SharedCache::new();
        cache.add(Record::new(1, "Alice", 10.0));
        cache.add(Record::new(2, "Bob", 20.0));

        assert_eq!(
            cache.update_name("Alice", "Alicia"),
            Some(Record::new(1, "Alicia", 10.0))
        );
        // Collision leaves the record as it was
        assert_eq!(
            cache.update_value(10.0, 20.0),
            Some(Record::new(1, "Alicia", 10.0))
        );
        assert_eq!(
            cache.update_value(10.0, 15.0),
            Some(Record::new(1, "Alicia", 15.0))
        );

        assert!(!cache.remove(&Record::new(1, "Alice", 10.0)));
        assert!(cache.remove(&Record::new(1, "Alicia", 15.0)));
        assert!(cache.get_by_name("Alicia").is_none());

        let stats = cache.stats();
        assert_eq!(stats.records, 1);
        assert_eq!(stats.free_slots, 1);
    }
}
