//! Triple-indexed record cache

use super::key::ValueKey;
use super::record::{Record, RecordDraft};
use crate::error::{CacheError, CacheResult};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{debug, trace};

/// Stable handle to a slot in the record arena
type RecordId = usize;

/// In-memory record cache indexed by account, name and value
///
/// Records live once in an arena; each of the three `BTreeMap` indexes maps
/// a key to the arena slot of its record. Every field is a unique key across
/// the whole cache, and every index always holds exactly the same records.
/// All operations cost O(log n), except `size()` which is O(1).
///
/// The cache is single-threaded. Wrap it in a [`SharedCache`](crate::SharedCache)
/// to use it from several threads.
#[derive(Debug, Default)]
pub struct TriIndexCache {
    /// Record slots; `None` marks a free slot
    records: Vec<Option<Record>>,

    /// Free slots available for reuse
    free: Vec<RecordId>,

    by_account: BTreeMap<i64, RecordId>,
    by_name: BTreeMap<String, RecordId>,
    by_value: BTreeMap<ValueKey, RecordId>,
}

impl TriIndexCache {
    /// Create a new, empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty cache whose arena can hold `capacity` records without reallocating
    pub fn with_capacity(capacity: usize) -> Self {
        TriIndexCache {
            records: Vec::with_capacity(capacity),
            ..Self::default()
        }
    }

    /// Number of records in the cache
    pub fn size(&self) -> usize {
        self.by_account.len()
    }

    /// Same as [`size`](Self::size)
    pub fn len(&self) -> usize {
        self.size()
    }

    /// Check if the cache is empty
    pub fn is_empty(&self) -> bool {
        self.by_account.is_empty()
    }

    /// Add a record
    ///
    /// The record is admitted only if its account, name and value are all
    /// free. Returns `false` and leaves the cache untouched otherwise.
    pub fn add(&mut self, record: Record) -> bool {
        if self.by_account.contains_key(&record.account())
            || self.by_name.contains_key(record.name())
            || self.by_value.contains_key(&ValueKey::new(record.value()))
        {
            debug!(
                account = record.account(),
                name = record.name(),
                value = record.value(),
                "Rejected record: key already taken"
            );
            return false;
        }

        let account = record.account();
        let name = record.name().to_owned();
        let value = ValueKey::new(record.value());
        let id = self.alloc(record);

        self.by_account.insert(account, id);
        self.by_name.insert(name, id);
        self.by_value.insert(value, id);

        trace!(account, slot = id, "Added record");
        true
    }

    /// Add a record that may be absent
    ///
    /// Fails with [`CacheError::InvalidArgument`] if `record` is `None`,
    /// otherwise behaves like [`add`](Self::add).
    pub fn try_add(&mut self, record: Option<Record>) -> CacheResult<bool> {
        let record = record.ok_or_else(|| CacheError::invalid_argument("record is absent"))?;
        Ok(self.add(record))
    }

    /// Add a record built from a draft, failing if any field is missing
    pub fn add_draft(&mut self, draft: RecordDraft) -> CacheResult<bool> {
        let record = Record::try_from(draft)?;
        Ok(self.add(record))
    }

    /// Get the record with the given account
    pub fn get_by_account(&self, account: i64) -> Option<&Record> {
        self.by_account.get(&account).map(|&id| self.slot(id))
    }

    /// Get the record with the given name
    pub fn get_by_name(&self, name: &str) -> Option<&Record> {
        self.by_name.get(name).map(|&id| self.slot(id))
    }

    /// Get the record with the given value
    pub fn get_by_value(&self, value: f64) -> Option<&Record> {
        self.by_value.get(&ValueKey::new(value)).map(|&id| self.slot(id))
    }

    /// Check if a record with the given account exists
    pub fn contains_account(&self, account: i64) -> bool {
        self.by_account.contains_key(&account)
    }

    /// Check if a record with the given name exists
    pub fn contains_name(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    /// Check if a record with the given value exists
    pub fn contains_value(&self, value: f64) -> bool {
        self.by_value.contains_key(&ValueKey::new(value))
    }

    /// Change the account of the record currently holding `old`
    ///
    /// Returns `None` if no record holds `old`. If `new` is already taken in
    /// the account index, nothing changes but the record is still returned,
    /// so callers must check `account()` on the result to know whether the
    /// key moved. Only the account index is checked for collisions.
    pub fn update_account(&mut self, old: i64, new: i64) -> Option<&Record> {
        let id = *self.by_account.get(&old)?;

        if !self.by_account.contains_key(&new) {
            self.by_account.remove(&old);
            self.by_account.insert(new, id);
            self.slot_mut(id).set_account(new);
            debug!(old, new, "Updated account");
        } else if old != new {
            debug!(old, new, "Account update rejected: key already taken");
        }

        Some(self.slot(id))
    }

    /// Change the name of the record currently holding `old`
    ///
    /// Same contract as [`update_account`](Self::update_account).
    pub fn update_name(&mut self, old: &str, new: impl Into<String>) -> Option<&Record> {
        let id = *self.by_name.get(old)?;
        let new = new.into();

        if !self.by_name.contains_key(new.as_str()) {
            self.by_name.remove(old);
            self.by_name.insert(new.clone(), id);
            debug!(old, new = new.as_str(), "Updated name");
            self.slot_mut(id).set_name(new);
        } else if old != new {
            debug!(old, new = new.as_str(), "Name update rejected: key already taken");
        }

        Some(self.slot(id))
    }

    /// Change the value of the record currently holding `old`
    ///
    /// Same contract as [`update_account`](Self::update_account).
    pub fn update_value(&mut self, old: f64, new: f64) -> Option<&Record> {
        let old_key = ValueKey::new(old);
        let new_key = ValueKey::new(new);
        let id = *self.by_value.get(&old_key)?;

        if !self.by_value.contains_key(&new_key) {
            self.by_value.remove(&old_key);
            self.by_value.insert(new_key, id);
            self.slot_mut(id).set_value(new);
            debug!(old, new, "Updated value");
        } else if old_key != new_key {
            debug!(old, new, "Value update rejected: key already taken");
        }

        Some(self.slot(id))
    }

    /// Remove a record
    ///
    /// Succeeds only if the record's account, name and value all map to one
    /// live record. A stale copy whose fields no longer match is refused and
    /// nothing is removed.
    pub fn remove(&mut self, record: &Record) -> bool {
        let value = ValueKey::new(record.value());
        let id = match (
            self.by_account.get(&record.account()),
            self.by_name.get(record.name()),
            self.by_value.get(&value),
        ) {
            (Some(&a), Some(&n), Some(&v)) if a == n && n == v => a,
            _ => {
                debug!(
                    account = record.account(),
                    name = record.name(),
                    "Remove refused: record does not match a live entry"
                );
                return false;
            }
        };

        self.by_account.remove(&record.account());
        self.by_name.remove(record.name());
        self.by_value.remove(&value);
        self.records[id] = None;
        self.free.push(id);

        trace!(account = record.account(), slot = id, "Removed record");
        true
    }

    /// Remove all records
    pub fn clear(&mut self) {
        self.records.clear();
        self.free.clear();
        self.by_account.clear();
        self.by_name.clear();
        self.by_value.clear();
    }

    /// Iterate over records in ascending account order
    pub fn iter_by_account(&self) -> impl Iterator<Item = &Record> + '_ {
        self.by_account.values().map(move |&id| self.slot(id))
    }

    /// Iterate over records in ascending name order
    pub fn iter_by_name(&self) -> impl Iterator<Item = &Record> + '_ {
        self.by_name.values().map(move |&id| self.slot(id))
    }

    /// Iterate over records in ascending value order (IEEE total order)
    pub fn iter_by_value(&self) -> impl Iterator<Item = &Record> + '_ {
        self.by_value.values().map(move |&id| self.slot(id))
    }

    /// Get statistics about the cache
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            records: self.size(),
            arena_slots: self.records.len(),
            free_slots: self.free.len(),
            used_memory_bytes: self
                .records
                .iter()
                .flatten()
                .map(|record| record.memory_usage())
                .sum(),
        }
    }

    fn alloc(&mut self, record: Record) -> RecordId {
        match self.free.pop() {
            Some(id) => {
                self.records[id] = Some(record);
                id
            }
            None => {
                self.records.push(Some(record));
                self.records.len() - 1
            }
        }
    }

    // Index entries only ever point at occupied slots.
    fn slot(&self, id: RecordId) -> &Record {
        match &self.records[id] {
            Some(record) => record,
            None => unreachable!("index points at free slot {}", id),
        }
    }

    fn slot_mut(&mut self, id: RecordId) -> &mut Record {
        match &mut self.records[id] {
            Some(record) => record,
            None => unreachable!("index points at free slot {}", id),
        }
    }
}

/// Statistics about the cache
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CacheStats {
    pub records: usize,
    pub arena_slots: usize,
    pub free_slots: usize,
    pub used_memory_bytes: usize,
}
