//! In-memory keyed table backed by [`DashMap`].
//!
//! Reads clone the stored value out, so no caller ever holds a live handle
//! into the table. Writes that depend on the current value go through
//! [`HashMapTable::upsert`], which runs under the key's shard lock.

use std::hash::Hash;
use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

/// Concurrent keyed table with copy-out reads and atomic read-modify-write.
pub struct HashMapTable<K, V> {
    entries: DashMap<K, V>,
}

impl<K, V> HashMapTable<K, V>
where
    K: Eq + Hash,
    V: Clone,
{
    /// Creates a new, empty table.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }

    /// Returns a copy of the value stored under `key`.
    pub fn get(&self, key: &K) -> Option<V> {
        self.entries.get(key).map(|r| r.value().clone())
    }

    /// Inserts or replaces the value for `key`, returning the previous one.
    pub fn insert(&self, key: K, value: V) -> Option<V> {
        self.entries.insert(key, value)
    }

    /// Updates the value for `key` in place, or inserts a freshly created one.
    ///
    /// Exactly one of `create` or `update` runs, while the shard holding
    /// `key` is write-locked, so two concurrent upserts on the same key never
    /// interleave. Returns a copy of the stored result.
    pub fn upsert<C, U>(&self, key: K, create: C, update: U) -> V
    where
        C: FnOnce() -> V,
        U: FnOnce(&mut V),
    {
        match self.entries.entry(key) {
            Entry::Occupied(mut entry) => {
                update(entry.get_mut());
                entry.get().clone()
            }
            Entry::Vacant(entry) => entry.insert(create()).value().clone(),
        }
    }
}

impl<K, V> Default for HashMapTable<K, V>
where
    K: Eq + Hash,
    V: Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

/// Process-lifetime id counter. Starts at 1, never hands out the same id twice.
#[derive(Debug)]
pub struct IdSequence {
    next: AtomicU64,
}

impl IdSequence {
    #[must_use]
    pub fn new() -> Self {
        Self {
            next: AtomicU64::new(1),
        }
    }

    pub fn next_id(&self) -> u64 {
        self.next.fetch_add(1, Ordering::Relaxed)
    }
}

impl Default for IdSequence {
    fn default() -> Self {
        Self::new()
    }
}
