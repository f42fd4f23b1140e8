//! Time-bounded item cache shared by every request.
//!
//! Entries expire lazily: a read that finds a stale entry drops it and
//! reports a miss. There is no background sweep.

use dashmap::DashMap;
use std::time::Duration;
use tokio::time::Instant;

use crate::models::{ItemId, ItemRecord};

#[derive(Debug, Clone)]
struct CacheEntry {
    record: ItemRecord,
    expires_at: Instant,
}

impl CacheEntry {
    fn is_valid_at(&self, now: Instant) -> bool {
        now < self.expires_at
    }
}

pub struct ItemCache {
    entries: DashMap<ItemId, CacheEntry>,
    ttl: Duration,
}

impl ItemCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Returns the cached record if it has not expired yet.
    pub fn get(&self, id: ItemId) -> Option<ItemRecord> {
        let now = Instant::now();

        // The shard guard must be released before `remove_if` touches the same key
        let found = match self.entries.get(&id) {
            Some(entry) if entry.is_valid_at(now) => return Some(entry.record.clone()),
            Some(_) => true,
            None => false,
        };

        if found {
            // Another writer may have refreshed the entry in the meantime
            self.entries.remove_if(&id, |_, entry| !entry.is_valid_at(now));
        }

        None
    }

    /// Stores `record` until `now + ttl`, replacing whatever was there.
    pub fn insert(&self, id: ItemId, record: ItemRecord) {
        let expires_at = Instant::now() + self.ttl;
        self.entries.insert(id, CacheEntry { record, expires_at });
    }

    /// Number of stored entries, including expired ones not yet read.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
