//! Expiring Cache Module
//!
//! Bounded key-value store combining HashMap storage with recency tracking
//! and lazy TTL expiration.

use std::collections::HashMap;
use std::time::Duration;

use tracing::debug;

use crate::cache::{CacheCounters, CacheEntry, CacheSnapshot, EntrySnapshot, RecencyOrder};
use crate::clock::{system_clock, SharedClock};
use crate::error::{GateError, Result};

// == Expiring Cache ==
/// Bounded memoization store with LRU eviction and a fixed TTL.
///
/// Expired entries are dropped when `get` or `has` touches them, or in bulk
/// by `cleanup`. Nothing runs in the background.
#[derive(Debug)]
pub struct ExpiringCache<T> {
    /// Key-value storage
    entries: HashMap<String, CacheEntry<T>>,
    /// Least to most recently used
    order: RecencyOrder<String>,
    counters: CacheCounters,
    max_size: usize,
    ttl_ms: u64,
    clock: SharedClock,
}

impl<T: Clone> ExpiringCache<T> {
    // == Constructor ==
    /// Creates a cache reading the system clock.
    ///
    /// # Errors
    /// `InvalidConfig` if `max_size` is zero or `ttl` is under a millisecond
    /// or too long to count in `u64` milliseconds.
    pub fn new(max_size: usize, ttl: Duration) -> Result<Self> {
        Self::with_clock(max_size, ttl, system_clock())
    }

    /// Creates a cache reading time from `clock`.
    pub fn with_clock(max_size: usize, ttl: Duration, clock: SharedClock) -> Result<Self> {
        if max_size == 0 {
            return Err(GateError::InvalidConfig(
                "cache max_size must be greater than zero".to_string(),
            ));
        }
        let ttl_ms = u64::try_from(ttl.as_millis()).map_err(|_| {
            GateError::InvalidConfig("cache ttl does not fit in u64 milliseconds".to_string())
        })?;
        if ttl_ms == 0 {
            return Err(GateError::InvalidConfig(
                "cache ttl must be at least one millisecond".to_string(),
            ));
        }

        Ok(Self {
            entries: HashMap::with_capacity(max_size),
            order: RecencyOrder::new(),
            counters: CacheCounters::new(),
            max_size,
            ttl_ms,
            clock,
        })
    }

    // == Get ==
    /// Returns a fresh value and marks it most recently used.
    ///
    /// An expired entry is removed and reported as absent.
    pub fn get(&mut self, key: &str) -> Option<T> {
        let now = self.clock.now_ms();

        if self.drop_if_expired(key, now) {
            self.counters.record_miss();
            return None;
        }

        match self.entries.get_mut(key) {
            Some(entry) => {
                entry.record_access();
                let value = entry.value.clone();
                self.order.promote(key);
                self.counters.record_hit();
                Some(value)
            }
            None => {
                self.counters.record_miss();
                None
            }
        }
    }

    // == Set ==
    /// Stores `value` under `key` as the newest entry with a fresh TTL.
    ///
    /// When the cache is full and `key` is new, the least recently used entry
    /// is evicted first and its key returned. Overwriting never evicts.
    pub fn set(&mut self, key: impl Into<String>, value: T) -> Option<String> {
        let key = key.into();
        let now = self.clock.now_ms();

        let mut evicted = None;
        if !self.entries.contains_key(&key) && self.entries.len() >= self.max_size {
            if let Some(oldest) = self.order.pop_least_recent() {
                self.entries.remove(&oldest);
                self.counters.record_eviction();
                debug!(key = %oldest, "evicted least recently used cache entry");
                evicted = Some(oldest);
            }
        }

        self.entries.insert(key.clone(), CacheEntry::new(value, now));
        self.order.promote(key.as_str());

        evicted
    }

    // == Has ==
    /// Reports whether a fresh entry exists without touching recency.
    ///
    /// An expired entry found here is removed, the same as in `get`.
    pub fn has(&mut self, key: &str) -> bool {
        let now = self.clock.now_ms();
        if self.drop_if_expired(key, now) {
            return false;
        }
        self.entries.contains_key(key)
    }

    // == Delete ==
    /// Removes `key`. Returns true if an entry was present.
    pub fn delete(&mut self, key: &str) -> bool {
        if self.entries.remove(key).is_some() {
            self.order.remove(key);
            true
        } else {
            false
        }
    }

    // == Clear ==
    /// Removes every entry. Lifetime counters are kept.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
    }

    // == Cleanup ==
    /// Removes all expired entries and returns how many were dropped.
    pub fn cleanup(&mut self) -> usize {
        let now = self.clock.now_ms();
        let ttl_ms = self.ttl_ms;

        let expired_keys: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired(now, ttl_ms))
            .map(|(key, _)| key.clone())
            .collect();

        for key in &expired_keys {
            self.entries.remove(key);
            self.order.remove(key.as_str());
        }

        self.counters.record_expirations(expired_keys.len());
        expired_keys.len()
    }

    // == Stats ==
    /// Returns a diagnostic snapshot. Does not expire or reorder anything.
    pub fn stats(&self) -> CacheSnapshot {
        let now = self.clock.now_ms();
        let entries = self
            .order
            .iter()
            .filter_map(|key| {
                self.entries.get(key).map(|entry| EntrySnapshot {
                    key: key.clone(),
                    access_count: entry.access_count,
                    age_ms: entry.age_ms(now),
                })
            })
            .collect();

        CacheSnapshot {
            size: self.entries.len(),
            max_size: self.max_size,
            ttl_ms: self.ttl_ms,
            entries,
            counters: self.counters,
            hit_rate: self.counters.hit_rate(),
        }
    }

    /// Number of entries held, including expired ones not yet swept.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }

    pub fn ttl(&self) -> Duration {
        Duration::from_millis(self.ttl_ms)
    }

    // == Lazy Expiry ==
    /// Removes `key` if it is present and stale. Returns true if removed.
    fn drop_if_expired(&mut self, key: &str, now: u64) -> bool {
        let expired = self
            .entries
            .get(key)
            .is_some_and(|entry| entry.is_expired(now, self.ttl_ms));

        if expired {
            self.entries.remove(key);
            self.order.remove(key);
            self.counters.record_expirations(1);
            debug!(key = %key, "dropped expired cache entry on access");
        }
        expired
    }
}
