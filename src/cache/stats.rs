//! Cache Statistics Module
//!
//! Lifetime counters and the diagnostic snapshot returned by `stats()`.

use serde::Serialize;

// == Cache Counters ==
/// Lifetime performance counters for one cache.
#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
pub struct CacheCounters {
    /// Reads that returned a fresh value
    pub hits: u64,
    /// Reads that found nothing or an expired entry
    pub misses: u64,
    /// Entries dropped to make room for a new key
    pub evictions: u64,
    /// Entries dropped because their TTL elapsed (lazily or by sweep)
    pub expirations: u64,
}

impl CacheCounters {
    pub fn new() -> Self {
        Self::default()
    }

    // == Hit Rate ==
    /// Returns hits / (hits + misses), or 0.0 if no reads have been made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    pub fn record_eviction(&mut self) {
        self.evictions += 1;
    }

    pub fn record_expirations(&mut self, count: usize) {
        self.expirations += count as u64;
    }
}

// == Entry Snapshot ==
/// Per-entry diagnostics.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct EntrySnapshot {
    pub key: String,
    pub access_count: u64,
    pub age_ms: u64,
}

// == Cache Snapshot ==
/// Point-in-time view of a cache, ordered from least to most recently used.
#[derive(Debug, Clone, Serialize)]
pub struct CacheSnapshot {
    /// Entries currently held, including stale ones not yet swept
    pub size: usize,
    pub max_size: usize,
    pub ttl_ms: u64,
    pub entries: Vec<EntrySnapshot>,
    #[serde(flatten)]
    pub counters: CacheCounters,
    pub hit_rate: f64,
}
