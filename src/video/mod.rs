//! Video URL Cache Module
//!
//! Remembers finished video generations by request key, with a secondary
//! index so status polling by task id can find the result.

use std::collections::HashMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::cache::{CacheSnapshot, ExpiringCache};
use crate::clock::{system_clock, SharedClock};
use crate::error::Result;

// == Video Record ==
/// A generated video and the provider task that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoRecord {
    pub task_id: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
}

// == Video URL Cache ==
/// Expiring LRU cache of video records with a task id index.
#[derive(Debug)]
pub struct VideoUrlCache {
    records: ExpiringCache<VideoRecord>,
    /// task id -> request key
    task_index: HashMap<String, String>,
}

impl VideoUrlCache {
    pub fn new(max_size: usize, ttl: Duration) -> Result<Self> {
        Self::with_clock(max_size, ttl, system_clock())
    }

    pub fn with_clock(max_size: usize, ttl: Duration, clock: SharedClock) -> Result<Self> {
        Ok(Self {
            records: ExpiringCache::with_clock(max_size, ttl, clock)?,
            task_index: HashMap::new(),
        })
    }

    // == Insert ==
    /// Stores `record` under `key` and indexes it by task id.
    pub fn insert(&mut self, key: impl Into<String>, record: VideoRecord) {
        let key = key.into();

        // The key may have pointed at an older task.
        self.task_index.retain(|_, indexed| indexed != &key);

        let task_id = record.task_id.clone();
        if let Some(evicted) = self.records.set(key.clone(), record) {
            self.task_index.retain(|_, indexed| indexed != &evicted);
        }

        // The task may previously have been stored under another key.
        if let Some(previous) = self.task_index.insert(task_id, key.clone()) {
            if previous != key {
                self.records.delete(&previous);
            }
        }
    }

    // == Get ==
    /// Looks up by request key, refreshing recency.
    pub fn get(&mut self, key: &str) -> Option<VideoRecord> {
        let record = self.records.get(key);
        if record.is_none() {
            self.task_index.retain(|_, indexed| indexed != key);
        }
        record
    }

    // == Get By Task ==
    /// Resolves a task id to its record.
    ///
    /// An index entry whose record expired or was evicted is dropped.
    pub fn get_by_task(&mut self, task_id: &str) -> Option<VideoRecord> {
        let key = self.task_index.get(task_id)?.clone();
        match self.records.get(&key) {
            Some(record) => Some(record),
            None => {
                self.task_index.remove(task_id);
                debug!(task_id = %task_id, "dropped dangling video task index entry");
                None
            }
        }
    }

    // == Remove Task ==
    /// Removes a task and its record. Returns true if the task was indexed.
    pub fn remove_task(&mut self, task_id: &str) -> bool {
        match self.task_index.remove(task_id) {
            Some(key) => {
                self.records.delete(&key);
                true
            }
            None => false,
        }
    }

    // == Cleanup ==
    /// Sweeps expired records and prunes index entries left without one.
    pub fn cleanup(&mut self) -> usize {
        let removed = self.records.cleanup();
        let records = &mut self.records;
        self.task_index.retain(|_, key| records.has(key.as_str()));
        removed
    }

    pub fn clear(&mut self) {
        self.records.clear();
        self.task_index.clear();
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of task ids currently indexed.
    pub fn indexed_tasks(&self) -> usize {
        self.task_index.len()
    }

    pub fn stats(&self) -> CacheSnapshot {
        self.records.stats()
    }
}
