//! Recency Order Module
//!
//! Tracks keys from least to most recently used. Shared by the expiring cache
//! and by the rate limiter's bounded client table.

use std::borrow::Borrow;
use std::collections::{BTreeMap, HashMap};
use std::hash::Hash;

// == Recency Order ==
/// Access order for LRU eviction.
///
/// Every promotion stamps the key with a fresh tick. `ticks` maps each key to
/// its stamp and `by_tick` keeps the stamps sorted, so the smallest tick is
/// the least recently used key. Promote, remove and pop are O(log n).
#[derive(Debug, Clone)]
pub struct RecencyOrder<K> {
    ticks: HashMap<K, u64>,
    by_tick: BTreeMap<u64, K>,
    next_tick: u64,
}

impl<K> Default for RecencyOrder<K> {
    fn default() -> Self {
        Self {
            ticks: HashMap::new(),
            by_tick: BTreeMap::new(),
            next_tick: 0,
        }
    }
}

impl<K: Eq + Hash + Clone> RecencyOrder<K> {
    // == Constructor ==
    pub fn new() -> Self {
        Self::default()
    }

    // == Promote ==
    /// Moves `key` to the most-recently-used position, inserting it if absent.
    pub fn promote<Q>(&mut self, key: &Q)
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized + ToOwned<Owned = K>,
    {
        let tick = self.next_tick;
        self.next_tick += 1;

        if let Some(stamp) = self.ticks.get_mut(key) {
            if let Some(owned) = self.by_tick.remove(&*stamp) {
                self.by_tick.insert(tick, owned);
            }
            *stamp = tick;
        } else {
            let owned = key.to_owned();
            self.ticks.insert(owned.clone(), tick);
            self.by_tick.insert(tick, owned);
        }
    }

    // == Remove ==
    /// Removes `key` from the order. Returns true if it was tracked.
    pub fn remove<Q>(&mut self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        match self.ticks.remove(key) {
            Some(tick) => {
                self.by_tick.remove(&tick);
                true
            }
            None => false,
        }
    }

    // == Pop Least Recent ==
    /// Removes and returns the least recently used key.
    pub fn pop_least_recent(&mut self) -> Option<K> {
        let (_, key) = self.by_tick.pop_first()?;
        self.ticks.remove(&key);
        Some(key)
    }

    // == Peek Least Recent ==
    pub fn peek_least_recent(&self) -> Option<&K> {
        self.by_tick.values().next()
    }

    /// Iterates keys from least to most recently used.
    pub fn iter(&self) -> impl Iterator<Item = &K> {
        self.by_tick.values()
    }

    pub fn len(&self) -> usize {
        self.ticks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ticks.is_empty()
    }

    pub fn clear(&mut self) {
        self.ticks.clear();
        self.by_tick.clear();
        self.next_tick = 0;
    }
}
