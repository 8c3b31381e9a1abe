//! Cache Entry Module
//!
//! Defines a single memoized value together with its freshness metadata.

// == Cache Entry ==
/// A cached value with insertion time and access counter.
#[derive(Debug, Clone)]
pub struct CacheEntry<T> {
    /// The stored value
    pub value: T,
    /// Insertion or last refresh timestamp (Unix milliseconds)
    pub inserted_at: u64,
    /// Number of successful reads since insertion, informational only
    pub access_count: u64,
}

impl<T> CacheEntry<T> {
    // == Constructor ==
    /// Creates a fresh entry stamped at `now_ms` with a zero access count.
    pub fn new(value: T, now_ms: u64) -> Self {
        Self {
            value,
            inserted_at: now_ms,
            access_count: 0,
        }
    }

    // == Age ==
    /// Milliseconds elapsed since insertion, saturating at zero if the clock
    /// moved backwards.
    pub fn age_ms(&self, now_ms: u64) -> u64 {
        now_ms.saturating_sub(self.inserted_at)
    }

    // == Is Expired ==
    /// Checks whether the entry outlived `ttl_ms`.
    ///
    /// An entry exactly `ttl_ms` old is still fresh; it expires one
    /// millisecond later.
    pub fn is_expired(&self, now_ms: u64, ttl_ms: u64) -> bool {
        self.age_ms(now_ms) > ttl_ms
    }

    // == Record Access ==
    /// Bumps the access counter.
    pub fn record_access(&mut self) {
        self.access_count = self.access_count.saturating_add(1);
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_creation() {
        let entry = CacheEntry::new("prompt".to_string(), 5_000);

        assert_eq!(entry.value, "prompt");
        assert_eq!(entry.inserted_at, 5_000);
        assert_eq!(entry.access_count, 0);
    }

    #[test]
    fn test_entry_age() {
        let entry = CacheEntry::new(1u32, 5_000);
        assert_eq!(entry.age_ms(5_000), 0);
        assert_eq!(entry.age_ms(5_750), 750);
    }

    #[test]
    fn test_entry_age_clock_went_backwards() {
        let entry = CacheEntry::new(1u32, 5_000);
        assert_eq!(entry.age_ms(4_000), 0);
        assert!(!entry.is_expired(4_000, 10));
    }

    #[test]
    fn test_expiration_boundary_condition() {
        let entry = CacheEntry::new("v", 0);

        assert!(!entry.is_expired(999, 1_000));
        assert!(!entry.is_expired(1_000, 1_000), "exactly ttl old is fresh");
        assert!(entry.is_expired(1_001, 1_000));
    }

    #[test]
    fn test_record_access() {
        let mut entry = CacheEntry::new("v", 0);
        entry.record_access();
        entry.record_access();
        assert_eq!(entry.access_count, 2);
    }
}
