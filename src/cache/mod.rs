//! Cache Module
//!
//! Provides bounded in-memory memoization with TTL expiration and LRU eviction.

mod entry;
mod key;
mod lru;
mod stats;
mod store;


// Re-export public types
pub use entry::CacheEntry;
pub use key::{object_cache_key, object_cache_key_of};
pub use lru::RecencyOrder;
pub use stats::{CacheCounters, CacheSnapshot, EntrySnapshot};
pub use store::ExpiringCache;
