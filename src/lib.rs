//! promptgate - in-memory prompt memoization and request throttling
//!
//! Provides a bounded LRU + TTL cache, a sliding-window rate limiter, and a
//! video URL cache indexed by task id, plus an HTTP service exposing them.
//!
//! All state lives in process memory. Running several instances means several
//! independent caches and quotas; sharing them needs an external store.

pub mod api;
pub mod cache;
pub mod clock;
pub mod config;
pub mod error;
pub mod models;
pub mod ratelimit;
pub mod tasks;
pub mod video;

pub use api::AppState;
pub use cache::{object_cache_key, object_cache_key_of, ExpiringCache};
pub use config::Config;
pub use error::{GateError, Result};
pub use ratelimit::{RateLimitDecision, SlidingWindowLimiter};
pub use tasks::spawn_cleanup_task;
pub use video::{VideoRecord, VideoUrlCache};
