//! Rate Limit Module
//!
//! Sliding-window admission control keyed by opaque client id.

mod decision;
mod limiter;


pub use decision::RateLimitDecision;
pub use limiter::{SlidingWindowLimiter, DEFAULT_MAX_CLIENTS};
