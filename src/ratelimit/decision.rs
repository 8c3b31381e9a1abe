//! Rate Limit Decision Module
//!
//! The structured result of a rate-limit check.

use serde::Serialize;

// == Rate Limit Decision ==
/// Outcome of checking one client against its quota.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RateLimitDecision {
    /// Whether the request was admitted
    pub success: bool,
    /// Maximum requests per window
    pub limit: u32,
    /// Requests still available in the current window
    pub remaining: u32,
    /// Unix milliseconds at which capacity next frees up
    pub reset: u64,
}

impl RateLimitDecision {
    /// An admitted request.
    pub fn allowed(limit: u32, remaining: u32, reset: u64) -> Self {
        Self {
            success: true,
            limit,
            remaining,
            reset,
        }
    }

    /// A rejected request. `remaining` is always zero.
    pub fn rejected(limit: u32, reset: u64) -> Self {
        Self {
            success: false,
            limit,
            remaining: 0,
            reset,
        }
    }

    // == Retry After ==
    /// Whole seconds until `reset`, rounded up and never below one.
    ///
    /// Suitable for an HTTP `Retry-After` header.
    pub fn retry_after_secs(&self, now_ms: u64) -> u64 {
        let wait_ms = self.reset.saturating_sub(now_ms);
        wait_ms.div_ceil(1000).max(1)
    }
}
