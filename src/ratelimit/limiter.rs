//! Sliding-Window Rate Limiter
//!
//! Per-client admission control over a trailing time window.

use std::collections::{HashMap, VecDeque};
use std::time::Duration;

use tracing::{debug, warn};

use crate::cache::RecencyOrder;
use crate::clock::{system_clock, SharedClock};
use crate::error::{GateError, Result};
use crate::ratelimit::RateLimitDecision;

/// Default bound on the number of client records kept at once.
pub const DEFAULT_MAX_CLIENTS: usize = 10_000;

// == Sliding Window Limiter ==
/// Caps accepted requests per client within a trailing window.
///
/// Each client keeps the timestamps of its accepted requests. Timestamps at
/// least `window` old are pruned on every check. Rejected checks record
/// nothing, so a burst of rejections does not push the window further out.
///
/// The client table is bounded: when a new client arrives and the table is
/// full, the client checked least recently is forgotten.
#[derive(Debug)]
pub struct SlidingWindowLimiter {
    clients: HashMap<String, VecDeque<u64>>,
    /// Least to most recently checked client ids
    order: RecencyOrder<String>,
    max_requests: u32,
    window_ms: u64,
    max_clients: usize,
    clock: SharedClock,
}

impl SlidingWindowLimiter {
    // == Constructor ==
    /// Creates a limiter reading the system clock.
    ///
    /// # Errors
    /// `InvalidConfig` if `max_requests` is zero or `window` is under a
    /// millisecond or too long to count in `u64` milliseconds.
    pub fn new(max_requests: u32, window: Duration) -> Result<Self> {
        Self::with_clock(max_requests, window, system_clock())
    }

    /// Creates a limiter reading time from `clock`.
    pub fn with_clock(max_requests: u32, window: Duration, clock: SharedClock) -> Result<Self> {
        if max_requests == 0 {
            return Err(GateError::InvalidConfig(
                "rate limit max_requests must be greater than zero".to_string(),
            ));
        }
        let window_ms = u64::try_from(window.as_millis()).map_err(|_| {
            GateError::InvalidConfig("rate limit window does not fit in u64 milliseconds".to_string())
        })?;
        if window_ms == 0 {
            return Err(GateError::InvalidConfig(
                "rate limit window must be at least one millisecond".to_string(),
            ));
        }

        Ok(Self {
            clients: HashMap::new(),
            order: RecencyOrder::new(),
            max_requests,
            window_ms,
            max_clients: DEFAULT_MAX_CLIENTS,
            clock,
        })
    }

    /// Sets the bound on tracked clients.
    pub fn with_max_clients(mut self, max_clients: usize) -> Result<Self> {
        if max_clients == 0 {
            return Err(GateError::InvalidConfig(
                "rate limit max_clients must be greater than zero".to_string(),
            ));
        }
        self.max_clients = max_clients;
        self.shrink_to_bound();
        Ok(self)
    }

    // == Check ==
    /// Admits or rejects one request from `client_id`.
    pub fn check(&mut self, client_id: &str) -> RateLimitDecision {
        let now = self.clock.now_ms();
        let window_ms = self.window_ms;
        let max_requests = self.max_requests;

        if !self.clients.contains_key(client_id) {
            self.make_room();
        }
        self.order.promote(client_id);

        let timestamps = self.clients.entry(client_id.to_string()).or_default();
        prune(timestamps, now, window_ms);

        let count = timestamps.len() as u32;
        if count >= max_requests {
            let reset = timestamps
                .front()
                .map(|oldest| oldest.saturating_add(window_ms))
                .unwrap_or(now.saturating_add(window_ms));
            debug!(client_id = %client_id, count, "rate limit exceeded");
            return RateLimitDecision::rejected(max_requests, reset);
        }

        timestamps.push_back(now);
        RateLimitDecision::allowed(
            max_requests,
            max_requests - (count + 1),
            now.saturating_add(window_ms),
        )
    }

    // == Peek ==
    /// Reports the client's current standing without recording a request.
    ///
    /// `remaining` counts the requests that would still be admitted, and
    /// `reset` is when the oldest in-window request ages out (or one window
    /// from now for an idle client).
    pub fn peek(&self, client_id: &str) -> RateLimitDecision {
        let now = self.clock.now_ms();
        let window_ms = self.window_ms;

        let recent: Vec<u64> = self
            .clients
            .get(client_id)
            .map(|ts| {
                ts.iter()
                    .copied()
                    .filter(|&t| in_window(t, now, window_ms))
                    .collect()
            })
            .unwrap_or_default();

        let count = recent.len() as u32;
        let reset = recent
            .first()
            .map(|oldest| oldest.saturating_add(window_ms))
            .unwrap_or(now.saturating_add(window_ms));

        if count >= self.max_requests {
            RateLimitDecision::rejected(self.max_requests, reset)
        } else {
            RateLimitDecision::allowed(self.max_requests, self.max_requests - count, reset)
        }
    }

    // == Reset ==
    /// Forgets one client's history. Returns true if the client was tracked.
    pub fn reset(&mut self, client_id: &str) -> bool {
        self.order.remove(client_id);
        self.clients.remove(client_id).is_some()
    }

    // == Clear ==
    /// Forgets every client.
    pub fn clear(&mut self) {
        self.clients.clear();
        self.order.clear();
    }

    // == Prune Idle ==
    /// Drops clients with no request left in the window. Returns how many.
    pub fn prune_idle(&mut self) -> usize {
        let now = self.clock.now_ms();
        let window_ms = self.window_ms;

        let idle: Vec<String> = self
            .clients
            .iter_mut()
            .filter_map(|(id, timestamps)| {
                prune(timestamps, now, window_ms);
                timestamps.is_empty().then(|| id.clone())
            })
            .collect();

        for id in &idle {
            self.clients.remove(id);
            self.order.remove(id.as_str());
        }
        idle.len()
    }

    /// Number of client records currently held.
    pub fn tracked_clients(&self) -> usize {
        self.clients.len()
    }

    pub fn max_requests(&self) -> u32 {
        self.max_requests
    }

    pub fn window(&self) -> Duration {
        Duration::from_millis(self.window_ms)
    }

    pub fn max_clients(&self) -> usize {
        self.max_clients
    }

    /// Current time according to the limiter's clock.
    pub fn now_ms(&self) -> u64 {
        self.clock.now_ms()
    }

    fn make_room(&mut self) {
        self.evict_down_to(self.max_clients - 1);
    }

    fn shrink_to_bound(&mut self) {
        self.evict_down_to(self.max_clients);
    }

    /// Forgets least recently checked clients until at most `target` remain.
    fn evict_down_to(&mut self, target: usize) {
        while self.clients.len() > target {
            let Some(evicted) = self.order.pop_least_recent() else {
                break;
            };
            self.clients.remove(&evicted);
            warn!(client_id = %evicted, "client table full, dropped least recently checked client");
        }
    }
}

/// A timestamp exactly `window_ms` old is outside the window.
fn in_window(timestamp: u64, now: u64, window_ms: u64) -> bool {
    now.saturating_sub(timestamp) < window_ms
}

fn prune(timestamps: &mut VecDeque<u64>, now: u64, window_ms: u64) {
    timestamps.retain(|&t| in_window(t, now, window_ms));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::{Clock, ManualClock};
    use std::sync::Arc;

    const WINDOW_MS: u64 = 60_000;

    fn limiter(max_requests: u32) -> (SlidingWindowLimiter, ManualClock) {
        let clock = ManualClock::new(1_700_000_000_000);
        let limiter = SlidingWindowLimiter::with_clock(
            max_requests,
            Duration::from_millis(WINDOW_MS),
            Arc::new(clock.clone()),
        )
        .unwrap();
        (limiter, clock)
    }

    #[test]
    fn test_rejects_zero_max_requests() {
        let result = SlidingWindowLimiter::new(0, Duration::from_secs(60));
        assert!(matches!(result, Err(GateError::InvalidConfig(_))));
    }

    #[test]
    fn test_rejects_zero_window() {
        let result = SlidingWindowLimiter::new(5, Duration::ZERO);
        assert!(matches!(result, Err(GateError::InvalidConfig(_))));
    }

    #[test]
    fn test_rejects_window_beyond_u64_millis() {
        let result = SlidingWindowLimiter::new(1, Duration::from_secs(u64::MAX));
        assert!(matches!(result, Err(GateError::InvalidConfig(_))));
    }

    #[test]
    fn test_longest_window_saturates_reset() {
        let clock = ManualClock::new(1_700_000_000_000);
        let mut limiter = SlidingWindowLimiter::with_clock(
            1,
            Duration::from_millis(u64::MAX),
            Arc::new(clock.clone()),
        )
        .unwrap();
        assert_eq!(limiter.window(), Duration::from_millis(u64::MAX));

        let first = limiter.check("c");
        assert!(first.success);
        assert_eq!(first.reset, u64::MAX);

        clock.advance(1_000);
        let second = limiter.check("c");
        assert!(!second.success);
        assert_eq!(second.reset, u64::MAX);
        assert_eq!(limiter.peek("c").reset, u64::MAX);
    }

    #[test]
    fn test_rejects_zero_max_clients() {
        let (limiter, _) = limiter(5);
        assert!(matches!(
            limiter.with_max_clients(0),
            Err(GateError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_basic_cap() {
        let (mut limiter, clock) = limiter(5);
        let now = clock.now_ms();

        for expected_remaining in [4, 3, 2, 1, 0] {
            let decision = limiter.check("client");
            assert!(decision.success);
            assert_eq!(decision.limit, 5);
            assert_eq!(decision.remaining, expected_remaining);
            assert_eq!(decision.reset, now + WINDOW_MS);
        }

        let decision = limiter.check("client");
        assert!(!decision.success);
        assert_eq!(decision.remaining, 0);
    }

    #[test]
    fn test_rejection_reset_is_oldest_plus_window() {
        let (mut limiter, clock) = limiter(2);
        let first = clock.now_ms();

        limiter.check("c");
        clock.advance(10_000);
        limiter.check("c");
        clock.advance(5_000);

        let decision = limiter.check("c");
        assert!(!decision.success);
        assert_eq!(decision.reset, first + WINDOW_MS);
    }

    #[test]
    fn test_rejections_do_not_tighten_window() {
        let (mut limiter, clock) = limiter(1);

        limiter.check("c");
        for _ in 0..10 {
            clock.advance(1_000);
            assert!(!limiter.check("c").success);
        }

        clock.advance(WINDOW_MS - 10_000);
        assert!(limiter.check("c").success);
    }

    #[test]
    fn test_per_client_isolation() {
        let (mut limiter, _) = limiter(3);

        for _ in 0..3 {
            limiter.check("a");
        }
        assert!(!limiter.check("a").success);

        let b = limiter.check("b");
        assert!(b.success);
        assert_eq!(b.remaining, 2);
    }

    #[test]
    fn test_window_slides() {
        let (mut limiter, clock) = limiter(5);

        for _ in 0..5 {
            limiter.check("c");
        }
        assert!(!limiter.check("c").success);

        clock.advance(WINDOW_MS + 1);
        let decision = limiter.check("c");
        assert!(decision.success);
        assert_eq!(decision.remaining, 4);
    }

    #[test]
    fn test_window_edge_is_exclusive() {
        let (mut limiter, clock) = limiter(1);

        limiter.check("c");
        clock.advance(WINDOW_MS - 1);
        assert!(!limiter.check("c").success);

        clock.advance(1);
        assert!(limiter.check("c").success, "exactly window-old timestamp is excluded");
    }

    #[test]
    fn test_reset_isolation() {
        let (mut limiter, _) = limiter(3);

        for _ in 0..3 {
            limiter.check("a");
        }
        limiter.check("b");
        limiter.check("b");

        assert!(limiter.reset("a"));
        assert!(!limiter.reset("unknown"));

        assert_eq!(limiter.check("a").remaining, 2);
        let b = limiter.check("b");
        assert!(b.success);
        assert_eq!(b.remaining, 0);
    }

    #[test]
    fn test_clear() {
        let (mut limiter, _) = limiter(1);

        limiter.check("a");
        limiter.check("b");
        limiter.clear();

        assert_eq!(limiter.tracked_clients(), 0);
        assert!(limiter.check("a").success);
        assert!(limiter.check("b").success);
    }

    #[test]
    fn test_peek_does_not_record() {
        let (mut limiter, clock) = limiter(2);
        let start = clock.now_ms();

        let idle = limiter.peek("c");
        assert!(idle.success);
        assert_eq!(idle.remaining, 2);
        assert_eq!(idle.reset, start + WINDOW_MS);

        limiter.check("c");
        clock.advance(1_000);
        let peeked = limiter.peek("c");
        assert!(peeked.success);
        assert_eq!(peeked.remaining, 1);
        assert_eq!(peeked.reset, start + WINDOW_MS);

        limiter.check("c");
        assert!(!limiter.peek("c").success);
        assert_eq!(limiter.tracked_clients(), 1);
    }

    #[test]
    fn test_prune_idle() {
        let (mut limiter, clock) = limiter(5);

        limiter.check("old");
        clock.advance(30_000);
        limiter.check("recent");
        clock.advance(30_000);

        assert_eq!(limiter.prune_idle(), 1);
        assert_eq!(limiter.tracked_clients(), 1);
        assert_eq!(limiter.peek("recent").remaining, 4);
    }

    #[test]
    fn test_client_table_is_bounded() {
        let (limiter, _) = limiter(1);
        let mut limiter = limiter.with_max_clients(2).unwrap();

        assert!(limiter.check("a").success);
        assert!(limiter.check("b").success);
        // "a" is seen again, so "b" becomes the eviction candidate
        assert!(!limiter.check("a").success);
        assert!(limiter.check("c").success);

        assert_eq!(limiter.tracked_clients(), 2);
        assert!(!limiter.check("a").success, "a kept its history");
        assert!(limiter.check("b").success, "b was forgotten");
    }

    #[test]
    fn test_zero_start_clock() {
        let clock = ManualClock::new(0);
        let mut limiter =
            SlidingWindowLimiter::with_clock(1, Duration::from_millis(100), Arc::new(clock.clone()))
                .unwrap();

        assert!(limiter.check("c").success);
        assert!(!limiter.check("c").success);
        clock.advance(100);
        assert!(limiter.check("c").success);
    }
}
