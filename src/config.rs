//! Configuration Module
//!
//! Handles loading and managing service configuration from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::error::{GateError, Result};

/// Service configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Maximum number of memoized prompts
    pub cache_max_entries: usize,
    /// Prompt TTL in milliseconds
    pub cache_ttl_ms: u64,
    /// Maximum number of remembered video results
    pub video_cache_max_entries: usize,
    /// Video result TTL in milliseconds
    pub video_cache_ttl_ms: u64,
    /// Requests admitted per client per window
    pub rate_limit_max_requests: u32,
    /// Rate limit window in milliseconds
    pub rate_limit_window_ms: u64,
    /// Maximum number of client records the limiter keeps
    pub rate_limit_max_clients: usize,
    /// HTTP server port
    pub server_port: u16,
    /// Background cleanup task interval in seconds
    pub cleanup_interval: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_MAX_ENTRIES` - Maximum memoized prompts (default: 100)
    /// - `CACHE_TTL_MS` - Prompt TTL in ms (default: 3600000, one hour)
    /// - `VIDEO_CACHE_MAX_ENTRIES` - Maximum video results (default: 50)
    /// - `VIDEO_CACHE_TTL_MS` - Video result TTL in ms (default: 86400000, one day)
    /// - `RATE_LIMIT_MAX_REQUESTS` - Requests per window (default: 10)
    /// - `RATE_LIMIT_WINDOW_MS` - Window length in ms (default: 60000)
    /// - `RATE_LIMIT_MAX_CLIENTS` - Tracked client bound (default: 10000)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `CLEANUP_INTERVAL` - Cleanup frequency in seconds (default: 60)
    ///
    /// Unparseable values fall back to the default.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            cache_max_entries: env_or("CACHE_MAX_ENTRIES", defaults.cache_max_entries),
            cache_ttl_ms: env_or("CACHE_TTL_MS", defaults.cache_ttl_ms),
            video_cache_max_entries: env_or(
                "VIDEO_CACHE_MAX_ENTRIES",
                defaults.video_cache_max_entries,
            ),
            video_cache_ttl_ms: env_or("VIDEO_CACHE_TTL_MS", defaults.video_cache_ttl_ms),
            rate_limit_max_requests: env_or(
                "RATE_LIMIT_MAX_REQUESTS",
                defaults.rate_limit_max_requests,
            ),
            rate_limit_window_ms: env_or("RATE_LIMIT_WINDOW_MS", defaults.rate_limit_window_ms),
            rate_limit_max_clients: env_or(
                "RATE_LIMIT_MAX_CLIENTS",
                defaults.rate_limit_max_clients,
            ),
            server_port: env_or("SERVER_PORT", defaults.server_port),
            cleanup_interval: env_or("CLEANUP_INTERVAL", defaults.cleanup_interval),
        }
    }

    /// Rejects zero sizes, windows, TTLs and intervals.
    pub fn validate(&self) -> Result<()> {
        let checks = [
            ("CACHE_MAX_ENTRIES", self.cache_max_entries as u64),
            ("CACHE_TTL_MS", self.cache_ttl_ms),
            ("VIDEO_CACHE_MAX_ENTRIES", self.video_cache_max_entries as u64),
            ("VIDEO_CACHE_TTL_MS", self.video_cache_ttl_ms),
            ("RATE_LIMIT_MAX_REQUESTS", u64::from(self.rate_limit_max_requests)),
            ("RATE_LIMIT_WINDOW_MS", self.rate_limit_window_ms),
            ("RATE_LIMIT_MAX_CLIENTS", self.rate_limit_max_clients as u64),
            ("CLEANUP_INTERVAL", self.cleanup_interval),
        ];

        match checks.iter().find(|(_, value)| *value == 0) {
            Some((name, _)) => Err(GateError::InvalidConfig(format!(
                "{} must be greater than zero",
                name
            ))),
            None => Ok(()),
        }
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_millis(self.cache_ttl_ms)
    }

    pub fn video_cache_ttl(&self) -> Duration {
        Duration::from_millis(self.video_cache_ttl_ms)
    }

    pub fn rate_limit_window(&self) -> Duration {
        Duration::from_millis(self.rate_limit_window_ms)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cache_max_entries: 100,
            cache_ttl_ms: 60 * 60 * 1000,
            video_cache_max_entries: 50,
            video_cache_ttl_ms: 24 * 60 * 60 * 1000,
            rate_limit_max_requests: 10,
            rate_limit_window_ms: 60_000,
            rate_limit_max_clients: 10_000,
            server_port: 3000,
            cleanup_interval: 60,
        }
    }
}

fn env_or<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}
