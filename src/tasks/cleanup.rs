//! TTL Cleanup Task
//!
//! Background task that periodically sweeps expired prompts and videos and
//! forgets idle rate-limit clients.

use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::api::AppState;

/// Counts from one sweep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepReport {
    pub prompts: usize,
    pub videos: usize,
    pub idle_clients: usize,
}

impl SweepReport {
    pub fn total(&self) -> usize {
        self.prompts + self.videos + self.idle_clients
    }
}

/// Runs one sweep over every store, taking each write lock in turn.
pub async fn sweep(state: &AppState) -> SweepReport {
    let prompts = state.prompts.write().await.cleanup();
    let videos = state.videos.write().await.cleanup();
    let idle_clients = state.limiter.write().await.prune_idle();

    SweepReport {
        prompts,
        videos,
        idle_clients,
    }
}

/// Spawns a background task that sweeps the stores every interval.
///
/// The task runs until aborted; the returned handle is used for that during
/// graceful shutdown.
///
/// # Example
/// ```ignore
/// let state = AppState::from_config(&config)?;
/// let cleanup_handle = spawn_cleanup_task(state.clone(), 60);
/// // Later, during shutdown:
/// cleanup_handle.abort();
/// ```
pub fn spawn_cleanup_task(state: AppState, cleanup_interval_secs: u64) -> JoinHandle<()> {
    spawn_cleanup_task_every(state, Duration::from_secs(cleanup_interval_secs))
}

/// Same as [`spawn_cleanup_task`] with an arbitrary interval.
pub fn spawn_cleanup_task_every(state: AppState, interval: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!(interval_ms = interval.as_millis() as u64, "starting cleanup task");

        loop {
            tokio::time::sleep(interval).await;

            let report = sweep(&state).await;
            if report.total() > 0 {
                info!(
                    prompts = report.prompts,
                    videos = report.videos,
                    idle_clients = report.idle_clients,
                    "cleanup removed expired entries"
                );
            } else {
                debug!("cleanup found nothing to remove");
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::config::Config;
    use crate::video::VideoRecord;
    use std::sync::Arc;

    fn test_state() -> (AppState, ManualClock) {
        let clock = ManualClock::new(0);
        let config = Config {
            cache_ttl_ms: 1_000,
            video_cache_ttl_ms: 1_000,
            rate_limit_window_ms: 1_000,
            ..Config::default()
        };
        let state = AppState::with_clock(&config, Arc::new(clock.clone())).unwrap();
        (state, clock)
    }

    #[tokio::test]
    async fn test_sweep_reports_each_store() {
        let (state, clock) = test_state();

        state.prompts.write().await.set("p", "prompt".to_string());
        state.videos.write().await.insert(
            "v",
            VideoRecord {
                task_id: "t".to_string(),
                url: "u".to_string(),
                provider: None,
            },
        );
        state.limiter.write().await.check("client");

        assert_eq!(sweep(&state).await, SweepReport::default());

        clock.advance(1_001);
        let report = sweep(&state).await;
        assert_eq!(
            report,
            SweepReport {
                prompts: 1,
                videos: 1,
                idle_clients: 1,
            }
        );
        assert_eq!(report.total(), 3);
    }

    #[tokio::test]
    async fn test_cleanup_task_removes_expired_entries() {
        let (state, clock) = test_state();

        state.prompts.write().await.set("expire_soon", "v".to_string());
        clock.advance(2_000);

        let handle = spawn_cleanup_task_every(state.clone(), Duration::from_millis(20));
        tokio::time::sleep(Duration::from_millis(200)).await;

        // len() counts stale entries, so zero means the task swept it
        assert_eq!(state.prompts.read().await.len(), 0);

        handle.abort();
    }

    #[tokio::test]
    async fn test_cleanup_task_preserves_valid_entries() {
        let (state, _) = test_state();

        state.prompts.write().await.set("long_lived", "v".to_string());

        let handle = spawn_cleanup_task_every(state.clone(), Duration::from_millis(20));
        tokio::time::sleep(Duration::from_millis(100)).await;

        assert_eq!(
            state.prompts.write().await.get("long_lived").as_deref(),
            Some("v")
        );

        handle.abort();
    }

    #[tokio::test]
    async fn test_cleanup_task_can_be_aborted() {
        let (state, _) = test_state();

        let handle = spawn_cleanup_task(state, 1);
        handle.abort();

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(handle.is_finished(), "Task should be finished after abort");
    }
}
