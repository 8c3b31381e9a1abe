//! API Handlers
//!
//! HTTP request handlers for the prompt, video and rate-limit endpoints.

use std::sync::Arc;
use tokio::sync::RwLock;

use axum::{
    extract::{Path, State},
    Json,
};
use tracing::{debug, info};

use crate::cache::{object_cache_key, CacheSnapshot, ExpiringCache};
use crate::clock::{system_clock, SharedClock};
use crate::config::Config;
use crate::error::{GateError, Result};
use crate::models::{
    CleanupResponse, DeleteResponse, HealthResponse, PromptLookupRequest, PromptLookupResponse,
    RateLimitStatusResponse, StorePromptRequest, StoreResponse, StoreVideoRequest, VideoResponse,
};
use crate::ratelimit::SlidingWindowLimiter;
use crate::video::{VideoRecord, VideoUrlCache};

/// Application state shared across all handlers.
///
/// Each store sits behind its own lock so prompt traffic never waits on
/// video or rate-limit bookkeeping.
#[derive(Clone)]
pub struct AppState {
    /// Memoized prompts keyed by request parameters
    pub prompts: Arc<RwLock<ExpiringCache<String>>>,
    /// Finished video generations
    pub videos: Arc<RwLock<VideoUrlCache>>,
    /// Per-client admission control
    pub limiter: Arc<RwLock<SlidingWindowLimiter>>,
}

impl AppState {
    /// Creates a new AppState from already-built components.
    pub fn new(
        prompts: ExpiringCache<String>,
        videos: VideoUrlCache,
        limiter: SlidingWindowLimiter,
    ) -> Self {
        Self {
            prompts: Arc::new(RwLock::new(prompts)),
            videos: Arc::new(RwLock::new(videos)),
            limiter: Arc::new(RwLock::new(limiter)),
        }
    }

    /// Creates a new AppState from configuration, reading the system clock.
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::with_clock(config, system_clock())
    }

    /// Creates a new AppState from configuration with every component
    /// reading time from `clock`.
    pub fn with_clock(config: &Config, clock: SharedClock) -> Result<Self> {
        config.validate()?;

        let prompts =
            ExpiringCache::with_clock(config.cache_max_entries, config.cache_ttl(), clock.clone())?;
        let videos = VideoUrlCache::with_clock(
            config.video_cache_max_entries,
            config.video_cache_ttl(),
            clock.clone(),
        )?;
        let limiter = SlidingWindowLimiter::with_clock(
            config.rate_limit_max_requests,
            config.rate_limit_window(),
            clock,
        )?
        .with_max_clients(config.rate_limit_max_clients)?;

        Ok(Self::new(prompts, videos, limiter))
    }
}

/// Handler for POST /prompts/lookup
///
/// Runs behind the throttle middleware. A miss is a 200 with `hit: false`.
pub async fn lookup_prompt_handler(
    State(state): State<AppState>,
    Json(req): Json<PromptLookupRequest>,
) -> Result<Json<PromptLookupResponse>> {
    if let Some(error_msg) = req.validate() {
        return Err(GateError::InvalidRequest(error_msg));
    }

    let key = object_cache_key(&req.params);

    // Write lock: a hit refreshes recency and counters
    let prompt = state.prompts.write().await.get(&key);
    debug!(key = %key, hit = prompt.is_some(), "prompt lookup");

    Ok(Json(PromptLookupResponse::new(key, prompt)))
}

/// Handler for PUT /prompts
pub async fn store_prompt_handler(
    State(state): State<AppState>,
    Json(req): Json<StorePromptRequest>,
) -> Result<Json<StoreResponse>> {
    if let Some(error_msg) = req.validate() {
        return Err(GateError::InvalidRequest(error_msg));
    }

    let key = object_cache_key(&req.params);
    let evicted = state.prompts.write().await.set(key.clone(), req.prompt);

    Ok(Json(StoreResponse::new(key, evicted)))
}

/// Handler for DELETE /prompts/:key
pub async fn delete_prompt_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<DeleteResponse>> {
    if state.prompts.write().await.delete(&key) {
        Ok(Json(DeleteResponse::new(key)))
    } else {
        Err(GateError::NotFound(key))
    }
}

/// Handler for DELETE /prompts
pub async fn clear_prompts_handler(State(state): State<AppState>) -> Json<CleanupResponse> {
    let mut prompts = state.prompts.write().await;
    let removed = prompts.len();
    prompts.clear();
    info!(removed, "prompt cache cleared");

    Json(CleanupResponse {
        removed,
        remaining: 0,
    })
}

/// Handler for POST /prompts/cleanup
pub async fn cleanup_prompts_handler(State(state): State<AppState>) -> Json<CleanupResponse> {
    let mut prompts = state.prompts.write().await;
    let removed = prompts.cleanup();

    Json(CleanupResponse {
        removed,
        remaining: prompts.len(),
    })
}

/// Handler for GET /prompts/stats
pub async fn prompt_stats_handler(State(state): State<AppState>) -> Json<CacheSnapshot> {
    Json(state.prompts.read().await.stats())
}

/// Handler for PUT /videos
pub async fn store_video_handler(
    State(state): State<AppState>,
    Json(req): Json<StoreVideoRequest>,
) -> Result<Json<StoreResponse>> {
    if let Some(error_msg) = req.validate() {
        return Err(GateError::InvalidRequest(error_msg));
    }

    let key = object_cache_key(&req.params);
    let record = VideoRecord {
        task_id: req.task_id,
        url: req.url,
        provider: req.provider,
    };
    state.videos.write().await.insert(key.clone(), record);

    Ok(Json(StoreResponse::new(key, None)))
}

/// Handler for GET /videos/tasks/:task_id
pub async fn get_video_by_task_handler(
    State(state): State<AppState>,
    Path(task_id): Path<String>,
) -> Result<Json<VideoResponse>> {
    let record = state.videos.write().await.get_by_task(&task_id);
    record
        .map(|r| Json(r.into()))
        .ok_or(GateError::NotFound(task_id))
}

/// Handler for DELETE /videos/tasks/:task_id
pub async fn delete_video_task_handler(
    State(state): State<AppState>,
    Path(task_id): Path<String>,
) -> Result<Json<DeleteResponse>> {
    if state.videos.write().await.remove_task(&task_id) {
        Ok(Json(DeleteResponse::new(task_id)))
    } else {
        Err(GateError::NotFound(task_id))
    }
}

/// Handler for GET /videos/stats
pub async fn video_stats_handler(State(state): State<AppState>) -> Json<CacheSnapshot> {
    Json(state.videos.read().await.stats())
}

/// Handler for GET /ratelimit/:client_id
pub async fn rate_limit_status_handler(
    State(state): State<AppState>,
    Path(client_id): Path<String>,
) -> Json<RateLimitStatusResponse> {
    let decision = state.limiter.read().await.peek(&client_id);
    Json(RateLimitStatusResponse {
        client_id,
        decision,
    })
}

/// Handler for DELETE /ratelimit/:client_id
pub async fn reset_rate_limit_handler(
    State(state): State<AppState>,
    Path(client_id): Path<String>,
) -> Result<Json<DeleteResponse>> {
    if state.limiter.write().await.reset(&client_id) {
        info!(client_id = %client_id, "rate limit reset");
        Ok(Json(DeleteResponse::new(client_id)))
    } else {
        Err(GateError::NotFound(client_id))
    }
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
