//! API Routes
//!
//! Configures the Axum router with all promptgate endpoints.

use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    cleanup_prompts_handler, clear_prompts_handler, delete_prompt_handler,
    delete_video_task_handler, get_video_by_task_handler, health_handler, lookup_prompt_handler,
    prompt_stats_handler, rate_limit_status_handler, reset_rate_limit_handler,
    store_prompt_handler, store_video_handler, video_stats_handler, AppState,
};
use super::throttle::throttle;

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `POST /prompts/lookup` - Rate-limited memoized prompt lookup
/// - `PUT /prompts` - Memoize a generated prompt
/// - `DELETE /prompts` - Clear all prompts
/// - `DELETE /prompts/:key` - Delete one prompt
/// - `GET /prompts/stats` - Prompt cache snapshot
/// - `POST /prompts/cleanup` - Sweep expired prompts
/// - `PUT /videos` - Record a finished video
/// - `GET /videos/stats` - Video cache snapshot
/// - `GET /videos/tasks/:task_id` - Resolve a video by task id
/// - `DELETE /videos/tasks/:task_id` - Forget a video task
/// - `GET /ratelimit/:client_id` - Peek at a client's quota
/// - `DELETE /ratelimit/:client_id` - Reset a client's quota
/// - `GET /health` - Health check endpoint
///
/// # Middleware
/// - Throttle: per-client sliding window on the lookup route
/// - CORS: Allows any origin (configurable for production)
/// - Tracing: Logs all requests for debugging
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let lookup = post(lookup_prompt_handler)
        .route_layer(middleware::from_fn_with_state(state.clone(), throttle));

    Router::new()
        .route("/prompts/lookup", lookup)
        .route(
            "/prompts",
            put(store_prompt_handler).delete(clear_prompts_handler),
        )
        .route("/prompts/stats", get(prompt_stats_handler))
        .route("/prompts/cleanup", post(cleanup_prompts_handler))
        .route("/prompts/:key", delete(delete_prompt_handler))
        .route("/videos", put(store_video_handler))
        .route("/videos/stats", get(video_stats_handler))
        .route(
            "/videos/tasks/:task_id",
            get(get_video_by_task_handler).delete(delete_video_task_handler),
        )
        .route(
            "/ratelimit/:client_id",
            get(rate_limit_status_handler).delete(reset_rate_limit_handler),
        )
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
