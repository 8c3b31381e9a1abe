//! Throttle Middleware
//!
//! Admits or rejects requests per client before they reach an expensive handler.

use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use tracing::warn;

use super::handlers::AppState;
use super::headers::{client_id, rate_limit_headers};
use crate::error::{GateError, Result};

/// Checks the caller's quota and forwards the request when admitted.
///
/// Admitted responses carry the `X-RateLimit-*` headers; rejections become
/// a 429 with `Retry-After`.
pub async fn throttle(
    State(state): State<AppState>,
    headers: HeaderMap,
    request: Request,
    next: Next,
) -> Result<Response> {
    let client_id = client_id(&headers);

    let (decision, now_ms) = {
        let mut limiter = state.limiter.write().await;
        (limiter.check(&client_id), limiter.now_ms())
    };

    if !decision.success {
        warn!(client_id = %client_id, reset = decision.reset, "request rejected by rate limiter");
        return Err(GateError::RateLimited {
            retry_after_secs: decision.retry_after_secs(now_ms),
            client_id,
            decision,
        });
    }

    let mut response = next.run(request).await;
    response.headers_mut().extend(rate_limit_headers(&decision));
    Ok(response)
}
