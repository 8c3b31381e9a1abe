//! Header helpers shared by the throttle middleware and error responses.

use axum::http::{HeaderMap, HeaderValue};

use crate::ratelimit::RateLimitDecision;

pub const CLIENT_ID_HEADER: &str = "x-client-id";
pub const FORWARDED_FOR_HEADER: &str = "x-forwarded-for";

/// Client id used when a request carries no identifying header.
pub const ANONYMOUS_CLIENT: &str = "anonymous";

pub const RATELIMIT_LIMIT_HEADER: &str = "x-ratelimit-limit";
pub const RATELIMIT_REMAINING_HEADER: &str = "x-ratelimit-remaining";
pub const RATELIMIT_RESET_HEADER: &str = "x-ratelimit-reset";

/// Builds the `X-RateLimit-*` headers for a decision. Reset is Unix ms.
pub fn rate_limit_headers(decision: &RateLimitDecision) -> HeaderMap {
    let mut headers = HeaderMap::with_capacity(3);
    headers.insert(RATELIMIT_LIMIT_HEADER, HeaderValue::from(decision.limit));
    headers.insert(
        RATELIMIT_REMAINING_HEADER,
        HeaderValue::from(decision.remaining),
    );
    headers.insert(RATELIMIT_RESET_HEADER, HeaderValue::from(decision.reset));
    headers
}

/// Resolves the caller's client id.
///
/// Prefers `x-client-id`, then the first `x-forwarded-for` hop, then
/// [`ANONYMOUS_CLIENT`].
pub fn client_id(headers: &HeaderMap) -> String {
    let explicit = headers
        .get(CLIENT_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty());

    let forwarded = || {
        headers
            .get(FORWARDED_FOR_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(',').next())
            .map(str::trim)
            .filter(|v| !v.is_empty())
    };

    explicit
        .or_else(forwarded)
        .unwrap_or(ANONYMOUS_CLIENT)
        .to_string()
}
