//! Error types for promptgate
//!
//! Provides unified error handling using thiserror.
//!
//! Cache misses and rate-limit rejections inside the core components are plain
//! return values. This enum is for construction-time validation and for the
//! HTTP surface, where a miss or a rejection has to become a status code.

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::api::headers::rate_limit_headers;
use crate::models::ErrorResponse;
use crate::ratelimit::RateLimitDecision;

// == Gate Error Enum ==
/// Unified error type for promptgate.
#[derive(Error, Debug)]
pub enum GateError {
    /// Key or task id not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// A cache or limiter was constructed with unusable parameters
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The caller exhausted its quota for the current window
    #[error("Rate limit exceeded for client '{client_id}'")]
    RateLimited {
        client_id: String,
        decision: RateLimitDecision,
        retry_after_secs: u64,
    },

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

// == IntoResponse Implementation ==
impl IntoResponse for GateError {
    fn into_response(self) -> Response {
        let status = match &self {
            GateError::NotFound(_) => StatusCode::NOT_FOUND,
            GateError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            GateError::InvalidConfig(_) => StatusCode::INTERNAL_SERVER_ERROR,
            GateError::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            GateError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(ErrorResponse::new(self.to_string()));

        let mut response = (status, body).into_response();

        if let GateError::RateLimited {
            decision,
            retry_after_secs,
            ..
        } = &self
        {
            let headers = response.headers_mut();
            headers.extend(rate_limit_headers(decision));
            headers.insert(header::RETRY_AFTER, HeaderValue::from(*retry_after_secs));
        }

        response
    }
}

// == Result Type Alias ==
/// Convenience Result type for promptgate.
pub type Result<T> = std::result::Result<T, GateError>;
