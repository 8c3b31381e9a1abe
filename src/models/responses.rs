//! Response DTOs for the promptgate API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;

use crate::ratelimit::RateLimitDecision;
use crate::video::VideoRecord;

/// Response body for POST /prompts/lookup
///
/// A miss is a normal outcome, reported with `hit: false`.
#[derive(Debug, Clone, Serialize)]
pub struct PromptLookupResponse {
    /// The derived cache key
    pub key: String,
    pub hit: bool,
    pub prompt: Option<String>,
}

impl PromptLookupResponse {
    pub fn new(key: impl Into<String>, prompt: Option<String>) -> Self {
        Self {
            key: key.into(),
            hit: prompt.is_some(),
            prompt,
        }
    }
}

/// Response body for PUT /prompts and PUT /videos
#[derive(Debug, Clone, Serialize)]
pub struct StoreResponse {
    /// Success message
    pub message: String,
    /// The key the value was stored under
    pub key: String,
    /// Key dropped to make room, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub evicted: Option<String>,
}

impl StoreResponse {
    pub fn new(key: impl Into<String>, evicted: Option<String>) -> Self {
        let key = key.into();
        Self {
            message: format!("Key '{}' stored successfully", key),
            key,
            evicted,
        }
    }
}

/// Response body for DELETE operations on a single key or task
#[derive(Debug, Clone, Serialize)]
pub struct DeleteResponse {
    /// Success message
    pub message: String,
    /// The key or task id that was deleted
    pub key: String,
}

impl DeleteResponse {
    pub fn new(key: impl Into<String>) -> Self {
        let key = key.into();
        Self {
            message: format!("Key '{}' deleted successfully", key),
            key,
        }
    }
}

/// Response body for sweep and clear operations
#[derive(Debug, Clone, Serialize)]
pub struct CleanupResponse {
    /// Number of entries removed
    pub removed: usize,
    /// Entries left afterwards
    pub remaining: usize,
}

/// Response body for GET /videos/tasks/:task_id
#[derive(Debug, Clone, Serialize)]
pub struct VideoResponse {
    #[serde(flatten)]
    pub record: VideoRecord,
}

impl From<VideoRecord> for VideoResponse {
    fn from(record: VideoRecord) -> Self {
        Self { record }
    }
}

/// Response body for GET /ratelimit/:client_id
#[derive(Debug, Clone, Serialize)]
pub struct RateLimitStatusResponse {
    pub client_id: String,
    #[serde(flatten)]
    pub decision: RateLimitDecision,
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Error response body for all error conditions
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error message describing what went wrong
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_response_hit() {
        let resp = PromptLookupResponse::new("a=1", Some("a cozy loft".to_string()));
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["hit"], true);
        assert_eq!(json["prompt"], "a cozy loft");
    }

    #[test]
    fn test_lookup_response_miss() {
        let resp = PromptLookupResponse::new("a=1", None);
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["hit"], false);
        assert!(json["prompt"].is_null());
        assert_eq!(json["key"], "a=1");
    }

    #[test]
    fn test_store_response_omits_missing_eviction() {
        let json = serde_json::to_string(&StoreResponse::new("k", None)).unwrap();
        assert!(json.contains("stored successfully"));
        assert!(!json.contains("evicted"));

        let json = serde_json::to_string(&StoreResponse::new("k", Some("old".into()))).unwrap();
        assert!(json.contains(r#""evicted":"old""#));
    }

    #[test]
    fn test_video_response_is_flat() {
        let resp = VideoResponse::from(VideoRecord {
            task_id: "t-1".to_string(),
            url: "https://cdn/v.mp4".to_string(),
            provider: Some("runway".to_string()),
        });
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["task_id"], "t-1");
        assert_eq!(json["provider"], "runway");
    }

    #[test]
    fn test_rate_limit_status_is_flat() {
        let resp = RateLimitStatusResponse {
            client_id: "alice".to_string(),
            decision: RateLimitDecision::allowed(10, 7, 99),
        };
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["client_id"], "alice");
        assert_eq!(json["remaining"], 7);
    }

    #[test]
    fn test_health_response_serialize() {
        let resp = HealthResponse::healthy();
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("healthy"));
        assert!(json.contains("timestamp"));
    }

    #[test]
    fn test_error_response_serialize() {
        let resp = ErrorResponse::new("Something went wrong");
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("error"));
        assert!(json.contains("Something went wrong"));
    }
}
