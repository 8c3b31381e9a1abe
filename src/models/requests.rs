//! Request DTOs for the promptgate API
//!
//! Defines the structure of incoming HTTP request bodies.

use serde::Deserialize;
use serde_json::{Map, Value};

/// Maximum accepted prompt size in bytes
pub const MAX_PROMPT_SIZE: usize = 64 * 1024;

/// Request body for POST /prompts/lookup
///
/// `params` are the generation parameters the cache key is derived from.
#[derive(Debug, Clone, Deserialize)]
pub struct PromptLookupRequest {
    pub params: Map<String, Value>,
}

impl PromptLookupRequest {
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        validate_params(&self.params)
    }
}

/// Request body for PUT /prompts
#[derive(Debug, Clone, Deserialize)]
pub struct StorePromptRequest {
    pub params: Map<String, Value>,
    /// The generated prompt to memoize
    pub prompt: String,
}

impl StorePromptRequest {
    pub fn validate(&self) -> Option<String> {
        if let Some(msg) = validate_params(&self.params) {
            return Some(msg);
        }
        if self.prompt.trim().is_empty() {
            return Some("Prompt cannot be empty".to_string());
        }
        if self.prompt.len() > MAX_PROMPT_SIZE {
            return Some(format!(
                "Prompt exceeds maximum size of {} bytes",
                MAX_PROMPT_SIZE
            ));
        }
        None
    }
}

/// Request body for PUT /videos
#[derive(Debug, Clone, Deserialize)]
pub struct StoreVideoRequest {
    pub params: Map<String, Value>,
    pub task_id: String,
    pub url: String,
    #[serde(default)]
    pub provider: Option<String>,
}

impl StoreVideoRequest {
    pub fn validate(&self) -> Option<String> {
        if let Some(msg) = validate_params(&self.params) {
            return Some(msg);
        }
        if self.task_id.trim().is_empty() {
            return Some("Task id cannot be empty".to_string());
        }
        if self.url.trim().is_empty() {
            return Some("Video URL cannot be empty".to_string());
        }
        None
    }
}

fn validate_params(params: &Map<String, Value>) -> Option<String> {
    if params.is_empty() {
        Some("Params cannot be empty".to_string())
    } else {
        None
    }
}
