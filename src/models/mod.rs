//! Request and Response models for the promptgate API
//!
//! This module defines the DTOs (Data Transfer Objects) used for
//! serializing/deserializing HTTP request and response bodies.

pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use requests::{PromptLookupRequest, StorePromptRequest, StoreVideoRequest};
pub use responses::{
    CleanupResponse, DeleteResponse, ErrorResponse, HealthResponse, PromptLookupResponse,
    RateLimitStatusResponse, StoreResponse, VideoResponse,
};
