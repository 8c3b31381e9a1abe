//! API Module
//!
//! HTTP handlers, throttle middleware and routing for the promptgate REST API.

pub mod handlers;
pub mod headers;
pub mod routes;
pub mod throttle;

pub use handlers::*;
pub use routes::create_router;
