//! Background Tasks Module
//!
//! Contains background tasks that run periodically during server operation.
//!
//! # Tasks
//! - Cleanup: sweeps expired prompts and videos, forgets idle rate-limit clients

mod cleanup;

pub use cleanup::{spawn_cleanup_task, spawn_cleanup_task_every, sweep, SweepReport};
