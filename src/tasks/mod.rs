//! Background Tasks Module
//!
//! Contains optional background tasks for long-running processes.
//!
//! # Tasks
//! - TTL Cleanup: Sweeps expired cache entries at configured intervals

mod cleanup;

pub use cleanup::spawn_cleanup_task;
