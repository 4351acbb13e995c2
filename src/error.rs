//! Error types for the cache
//!
//! Provides unified error handling using thiserror.
//!
//! Absence of a key is never an error: `get` returns `Option` and `delete`
//! reports whether anything was removed. The variants here cover caller
//! mistakes and genuine internal failures only.

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for the cache.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Invalid call-site input (e.g. oversized key)
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Invalid construction-time configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Internal failure
    #[error("Internal error: {0}")]
    Internal(String),
}

// == Result Type Alias ==
/// Convenience Result type for the cache.
pub type Result<T> = std::result::Result<T, CacheError>;
