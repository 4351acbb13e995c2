//! Memocache - An in-process TTL cache for memoizing expensive computations
//!
//! Provides a bounded cache with lazy TTL expiration, batch eviction of the
//! oldest entries under size pressure, lifetime hit/miss accounting, and
//! deterministic fingerprinted keys derived from call arguments.

pub mod cache;
pub mod config;
pub mod error;
pub mod tasks;

pub use cache::{
    CacheEntry, CacheStats, KeyFingerprinter, SharedTtlCache, StatsReport, TimeBucket, TtlCache,
};
pub use config::CacheConfig;
pub use error::{CacheError, Result};
pub use tasks::spawn_cleanup_task;
