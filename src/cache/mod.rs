//! Cache Module
//!
//! Provides bounded in-memory caching with lazy TTL expiration, batch
//! eviction under size pressure, and fingerprinted memoization keys.

mod entry;
mod fingerprint;
mod shared;
mod stats;
mod store;

#[cfg(test)]
mod property_tests;

// Re-export public types
pub use entry::CacheEntry;
pub use fingerprint::{KeyFingerprinter, TimeBucket};
pub use shared::SharedTtlCache;
pub use stats::{CacheStats, StatsReport};
pub use store::TtlCache;

// == Public Constants ==
/// Maximum allowed key length in bytes
pub const MAX_KEY_LENGTH: usize = 256;
