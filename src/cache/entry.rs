//! Cache Entry Module
//!
//! Defines the structure for individual cache entries and access metadata.

use std::time::{SystemTime, UNIX_EPOCH};

use serde_json::Value;

// == Cache Entry ==
/// Represents a single cache entry with value and access metadata.
///
/// Expiration is tracked separately by the store in a parallel map so the
/// two can be checked against each other; the entry itself only knows when
/// it was created and how it has been accessed.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// The stored value
    pub value: Value,
    /// Creation timestamp (Unix milliseconds)
    pub created_at: u64,
    /// Last successful read timestamp (Unix milliseconds)
    pub last_accessed: u64,
    /// Number of successful reads since creation
    pub access_count: u64,
    /// Insertion sequence number, tie-break for eviction ordering when
    /// created_at timestamps collide
    pub seq: u64,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates a new cache entry with fresh metadata.
    ///
    /// Overwriting an existing key goes through here too: the overwrite is
    /// logically a fresh entry, so access_count restarts at zero.
    pub fn new(value: Value, seq: u64) -> Self {
        let now = current_timestamp_ms();
        Self {
            value,
            created_at: now,
            last_accessed: now,
            access_count: 0,
            seq,
        }
    }

    // == Touch ==
    /// Records a successful read.
    pub fn touch(&mut self) {
        self.access_count += 1;
        self.last_accessed = current_timestamp_ms();
    }

    // == Approximate Size ==
    /// Coarse memory estimate for this entry's value in bytes.
    ///
    /// Serialized JSON length, not allocator-exact. Good enough for the
    /// stats report's utilization number.
    pub fn approx_value_bytes(&self) -> usize {
        serde_json::to_string(&self.value)
            .map(|s| s.len())
            .unwrap_or(0)
    }
}

// == Utility Functions ==
/// Returns current Unix timestamp in milliseconds.
pub fn current_timestamp_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("Time went backwards")
        .as_millis() as u64
}
