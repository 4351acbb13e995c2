//! Cache Store Module
//!
//! Main cache engine combining parallel value/expiry maps with lazy TTL
//! expiration and two-phase size-pressure relief.

use std::collections::HashMap;

use serde_json::Value;
use tracing::debug;

use crate::cache::entry::current_timestamp_ms;
use crate::cache::{CacheEntry, CacheStats, StatsReport, MAX_KEY_LENGTH};
use crate::config::CacheConfig;
use crate::error::{CacheError, Result};

// == TTL Cache ==
/// Bounded in-memory TTL cache.
///
/// The value map and the expiry map are kept strictly parallel: a key exists
/// in one if and only if it exists in the other. All removal goes through a
/// single path so the invariant holds on every exit.
///
/// Expiry is lazy. A stale entry sits in storage until the next `get`,
/// `cleanup_expired`, or eviction pass observes it; nothing runs on a timer
/// unless the caller spawns the optional cleanup task.
#[derive(Debug)]
pub struct TtlCache {
    /// Key-value storage with access metadata
    entries: HashMap<String, CacheEntry>,
    /// Parallel map of key to expiration timestamp (Unix milliseconds)
    expirations: HashMap<String, u64>,
    /// Lifetime performance counters
    stats: CacheStats,
    /// Maximum number of live entries allowed
    max_size: usize,
    /// Default TTL in seconds for entries without explicit TTL
    default_ttl: u64,
    /// Monotonic insertion counter, tie-break for eviction ordering
    next_seq: u64,
}

impl TtlCache {
    // == Constructor ==
    /// Creates a new TtlCache from validated configuration.
    ///
    /// Rejects a zero `max_size` at construction rather than failing oddly
    /// on the first insert.
    pub fn new(config: &CacheConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            entries: HashMap::new(),
            expirations: HashMap::new(),
            stats: CacheStats::new(),
            max_size: config.max_size,
            default_ttl: config.default_ttl,
            next_seq: 0,
        })
    }

    /// Convenience constructor for the common case of explicit limits.
    pub fn with_limits(max_size: usize, default_ttl: u64) -> Result<Self> {
        Self::new(&CacheConfig {
            max_size,
            default_ttl,
            ..CacheConfig::default()
        })
    }

    // == Get ==
    /// Retrieves a value by key.
    ///
    /// Absence is a normal outcome, not an error. An entry whose TTL has
    /// elapsed counts as a miss and is removed on the spot (lazy expiry).
    /// A hit updates the entry's access metadata.
    pub fn get(&mut self, key: &str) -> Option<Value> {
        self.stats.record_request();
        let now = current_timestamp_ms();

        match self.expirations.get(key) {
            Some(&expires_at) if now >= expires_at => {
                // Logically expired, reclaim through the shared removal path
                self.remove_entry(key);
                self.stats.record_miss();
                None
            }
            Some(_) => match self.entries.get_mut(key) {
                Some(entry) => {
                    entry.touch();
                    self.stats.record_hit();
                    Some(entry.value.clone())
                }
                None => {
                    // Maps desynced somehow: degrade to a miss and repair
                    self.expirations.remove(key);
                    self.stats.record_miss();
                    None
                }
            },
            None => {
                self.stats.record_miss();
                None
            }
        }
    }

    // == Set ==
    /// Stores a key-value pair with optional TTL in seconds.
    ///
    /// Overwriting an existing key resets its metadata; it is logically a
    /// fresh entry. A `ttl` of zero is legal and makes the entry stale on
    /// the next read.
    ///
    /// When a new key would push the cache to `max_size`, expired entries
    /// are reclaimed first; if the cache is still full, the oldest tenth of
    /// the entries (minimum one) is evicted. A full cache never causes the
    /// write to be rejected.
    pub fn set(&mut self, key: String, value: Value, ttl: Option<u64>) -> Result<()> {
        if key.len() > MAX_KEY_LENGTH {
            return Err(CacheError::InvalidRequest(format!(
                "Key exceeds maximum length of {} bytes",
                MAX_KEY_LENGTH
            )));
        }

        // Overwrites don't grow the map, so pressure relief only applies to
        // genuinely new keys
        let is_overwrite = self.entries.contains_key(&key);
        if !is_overwrite && self.entries.len() >= self.max_size {
            let reclaimed = self.cleanup_expired();
            if self.entries.len() >= self.max_size {
                let evicted = self.evict_oldest();
                debug!(reclaimed, evicted, "relieved cache pressure before insert");
            }
        }

        let ttl_secs = ttl.unwrap_or(self.default_ttl);
        let entry = CacheEntry::new(value, self.next_seq);
        self.next_seq += 1;
        let expires_at = entry
            .created_at
            .saturating_add(ttl_secs.saturating_mul(1000));

        // Both maps updated together, nothing observable in between
        self.expirations.insert(key.clone(), expires_at);
        self.entries.insert(key, entry);

        Ok(())
    }

    // == Delete ==
    /// Removes an entry by key.
    ///
    /// Removing a missing key is a no-op success; returns whether anything
    /// was actually removed.
    pub fn delete(&mut self, key: &str) -> Result<bool> {
        Ok(self.remove_entry(key))
    }

    // == Clear ==
    /// Empties both maps.
    ///
    /// Lifetime counters are untouched: they describe the cache's history,
    /// not its contents.
    pub fn clear(&mut self) -> Result<()> {
        self.entries.clear();
        self.expirations.clear();
        Ok(())
    }

    // == Cleanup Expired ==
    /// Removes all entries whose TTL has elapsed.
    ///
    /// Runs through the same removal path as `delete`, stamps the cleanup
    /// time, and returns the number of entries removed. Cost is linear in
    /// the current entry count, which is fine because this only runs under
    /// size pressure, on stats collection, or from the optional background
    /// task.
    pub fn cleanup_expired(&mut self) -> usize {
        let now = current_timestamp_ms();
        let expired_keys: Vec<String> = self
            .expirations
            .iter()
            .filter(|(_, &expires_at)| now >= expires_at)
            .map(|(key, _)| key.clone())
            .collect();

        let mut removed = 0;
        for key in expired_keys {
            if self.remove_entry(&key) {
                removed += 1;
            }
        }

        self.stats.record_cleanup(removed as u64);
        if removed > 0 {
            debug!(removed, "reclaimed expired entries");
        }
        removed
    }

    // == Evict Oldest ==
    /// Removes the oldest tenth of the entries (minimum one), oldest first
    /// by `created_at` with the insertion sequence as tie-break, so the
    /// batch is deterministic even when timestamps collide.
    fn evict_oldest(&mut self) -> usize {
        if self.entries.is_empty() {
            return 0;
        }
        let batch = std::cmp::max(1, self.entries.len() / 10);

        let mut order: Vec<(u64, u64, String)> = self
            .entries
            .iter()
            .map(|(key, entry)| (entry.created_at, entry.seq, key.clone()))
            .collect();
        order.sort_unstable();

        let mut removed = 0;
        for (_, _, key) in order.into_iter().take(batch) {
            if self.remove_entry(&key) {
                removed += 1;
            }
        }

        self.stats.record_evictions(removed as u64);
        debug!(removed, "evicted oldest entries under size pressure");
        removed
    }

    // == Compute If Absent ==
    /// Returns the cached value for `key`, or invokes `producer`, stores its
    /// result with the given TTL, and returns it.
    ///
    /// Pure composition of `get` and `set`; no new invariants.
    pub fn get_or_compute<F>(&mut self, key: &str, ttl: Option<u64>, producer: F) -> Result<Value>
    where
        F: FnOnce() -> Value,
    {
        if let Some(value) = self.get(key) {
            return Ok(value);
        }
        let value = producer();
        self.set(key.to_string(), value.clone(), ttl)?;
        Ok(value)
    }

    // == Stats ==
    /// Returns a point-in-time stats report.
    ///
    /// Sweeps expired entries first so the reported totals describe live
    /// entries only.
    pub fn stats(&mut self) -> StatsReport {
        self.cleanup_expired();

        let total_keys = self.entries.len();
        let total_access: u64 = self.entries.values().map(|e| e.access_count).sum();
        let memory_usage_bytes: usize = self
            .entries
            .iter()
            .map(|(key, entry)| key.len() + entry.approx_value_bytes())
            .sum();

        StatsReport::derive(
            &self.stats,
            total_keys,
            total_access,
            memory_usage_bytes,
            self.max_size,
        )
    }

    // == Counters ==
    /// Read-only view of the lifetime counters.
    pub fn counters(&self) -> &CacheStats {
        &self.stats
    }

    // == Length ==
    /// Returns the current number of stored entries, expired or not.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    // == Is Empty ==
    /// Returns true if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Maximum number of live entries this cache will hold.
    pub fn max_size(&self) -> usize {
        self.max_size
    }

    // == Internal Removal Path ==
    /// Removes a key from both maps together. Every destruction route
    /// (delete, lazy expiry, cleanup, eviction) funnels through here.
    fn remove_entry(&mut self, key: &str) -> bool {
        let had_entry = self.entries.remove(key).is_some();
        let had_expiry = self.expirations.remove(key).is_some();
        had_entry || had_expiry
    }

    /// True when the value map and expiry map hold exactly the same keys.
    pub(crate) fn maps_consistent(&self) -> bool {
        self.entries.len() == self.expirations.len()
            && self.entries.keys().all(|k| self.expirations.contains_key(k))
    }
}
