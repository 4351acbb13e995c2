//! Property-Based Tests for Cache Module
//!
//! Uses proptest to verify the cache's correctness properties.

use proptest::prelude::*;
use serde_json::json;

use crate::cache::TtlCache;

// == Test Configuration ==
const TEST_MAX_SIZE: usize = 100;
const TEST_DEFAULT_TTL: u64 = 300;

// == Strategies ==
/// Generates valid cache keys (non-empty, within length limit)
fn valid_key_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9_]{1,64}".prop_map(|s| s)
}

/// Generates valid cache values
fn valid_value_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 ]{1,256}".prop_map(|s| s)
}

/// Generates a sequence of cache operations for testing
#[derive(Debug, Clone)]
enum CacheOp {
    Set { key: String, value: String },
    Get { key: String },
    Delete { key: String },
    Clear,
}

fn cache_op_strategy() -> impl Strategy<Value = CacheOp> {
    prop_oneof![
        4 => (valid_key_strategy(), valid_value_strategy())
            .prop_map(|(key, value)| CacheOp::Set { key, value }),
        4 => valid_key_strategy().prop_map(|key| CacheOp::Get { key }),
        3 => valid_key_strategy().prop_map(|key| CacheOp::Delete { key }),
        1 => Just(CacheOp::Clear),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // For any sequence of operations, hit_count + miss_count must equal
    // total_requests, and the two maps must hold exactly the same keys at
    // every observable point.
    #[test]
    fn prop_counters_and_maps_stay_consistent(ops in prop::collection::vec(cache_op_strategy(), 1..80)) {
        let mut cache = TtlCache::with_limits(TEST_MAX_SIZE, TEST_DEFAULT_TTL).unwrap();
        let mut expected_hits: u64 = 0;
        let mut expected_misses: u64 = 0;

        for op in ops {
            match op {
                CacheOp::Set { key, value } => {
                    cache.set(key, json!(value), None).unwrap();
                }
                CacheOp::Get { key } => {
                    match cache.get(&key) {
                        Some(_) => expected_hits += 1,
                        None => expected_misses += 1,
                    }
                }
                CacheOp::Delete { key } => {
                    cache.delete(&key).unwrap();
                }
                CacheOp::Clear => {
                    cache.clear().unwrap();
                }
            }
            prop_assert!(cache.maps_consistent(), "value/expiry maps desynced");
        }

        let counters = cache.counters();
        prop_assert_eq!(counters.hit_count, expected_hits, "Hits mismatch");
        prop_assert_eq!(counters.miss_count, expected_misses, "Misses mismatch");
        prop_assert_eq!(
            counters.hit_count + counters.miss_count,
            counters.total_requests,
            "hit + miss must equal total requests"
        );
    }

    // For any valid key-value pair, storing and retrieving before
    // expiration returns the exact stored value.
    #[test]
    fn prop_roundtrip_storage(key in valid_key_strategy(), value in valid_value_strategy()) {
        let mut cache = TtlCache::with_limits(TEST_MAX_SIZE, TEST_DEFAULT_TTL).unwrap();

        cache.set(key.clone(), json!(value.clone()), None).unwrap();

        let retrieved = cache.get(&key);
        prop_assert_eq!(retrieved, Some(json!(value)), "Round-trip value mismatch");
    }

    // For any key in the cache, delete removes it and a second delete is a
    // no-op success.
    #[test]
    fn prop_delete_is_idempotent(key in valid_key_strategy(), value in valid_value_strategy()) {
        let mut cache = TtlCache::with_limits(TEST_MAX_SIZE, TEST_DEFAULT_TTL).unwrap();

        cache.set(key.clone(), json!(value), None).unwrap();
        prop_assert!(cache.get(&key).is_some(), "Key should exist before delete");

        prop_assert_eq!(cache.delete(&key).unwrap(), true);
        prop_assert_eq!(cache.delete(&key).unwrap(), false);
        prop_assert!(cache.get(&key).is_none(), "Key should not exist after delete");
        prop_assert!(cache.maps_consistent());
    }

    // For any key, overwriting resets the entry: the new value is returned
    // and only one entry exists.
    #[test]
    fn prop_overwrite_semantics(
        key in valid_key_strategy(),
        value1 in valid_value_strategy(),
        value2 in valid_value_strategy()
    ) {
        let mut cache = TtlCache::with_limits(TEST_MAX_SIZE, TEST_DEFAULT_TTL).unwrap();

        cache.set(key.clone(), json!(value1), None).unwrap();
        cache.set(key.clone(), json!(value2.clone()), None).unwrap();

        let retrieved = cache.get(&key);
        prop_assert_eq!(retrieved, Some(json!(value2)), "Overwrite should return new value");
        prop_assert_eq!(cache.len(), 1, "Should have exactly one entry after overwrite");
    }

    // For any sequence of SET operations, the number of entries never
    // exceeds max_size after a set returns, and set never fails because the
    // cache is full.
    #[test]
    fn prop_capacity_enforcement(
        entries in prop::collection::vec(
            (valid_key_strategy(), valid_value_strategy()),
            1..200
        )
    ) {
        let max_size = 50; // Use smaller max for testing
        let mut cache = TtlCache::with_limits(max_size, TEST_DEFAULT_TTL).unwrap();

        for (key, value) in entries {
            cache.set(key, json!(value), None).unwrap();
            prop_assert!(
                cache.len() <= max_size,
                "Cache size {} exceeds max {}",
                cache.len(),
                max_size
            );
            prop_assert!(cache.maps_consistent());
        }
    }

    // For any full cache of N live entries, eviction removes the
    // max(1, N/10) oldest entries by insertion order and no newer entry is
    // removed while an older one survives.
    #[test]
    fn prop_eviction_is_oldest_first(
        initial_keys in prop::collection::vec(valid_key_strategy(), 3..30),
        new_key in valid_key_strategy(),
        new_value in valid_value_strategy()
    ) {
        // Deduplicate but keep first-seen order, which is insertion order
        let mut unique_keys: Vec<String> = Vec::new();
        for key in initial_keys {
            if !unique_keys.contains(&key) {
                unique_keys.push(key);
            }
        }
        prop_assume!(unique_keys.len() >= 2);
        prop_assume!(!unique_keys.contains(&new_key));

        let capacity = unique_keys.len();
        let mut cache = TtlCache::with_limits(capacity, TEST_DEFAULT_TTL).unwrap();

        for key in &unique_keys {
            cache.set(key.clone(), json!(format!("value_{}", key)), None).unwrap();
        }
        prop_assert_eq!(cache.len(), capacity, "Cache should be at capacity");

        // Triggers cleanup (nothing expired) then a batch eviction
        cache.set(new_key.clone(), json!(new_value), None).unwrap();

        let expected_evicted = std::cmp::max(1, capacity / 10);
        prop_assert_eq!(
            cache.len(),
            capacity - expected_evicted + 1,
            "Eviction should remove exactly the batch size"
        );
        prop_assert_eq!(cache.counters().evictions, expected_evicted as u64);

        // The oldest batch is gone, everything newer survives
        for key in unique_keys.iter().take(expected_evicted) {
            prop_assert!(
                cache.get(key).is_none(),
                "Old key '{}' should have been evicted",
                key
            );
        }
        for key in unique_keys.iter().skip(expected_evicted) {
            prop_assert!(
                cache.get(key).is_some(),
                "Newer key '{}' should have survived",
                key
            );
        }
        prop_assert!(cache.get(&new_key).is_some(), "New key should exist");
    }
}

// Separate proptest block with fewer cases for fingerprint determinism
proptest! {
    #![proptest_config(ProptestConfig::with_cases(50))]

    // For any argument set, two fingerprints taken back to back within the
    // same time bucket are identical.
    #[test]
    fn prop_fingerprint_deterministic(
        positional in prop::collection::vec(valid_value_strategy(), 0..5),
        named in prop::collection::vec((valid_key_strategy(), valid_value_strategy()), 0..5)
    ) {
        use crate::cache::KeyFingerprinter;

        let fp = KeyFingerprinter::new();
        let positional: Vec<serde_json::Value> = positional.into_iter().map(|v| json!(v)).collect();
        let named: Vec<(&str, serde_json::Value)> = named
            .iter()
            .map(|(k, v)| (k.as_str(), json!(v)))
            .collect();

        let k1 = fp.fingerprint(&positional, &named);
        let k2 = fp.fingerprint(&positional, &named);

        prop_assert_eq!(&k1, &k2, "Fingerprint must be deterministic");
        prop_assert_eq!(k1.len(), 64, "Fingerprint must be fixed width");
    }
}
