//! Key Fingerprint Module
//!
//! Derives stable cache keys from arbitrary call arguments.
//!
//! Positional arguments are serialized in order and named arguments sorted
//! by name, so logically identical calls always canonicalize to the same
//! byte string. A coarse UTC time-bucket label is mixed in before hashing:
//! with the default daily bucket, memoized results rotate automatically at
//! midnight instead of needing explicit invalidation. Two identical calls on
//! either side of the boundary get different keys and miss each other; the
//! bucket granularity is a tunable for callers that prefer otherwise.

use chrono::Utc;
use serde_json::Value;
use sha2::{Digest, Sha256};

// == Time Bucket ==
/// Granularity of the timestamp mixed into derived keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeBucket {
    /// No time component; keys never rotate
    None,
    /// Keys rotate at the top of each UTC hour
    Hourly,
    /// Keys rotate at UTC midnight
    #[default]
    Daily,
}

impl TimeBucket {
    /// Label for the current bucket, empty for `None`.
    fn label(&self) -> String {
        match self {
            TimeBucket::None => String::new(),
            TimeBucket::Hourly => Utc::now().format("%Y-%m-%dT%H").to_string(),
            TimeBucket::Daily => Utc::now().format("%Y-%m-%d").to_string(),
        }
    }
}

// == Key Fingerprinter ==
/// Derives deterministic, fixed-width cache keys from call arguments.
///
/// Output is the SHA-256 hex digest of the canonical argument form, 64
/// characters regardless of input size. The digest is stable across process
/// runs for identical input within the same time bucket.
#[derive(Debug, Clone, Default)]
pub struct KeyFingerprinter {
    /// Time-bucket granularity mixed into every key
    bucket: TimeBucket,
}

impl KeyFingerprinter {
    // == Constructor ==
    /// Creates a fingerprinter with the default daily bucket.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a fingerprinter with an explicit bucket granularity.
    pub fn with_bucket(bucket: TimeBucket) -> Self {
        Self { bucket }
    }

    // == Fingerprint ==
    /// Derives a key from positional and named arguments.
    ///
    /// Named arguments are sorted by name before serialization so argument
    /// order at the call site never changes the key.
    pub fn fingerprint(&self, positional: &[Value], named: &[(&str, Value)]) -> String {
        let mut hasher = Sha256::new();

        for arg in positional {
            hasher.update(b"a:");
            hasher.update(canonical_json(arg).as_bytes());
            hasher.update(b";");
        }

        let mut sorted: Vec<&(&str, Value)> = named.iter().collect();
        sorted.sort_by_key(|(name, _)| *name);
        for (name, value) in sorted {
            hasher.update(b"k:");
            hasher.update(name.as_bytes());
            hasher.update(b"=");
            hasher.update(canonical_json(value).as_bytes());
            hasher.update(b";");
        }

        hasher.update(b"t:");
        hasher.update(self.bucket.label().as_bytes());

        format!("{:x}", hasher.finalize())
    }
}

/// Serializes a value with object keys in sorted order.
///
/// serde_json preserves map insertion order by default, so objects are
/// rebuilt with a BTreeMap before serialization.
fn canonical_json(value: &Value) -> String {
    match value {
        Value::Object(map) => {
            let sorted: std::collections::BTreeMap<&String, &Value> = map.iter().collect();
            let inner: Vec<String> = sorted
                .into_iter()
                .map(|(k, v)| format!("{}:{}", serde_json::to_string(k).unwrap_or_default(), canonical_json(v)))
                .collect();
            format!("{{{}}}", inner.join(","))
        }
        Value::Array(items) => {
            let inner: Vec<String> = items.iter().map(canonical_json).collect();
            format!("[{}]", inner.join(","))
        }
        other => serde_json::to_string(other).unwrap_or_default(),
    }
}
