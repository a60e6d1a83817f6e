//! Hashing System
//!
//! Two unrelated hashes live here:
//! - the artwork digest, a rolling 32-bit polynomial hash that seeds every
//!   visual parameter (stable, fast, not cryptographic);
//! - SHA-256 over content and canonical JSON, used for manifests.

use serde::{Deserialize, Serialize};
use serde_json::{to_string, Value};
use sha2::{Digest, Sha256};

/// Three-component digest of an input string.
///
/// Every component is the absolute value of a wrapped `i32` accumulator, so
/// the largest possible value is `2^31` (from `i32::MIN`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct HashDigest {
    pub primary: u32,
    pub secondary: u32,
    pub combined: u32,
}

/// Fold `input` into a [`HashDigest`].
///
/// Characters are consumed as UTF-16 code units, left to right. Both
/// accumulators wrap on overflow exactly like 32-bit two's-complement
/// integers; the derived parameters depend on that wraparound.
pub fn hash(input: &str) -> HashDigest {
    let mut h1: i32 = 0;
    let mut h2: i32 = 0;

    for unit in input.encode_utf16() {
        let c = i32::from(unit);
        h1 = h1.wrapping_mul(31).wrapping_add(c);
        h2 = h2.wrapping_mul(9).wrapping_add(c);
    }

    HashDigest {
        primary: h1.unsigned_abs(),
        secondary: h2.unsigned_abs(),
        combined: h1.wrapping_add(h2).unsigned_abs(),
    }
}

/// Digest of a quote/author pair: the two strings are concatenated with no
/// separator.
pub fn artwork_digest(quote: &str, author: &str) -> HashDigest {
    let mut joined = String::with_capacity(quote.len() + author.len());
    joined.push_str(quote);
    joined.push_str(author);
    hash(&joined)
}

/// Compute SHA-256 hash of bytes, return hex string
pub fn sha256_hex(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

/// Convert to canonical JSON (sorted keys, no whitespace)
pub fn canonical_json<T: Serialize>(value: &T) -> Result<String, serde_json::Error> {
    let v: Value = serde_json::to_value(value)?;
    to_string(&sort_value(&v))
}

fn sort_value(v: &Value) -> Value {
    match v {
        Value::Object(map) => {
            let mut sorted: Vec<_> = map.iter().collect();
            sorted.sort_by(|a, b| a.0.cmp(b.0));
            Value::Object(
                sorted
                    .into_iter()
                    .map(|(k, v)| (k.clone(), sort_value(v)))
                    .collect(),
            )
        }
        Value::Array(arr) => Value::Array(arr.iter().map(sort_value).collect()),
        _ => v.clone(),
    }
}

/// Compute manifest hash over the canonical form of any serializable value
pub fn compute_manifest_hash<T: Serialize>(manifest: &T) -> Result<String, serde_json::Error> {
    let canonical = canonical_json(manifest)?;
    Ok(sha256_hex(canonical.as_bytes()))
}

/// Job hash identifies *what* was generated, independent of when.
/// job_hash = sha256(quote + ":" + author + ":" + engine_version)
pub fn compute_job_hash(quote: &str, author: &str, engine_version: &str) -> String {
    let combined = format!("{}:{}:{}", quote, author, engine_version);
    sha256_hex(combined.as_bytes())
}

mod hex {
    pub fn encode(bytes: impl AsRef<[u8]>) -> String {
        bytes.as_ref().iter().map(|b| format!("{:02x}", b)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_input_is_zero() {
        assert_eq!(hash(""), HashDigest::default());
    }

    #[test]
    fn test_single_char() {
        // 'A' = 65: both accumulators are just the code unit
        let d = hash("A");
        assert_eq!(d.primary, 65);
        assert_eq!(d.secondary, 65);
        assert_eq!(d.combined, 130);
    }

    #[test]
    fn test_reference_vector() {
        let d = artwork_digest("Dream it. Wish it. Do it.", "Unknown");
        assert_eq!(d.primary, 1_190_883_424);
        assert_eq!(d.secondary, 941_886_488);
        assert_eq!(d.combined, 248_996_936);
    }

    #[test]
    fn test_wraparound_matters() {
        // Long enough to overflow 32 bits many times over.
        let d = hash("Dream bigger. Do bigger.Unknown");
        assert_eq!(d.primary, 983_681_438);
        assert_eq!(d.secondary, 1_388_577_392);
        // Unwrapped sum would be 2372258830; the wrapped one differs.
        assert_eq!(d.combined, 1_922_708_466);
    }

    #[test]
    fn test_utf16_units() {
        // Astral chars count as two code units, both folded in.
        let d = hash("\u{1F4DC}");
        let mut h1: i32 = 0;
        let mut h2: i32 = 0;
        for c in [0xD83Di32, 0xDCDC] {
            h1 = h1.wrapping_mul(31).wrapping_add(c);
            h2 = h2.wrapping_mul(9).wrapping_add(c);
        }
        assert_eq!(d.primary, h1.unsigned_abs());
        assert_eq!(d.secondary, h2.unsigned_abs());
    }

    #[test]
    fn test_canonical_json_sorted() {
        let obj = json!({"z": 1, "a": 2, "m": 3});
        let canonical = canonical_json(&obj).unwrap();
        assert_eq!(canonical, r#"{"a":2,"m":3,"z":1}"#);
    }

    #[test]
    fn test_sha256_known_value() {
        assert_eq!(
            sha256_hex(b""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_job_hash_stable() {
        let h1 = compute_job_hash("q", "a", "1.0.0");
        let h2 = compute_job_hash("q", "a", "1.0.0");
        assert_eq!(h1, h2);
        assert_ne!(h1, compute_job_hash("q", "a", "1.0.1"));
    }
}
