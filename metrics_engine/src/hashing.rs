//! Metrics Engine v1 - Canonical Hashing
//!
//! Deterministic canonical serialization + SHA-256 hashing of a result.
//!
//! Rules:
//!   - engine_version first, then the metrics object
//!   - struct fields in declaration order, agents in catalog order
//!   - compact UTF-8 JSON, no whitespace

use serde_json::{Map, Value};
use sha2::{Digest, Sha256};

use crate::domain::CalculatedMetrics;
use crate::ENGINE_VERSION;

/// Canonical serialization of a result to UTF-8 JSON bytes.
pub fn canonical_serialize(metrics: &CalculatedMetrics) -> Result<Vec<u8>, serde_json::Error> {
    let value = build_canonical_value(metrics)?;
    serde_json::to_vec(&value)
}

/// SHA-256 of the canonical serialization. Lowercase hex.
pub fn canonical_hash(metrics: &CalculatedMetrics) -> Result<String, serde_json::Error> {
    let bytes = canonical_serialize(metrics)?;
    Ok(hex_digest(&bytes))
}

/// Lowercase hex SHA-256 of arbitrary bytes.
pub fn hex_digest(bytes: &[u8]) -> String {
    Sha256::digest(bytes)
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect()
}

fn build_canonical_value(metrics: &CalculatedMetrics) -> Result<Value, serde_json::Error> {
    // Map preserves insertion order (preserve_order feature).
    let mut root = Map::new();
    root.insert(
        "engine_version".to_string(),
        Value::Number(ENGINE_VERSION.into()),
    );
    root.insert("metrics".to_string(), serde_json::to_value(metrics)?);
    Ok(Value::Object(root))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::calculate_metrics;

    #[test]
    fn test_engine_version_is_first_field() {
        let bytes = canonical_serialize(&calculate_metrics(620_000.0, 12.0)).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert!(text.starts_with(r#"{"engine_version":1,"metrics":{"profitGrowth":14.2,"#));
        assert!(!text.contains('\n'));
    }

    #[test]
    fn test_hash_is_stable_and_input_sensitive() {
        let a = canonical_hash(&calculate_metrics(620_000.0, 12.0)).unwrap();
        let b = canonical_hash(&calculate_metrics(620_000.0, 12.0)).unwrap();
        let c = canonical_hash(&calculate_metrics(620_001.0, 12.0)).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.len(), 64);
        assert!(a.chars().all(|ch| ch.is_ascii_hexdigit() && !ch.is_ascii_uppercase()));
    }

    #[test]
    fn test_hex_digest_known_value() {
        assert_eq!(
            hex_digest(b""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }
}
