// src/utils/serialization.rs
//! Canonical serialization for signature payloads.
//!
//! The certificate signature is a hash over a serialized field mapping,
//! so the serialization must be byte-for-byte reproducible: identical
//! records must always produce identical payloads, across processes and
//! across releases.

use std::collections::BTreeMap;

use serde_json::Value;

/// Serializes a field mapping to its canonical JSON form.
///
/// # Arguments
/// * `fields` - Field name to value mapping
///
/// # Returns
/// - `Ok(String)` with the canonical JSON payload on success
/// - `Err(serde_json::Error)` if serialization fails
///
/// # Canonical form
/// Keys are emitted in lexicographic order (guaranteed by the
/// `BTreeMap` iteration order) with no extraneous whitespace. Absent
/// optional values must be passed as [`Value::Null`] rather than
/// omitted, so that every record serializes the same set of keys.
pub fn canonical_json(fields: &BTreeMap<&str, Value>) -> Result<String, serde_json::Error> {
    serde_json::to_string(fields)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_json_sorts_keys_lexicographically() {
        let mut fields = BTreeMap::new();
        fields.insert("zeta", Value::String("z".to_string()));
        fields.insert("alpha", Value::String("a".to_string()));
        fields.insert("mid", Value::Null);

        let payload = canonical_json(&fields).unwrap();
        assert_eq!(payload, r#"{"alpha":"a","mid":null,"zeta":"z"}"#);
    }

    #[test]
    fn canonical_json_is_deterministic() {
        let mut fields = BTreeMap::new();
        fields.insert("code", Value::String("abc-123".to_string()));
        fields.insert("expiry_date", Value::Null);

        assert_eq!(
            canonical_json(&fields).unwrap(),
            canonical_json(&fields).unwrap()
        );
    }
}
