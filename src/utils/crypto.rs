// src/utils/crypto.rs
//! Cryptographic utilities for certificate fingerprinting.
//!
//! Uses SHA-256 for all operations. The digest is a tamper-detection
//! fingerprint, not an encryption: it is never decrypted or reversed.

use sha2::{Digest, Sha256};

/// Computes the SHA-256 hash of the input data, rendered as lowercase
/// hexadecimal.
///
/// # Arguments
/// * `data` - Binary data to hash (as bytes slice)
///
/// # Returns
/// 64-character lowercase hex string.
pub fn sha256_hex(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sha256_hex_matches_known_vector() {
        assert_eq!(
            sha256_hex(b"hello world"),
            "b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9"
        );
    }

    #[test]
    fn sha256_hex_is_lowercase_and_fixed_length() {
        let digest = sha256_hex(b"");
        assert_eq!(digest.len(), 64);
        assert!(digest.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }
}
