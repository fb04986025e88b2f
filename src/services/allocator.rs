// src/services/allocator.rs
//! Unique code allocation for certificates.
//!
//! Every certificate carries an opaque public code used as its sole
//! external lookup key. Codes are drawn from a 128-bit random space, so
//! collision probability against any realistic population of existing
//! codes is negligible; the storage layer's uniqueness constraint stays
//! the final arbiter, and the issuer retries on the (astronomically
//! unlikely) conflict.

use uuid::Uuid;

/// Source of opaque public certificate codes.
///
/// Implementations must be side-effect-free: allocation consumes no
/// external inputs and mutates no state beyond the RNG.
pub trait IdentifierAllocator: Send + Sync {
    /// Produces a fresh opaque code.
    fn allocate(&self) -> String;
}

/// Default allocator producing canonically rendered 128-bit random
/// identifiers (hyphenated lowercase UUID v4 strings).
pub struct UuidAllocator;

impl IdentifierAllocator for UuidAllocator {
    fn allocate(&self) -> String {
        Uuid::new_v4().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allocated_codes_are_canonical_uuid_strings() {
        let code = UuidAllocator.allocate();
        assert_eq!(code.len(), 36);
        assert!(Uuid::parse_str(&code).is_ok());
        assert_eq!(code, code.to_lowercase());
    }

    #[test]
    fn successive_allocations_differ() {
        let allocator = UuidAllocator;
        let first = allocator.allocate();
        let second = allocator.allocate();
        assert_ne!(first, second);
    }
}
