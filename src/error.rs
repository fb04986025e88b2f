// src/error.rs
//! Error taxonomy for the certificate system.
//!
//! Every fallible operation in the services and storage layers returns
//! [`Error`]. The variants mirror the failure classes the HTTP boundary
//! needs to tell apart:
//! - `Validation`: a request field is malformed or outside a closed
//!   enumeration (e.g. an unknown certificate status)
//! - `NotFound`: a referenced record does not exist
//! - `Conflict`: a uniqueness constraint was violated
//! - `Integrity`: a persisted certificate is missing its signature
//! - `Internal`: serialization or rendering faults with no caller remedy

use thiserror::Error;

/// Convenience alias used throughout the services and storage layers.
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type for all certificate system operations.
#[derive(Debug, Error)]
pub enum Error {
    /// A request field failed validation before any persistence happened.
    #[error("validation error: {0}")]
    Validation(String),

    /// A record could not be resolved by its identifier.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// Entity kind, e.g. "student" or "certificate"
        entity: &'static str,
        /// The identifier that failed to resolve
        id: String,
    },

    /// A unique field already holds the given value.
    ///
    /// `field` is the constrained column (e.g. `unique_code`); callers
    /// that retry on collisions match on it rather than on message text.
    #[error("duplicate {field}: {value}")]
    Conflict {
        field: &'static str,
        value: String,
    },

    /// A stored certificate violates the signing invariant.
    ///
    /// Surfaced whenever a persisted certificate turns up without a
    /// signature; such a record must never be reported as valid.
    #[error("integrity error: {0}")]
    Integrity(String),

    /// Serialization or rendering failure outside the caller's control.
    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Builds a [`Error::NotFound`] for the given entity kind and id.
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Error::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    /// Builds a [`Error::Conflict`] for the given unique field.
    pub fn conflict(field: &'static str, value: impl ToString) -> Self {
        Error::Conflict {
            field,
            value: value.to_string(),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Internal(format!("serialization failed: {}", err))
    }
}
