// src/models/certificate.rs
//! Certificate data model.
//!
//! A certificate attests that a student completed a course. Each record
//! carries two server-assigned, immutable tokens:
//! - `unique_code`: the opaque public token third parties use to look
//!   the certificate up (printed into the QR code)
//! - `signature`: a SHA-256 fingerprint of the record's canonical field
//!   set, used to detect tampering after issuance
//!
//! Only `status` and the two date fields are mutable after issuance.
//! `status` and `updated_at` are excluded from the signature payload,
//! so status transitions never break verification; editing the dates
//! does break it, which is exactly what makes tampering detectable.

use std::fmt;
use std::str::FromStr;

use crate::error::Error;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Validity state of a certificate.
///
/// This is a closed enumeration: any other value is rejected with a
/// validation error before persistence. `status` is the authoritative
/// validity flag reported by the public validation endpoint.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CertificateStatus {
    Active,
    Expired,
    Revoked,
}

impl CertificateStatus {
    /// Canonical lowercase rendering, as stored and serialized.
    pub fn as_str(&self) -> &'static str {
        match self {
            CertificateStatus::Active => "active",
            CertificateStatus::Expired => "expired",
            CertificateStatus::Revoked => "revoked",
        }
    }
}

impl fmt::Display for CertificateStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CertificateStatus {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "active" => Ok(CertificateStatus::Active),
            "expired" => Ok(CertificateStatus::Expired),
            "revoked" => Ok(CertificateStatus::Revoked),
            other => Err(Error::Validation(format!(
                "status must be one of: active, expired, revoked (got \"{}\")",
                other
            ))),
        }
    }
}

/// A certificate issued to a student for a completed course.
///
/// # Fields
/// - `id`: Opaque primary identifier, immutable
/// - `student_id` / `course_id`: References to the subject and course
/// - `issue_date` / `expiry_date`: Calendar dates, no time component
/// - `unique_code`: Public lookup token, unique, assigned exactly once
/// - `signature`: 64-hex-character tamper-detection fingerprint, unique,
///   computed exactly once at creation. `None` only ever describes a
///   corrupt row and is surfaced as an integrity error, never as valid.
/// - `status`: Mutable validity flag, defaults to `active`
/// - `created_by`: Issuing user, kept as a bare identifier so the record
///   survives removal of the user account
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Certificate {
    pub id: Uuid,
    pub student_id: Uuid,
    pub course_id: Uuid,
    pub issue_date: NaiveDate,
    pub expiry_date: Option<NaiveDate>,

    /// Unique code for QR verification
    pub unique_code: String,

    /// Digital signature for certificate verification
    pub signature: Option<String>,

    pub status: CertificateStatus,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Mutable fields accepted by a certificate update.
///
/// `unique_code` and `signature` are deliberately absent: both are
/// server-controlled and frozen at issuance.
#[derive(Debug, Clone, Default)]
pub struct CertificateUpdate {
    pub issue_date: Option<NaiveDate>,
    pub expiry_date: Option<NaiveDate>,
    pub status: Option<CertificateStatus>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_round_trips_through_string_forms() {
        for status in [
            CertificateStatus::Active,
            CertificateStatus::Expired,
            CertificateStatus::Revoked,
        ] {
            assert_eq!(status.as_str().parse::<CertificateStatus>().unwrap(), status);
        }
    }

    #[test]
    fn status_outside_enumeration_is_rejected() {
        let err = "cancelled".parse::<CertificateStatus>().unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
        assert!(err.to_string().contains("active, expired, revoked"));
    }

    #[test]
    fn status_rejects_uppercase_variants() {
        assert!("Active".parse::<CertificateStatus>().is_err());
    }
}
