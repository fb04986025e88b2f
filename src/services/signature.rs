// src/services/signature.rs
//! Certificate signature engine.
//!
//! Derives a fixed-length digest from a certificate's canonical field
//! set. The digest is stamped onto the record once at issuance and
//! re-derived on demand to detect tampering: if any signature-relevant
//! field changed since issuance, the recomputed digest no longer equals
//! the stored one.
//!
//! The canonical field set deliberately excludes `status` and
//! `updated_at`, so routine status transitions never invalidate a
//! certificate's signature.

use std::collections::BTreeMap;

use crate::error::{Error, Result};
use crate::models::certificate::Certificate;
use crate::models::course::Course;
use crate::models::student::Student;
use crate::utils::crypto::sha256_hex;
use crate::utils::serialization::canonical_json;
use chrono::SecondsFormat;
use serde_json::Value;

/// Computes the signature digest for a certificate.
///
/// # Arguments
/// * `certificate` - The certificate record, with its frozen creation
///   timestamp already assigned
/// * `student` - The student the certificate references
/// * `course` - The course the certificate references
///
/// # Returns
/// 64-character lowercase hex SHA-256 digest of the canonical payload.
///
/// # Canonical field set
/// The payload maps fixed key names to the certificate identity, the
/// student's external identifier and computed full name, the course
/// name, both dates (ISO-8601 calendar dates, null marker for an absent
/// expiry), the public code, the issuing user (null marker if absent),
/// and the creation timestamp with microsecond precision. Keys are
/// serialized in lexicographic order with no whitespace variance, so
/// the same record always hashes identically.
pub fn digest(certificate: &Certificate, student: &Student, course: &Course) -> Result<String> {
    let mut fields = BTreeMap::new();
    fields.insert(
        "certificate_id",
        Value::String(certificate.id.to_string()),
    );
    fields.insert("student_id", Value::String(student.student_id.clone()));
    fields.insert("student_name", Value::String(student.full_name()));
    fields.insert("course_name", Value::String(course.name.clone()));
    fields.insert(
        "issue_date",
        Value::String(certificate.issue_date.to_string()),
    );
    fields.insert(
        "expiry_date",
        certificate
            .expiry_date
            .map(|date| Value::String(date.to_string()))
            .unwrap_or(Value::Null),
    );
    fields.insert(
        "unique_code",
        Value::String(certificate.unique_code.clone()),
    );
    fields.insert(
        "created_by",
        certificate
            .created_by
            .map(|user| Value::String(user.to_string()))
            .unwrap_or(Value::Null),
    );
    fields.insert(
        "created_at",
        Value::String(
            certificate
                .created_at
                .to_rfc3339_opts(SecondsFormat::Micros, true),
        ),
    );

    let payload = canonical_json(&fields)?;
    Ok(sha256_hex(payload.as_bytes()))
}

/// Re-verifies a certificate's stored signature.
///
/// Recomputes the digest from the record's *current* canonical fields
/// and compares it to the stored signature. Plain equality is enough:
/// this is integrity checking, not secret comparison.
///
/// # Returns
/// - `Ok(true)` if the recomputed digest equals the stored signature
/// - `Ok(false)` if any signature-relevant field was altered
/// - `Err(Error::Integrity)` if the record has no stored signature
pub fn verify(certificate: &Certificate, student: &Student, course: &Course) -> Result<bool> {
    let stored = certificate
        .signature
        .as_deref()
        .filter(|s| !s.is_empty())
        .ok_or_else(|| {
            Error::Integrity(format!(
                "certificate {} is persisted without a signature",
                certificate.id
            ))
        })?;
    Ok(digest(certificate, student, course)? == stored)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::certificate::CertificateStatus;
    use chrono::{NaiveDate, Utc};
    use uuid::Uuid;

    fn fixture() -> (Certificate, Student, Course) {
        let now = Utc::now();
        let student = Student {
            id: Uuid::new_v4(),
            student_id: "STU001".to_string(),
            first_name: "John".to_string(),
            last_name: "Doe".to_string(),
            email: None,
            date_of_birth: None,
            created_at: now,
            updated_at: now,
        };
        let course = Course {
            id: Uuid::new_v4(),
            name: "Python Programming".to_string(),
            description: None,
            duration: 10,
            created_at: now,
            updated_at: now,
        };
        let certificate = Certificate {
            id: Uuid::new_v4(),
            student_id: student.id,
            course_id: course.id,
            issue_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            expiry_date: None,
            unique_code: Uuid::new_v4().to_string(),
            signature: None,
            status: CertificateStatus::Active,
            created_by: None,
            created_at: now,
            updated_at: now,
        };
        (certificate, student, course)
    }

    #[test]
    fn digest_is_a_64_char_hex_string() {
        let (certificate, student, course) = fixture();
        let digest = digest(&certificate, &student, &course).unwrap();
        assert_eq!(digest.len(), 64);
        assert!(digest.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn digest_is_deterministic() {
        let (certificate, student, course) = fixture();
        assert_eq!(
            digest(&certificate, &student, &course).unwrap(),
            digest(&certificate, &student, &course).unwrap()
        );
    }

    #[test]
    fn digest_changes_when_a_canonical_field_changes() {
        let (mut certificate, student, course) = fixture();
        let original = digest(&certificate, &student, &course).unwrap();

        certificate.issue_date = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        assert_ne!(digest(&certificate, &student, &course).unwrap(), original);
    }

    #[test]
    fn digest_distinguishes_absent_and_present_expiry() {
        let (mut certificate, student, course) = fixture();
        let without_expiry = digest(&certificate, &student, &course).unwrap();

        certificate.expiry_date = NaiveDate::from_ymd_opt(2026, 1, 1);
        assert_ne!(digest(&certificate, &student, &course).unwrap(), without_expiry);
    }

    #[test]
    fn digest_ignores_status() {
        let (mut certificate, student, course) = fixture();
        let active = digest(&certificate, &student, &course).unwrap();

        certificate.status = CertificateStatus::Revoked;
        assert_eq!(digest(&certificate, &student, &course).unwrap(), active);
    }

    #[test]
    fn verify_accepts_the_stamped_signature_and_detects_tampering() {
        let (mut certificate, student, course) = fixture();
        certificate.signature = Some(digest(&certificate, &student, &course).unwrap());

        assert!(verify(&certificate, &student, &course).unwrap());
        // Idempotent on an unchanged record.
        assert!(verify(&certificate, &student, &course).unwrap());

        certificate.issue_date = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
        assert!(!verify(&certificate, &student, &course).unwrap());
    }

    #[test]
    fn verify_surfaces_a_missing_signature_as_integrity_error() {
        let (certificate, student, course) = fixture();
        assert!(matches!(
            verify(&certificate, &student, &course).unwrap_err(),
            Error::Integrity(_)
        ));
    }
}
