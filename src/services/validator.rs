// src/services/validator.rs
//! Certificate validation service.
//!
//! Resolves a public certificate code to a full record and reports
//! validity, so third parties scanning a QR code can check a
//! certificate without knowing the signature scheme. Validity is read
//! from `status` alone; a caller wanting tamper detection additionally
//! invokes [`verify_signature`](CertificateValidator::verify_signature),
//! which re-derives the digest from current canonical fields.

use std::sync::Arc;

use crate::error::{Error, Result};
use crate::models::certificate::{Certificate, CertificateStatus};
use crate::models::course::Course;
use crate::models::student::Student;
use crate::services::signature;
use crate::storage::repository::Repository;
use uuid::Uuid;

/// Outcome message for a certificate in `active` status.
pub const VALID_MESSAGE: &str = "Certificate is valid";
/// Outcome message for a found certificate in any other status.
pub const NOT_VALID_MESSAGE: &str = "Certificate is not valid";
/// Outcome message when no certificate carries the code.
pub const NOT_FOUND_MESSAGE: &str = "Certificate not found";

/// A certificate with its student and course references expanded.
#[derive(Debug, Clone)]
pub struct CertificateDetails {
    pub certificate: Certificate,
    pub student: Student,
    pub course: Course,
}

/// Result of a validation lookup.
///
/// Absence of a certificate is a normal negative outcome, not an
/// error: `found` and `is_valid` are both false and `certificate` is
/// absent.
#[derive(Debug, Clone)]
pub struct ValidationOutcome {
    pub unique_code: String,
    pub found: bool,
    pub is_valid: bool,
    pub certificate: Option<CertificateDetails>,
    pub message: String,
}

/// Service answering public validation and verification queries.
pub struct CertificateValidator {
    repository: Arc<dyn Repository>,
}

impl CertificateValidator {
    /// Creates a new validator backed by the given repository.
    pub fn new(repository: Arc<dyn Repository>) -> Self {
        CertificateValidator { repository }
    }

    /// Validates a certificate by its public code.
    ///
    /// # Arguments
    /// * `code` - The opaque `unique_code` printed into the QR code
    ///
    /// # Returns
    /// A [`ValidationOutcome`]; an unknown code yields a negative
    /// outcome rather than an error. Validity is `status == active`,
    /// with the certificate returned fully expanded when found.
    ///
    /// # Errors
    /// - `Integrity` if the resolved certificate has no signature, or
    ///   if its student/course reference dangles (cascade rules make
    ///   either one storage corruption)
    pub fn validate_by_code(&self, code: &str) -> Result<ValidationOutcome> {
        let Some(certificate) = self.repository.certificate_by_code(code)? else {
            return Ok(ValidationOutcome {
                unique_code: code.to_string(),
                found: false,
                is_valid: false,
                certificate: None,
                message: NOT_FOUND_MESSAGE.to_string(),
            });
        };

        if certificate
            .signature
            .as_deref()
            .map_or(true, str::is_empty)
        {
            return Err(Error::Integrity(format!(
                "certificate {} is persisted without a signature",
                certificate.id
            )));
        }

        let details = self.expand(certificate)?;
        let is_valid = details.certificate.status == CertificateStatus::Active;
        let message = if is_valid {
            VALID_MESSAGE
        } else {
            NOT_VALID_MESSAGE
        };

        Ok(ValidationOutcome {
            unique_code: details.certificate.unique_code.clone(),
            found: true,
            is_valid,
            certificate: Some(details),
            message: message.to_string(),
        })
    }

    /// Re-verifies a certificate's signature against its current
    /// canonical fields.
    ///
    /// # Returns
    /// - `Ok(true)` if the stored signature still matches
    /// - `Ok(false)` if any signature-relevant field was tampered with
    ///
    /// # Errors
    /// - `NotFound` for an unknown certificate identity
    /// - `Integrity` if the certificate has no stored signature
    pub fn verify_signature(&self, certificate_id: Uuid) -> Result<bool> {
        let certificate = self.repository.certificate(certificate_id)?;
        let details = self.expand(certificate)?;
        signature::verify(&details.certificate, &details.student, &details.course)
    }

    fn expand(&self, certificate: Certificate) -> Result<CertificateDetails> {
        let student = self
            .repository
            .student(certificate.student_id)
            .map_err(|_| dangling(&certificate, "student"))?;
        let course = self
            .repository
            .course(certificate.course_id)
            .map_err(|_| dangling(&certificate, "course"))?;
        Ok(CertificateDetails {
            certificate,
            student,
            course,
        })
    }
}

fn dangling(certificate: &Certificate, entity: &str) -> Error {
    Error::Integrity(format!(
        "certificate {} references a missing {}",
        certificate.id, entity
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::student::Student;
    use crate::services::issuer::{CertificateIssuer, IssueRequest, RequestContext};
    use crate::storage::memory::MemoryStore;
    use chrono::{NaiveDate, Utc};

    fn setup() -> (CertificateIssuer, CertificateValidator, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        let issuer = CertificateIssuer::new(store.clone());
        let validator = CertificateValidator::new(store.clone());
        (issuer, validator, store)
    }

    fn seed_student(store: &MemoryStore) -> Student {
        let now = Utc::now();
        store
            .insert_student(Student {
                id: Uuid::new_v4(),
                student_id: "STU001".to_string(),
                first_name: "John".to_string(),
                last_name: "Doe".to_string(),
                email: None,
                date_of_birth: None,
                created_at: now,
                updated_at: now,
            })
            .unwrap()
    }

    fn seed_course(store: &MemoryStore) -> Course {
        let now = Utc::now();
        store
            .insert_course(Course {
                id: Uuid::new_v4(),
                name: "Python Programming".to_string(),
                description: None,
                duration: 10,
                created_at: now,
                updated_at: now,
            })
            .unwrap()
    }

    fn issue(issuer: &CertificateIssuer, student: &Student, course: &Course) -> Certificate {
        issuer
            .create(
                IssueRequest {
                    student_id: student.id,
                    course_id: course.id,
                    issue_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                    expiry_date: None,
                    status: None,
                },
                &RequestContext::default(),
            )
            .unwrap()
    }

    #[test]
    fn active_certificate_validates_and_revocation_flips_the_outcome() {
        let (issuer, validator, store) = setup();
        let student = seed_student(&store);
        let course = seed_course(&store);
        let certificate = issue(&issuer, &student, &course);

        let outcome = validator.validate_by_code(&certificate.unique_code).unwrap();
        assert!(outcome.found);
        assert!(outcome.is_valid);
        assert_eq!(outcome.message, VALID_MESSAGE);
        let details = outcome.certificate.unwrap();
        assert_eq!(details.student.full_name(), "John Doe");
        assert_eq!(details.course.name, "Python Programming");

        issuer
            .transition_status(certificate.id, CertificateStatus::Revoked)
            .unwrap();

        let outcome = validator.validate_by_code(&certificate.unique_code).unwrap();
        assert!(outcome.found);
        assert!(!outcome.is_valid);
        assert_eq!(outcome.message, NOT_VALID_MESSAGE);
    }

    #[test]
    fn unknown_code_is_a_negative_outcome_not_an_error() {
        let (_, validator, _) = setup();

        let outcome = validator.validate_by_code("does-not-exist").unwrap();
        assert!(!outcome.found);
        assert!(!outcome.is_valid);
        assert!(outcome.certificate.is_none());
        assert_eq!(outcome.message, NOT_FOUND_MESSAGE);
    }

    #[test]
    fn validation_is_read_only() {
        let (issuer, validator, store) = setup();
        let student = seed_student(&store);
        let course = seed_course(&store);
        let certificate = issue(&issuer, &student, &course);

        validator.validate_by_code(&certificate.unique_code).unwrap();
        let reloaded = store.certificate(certificate.id).unwrap();
        assert_eq!(reloaded.updated_at, certificate.updated_at);
        assert_eq!(reloaded.status, certificate.status);
    }

    #[test]
    fn unsigned_certificate_is_an_integrity_error() {
        let (_, validator, store) = setup();
        let student = seed_student(&store);
        let course = seed_course(&store);
        let now = Utc::now();
        store
            .insert_certificate(Certificate {
                id: Uuid::new_v4(),
                student_id: student.id,
                course_id: course.id,
                issue_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                expiry_date: None,
                unique_code: "unsigned-code".to_string(),
                signature: None,
                status: CertificateStatus::Active,
                created_by: None,
                created_at: now,
                updated_at: now,
            })
            .unwrap();

        assert!(matches!(
            validator.validate_by_code("unsigned-code").unwrap_err(),
            Error::Integrity(_)
        ));
    }

    #[test]
    fn verify_signature_detects_date_tampering() {
        let (issuer, validator, store) = setup();
        let student = seed_student(&store);
        let course = seed_course(&store);
        let certificate = issue(&issuer, &student, &course);

        assert!(validator.verify_signature(certificate.id).unwrap());

        // Status transitions are excluded from the canonical fields.
        issuer
            .transition_status(certificate.id, CertificateStatus::Expired)
            .unwrap();
        assert!(validator.verify_signature(certificate.id).unwrap());

        // Rewriting a canonical field is detected.
        issuer
            .update(
                certificate.id,
                crate::models::certificate::CertificateUpdate {
                    issue_date: NaiveDate::from_ymd_opt(2020, 1, 1),
                    ..Default::default()
                },
            )
            .unwrap();
        assert!(!validator.verify_signature(certificate.id).unwrap());
    }
}
