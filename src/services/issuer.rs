// src/services/issuer.rs
//! Certificate Issuer Service
//!
//! This module owns the certificate lifecycle: issuance, status
//! transitions, administrative updates, and deletion.
//!
//! Issuance is a single atomic write. The creation timestamp is
//! captured before the insert, the signature is computed over the fully
//! assembled record (including that timestamp), and the record reaches
//! the store already signed, so a certificate can never be observed
//! without its signature. The storage uniqueness constraint on
//! `unique_code` remains the final arbiter of code allocation; a
//! conflict triggers a bounded retry of allocation + insert.

use std::sync::Arc;

use crate::error::{Error, Result};
use crate::models::certificate::{Certificate, CertificateStatus, CertificateUpdate};
use crate::services::allocator::{IdentifierAllocator, UuidAllocator};
use crate::services::signature;
use crate::storage::repository::Repository;
use chrono::{NaiveDate, Utc};
use uuid::Uuid;

/// Upper bound on allocation + insert attempts before the collision is
/// reported as a fatal conflict.
const MAX_CODE_ATTEMPTS: usize = 3;

/// Fields a caller supplies to issue a certificate.
///
/// Everything else on the record (`id`, `unique_code`, `signature`,
/// timestamps) is server-assigned.
#[derive(Debug, Clone)]
pub struct IssueRequest {
    pub student_id: Uuid,
    pub course_id: Uuid,
    pub issue_date: NaiveDate,
    pub expiry_date: Option<NaiveDate>,
    /// Initial status; defaults to `active` when absent
    pub status: Option<CertificateStatus>,
}

/// Explicit acting-user context for operations that record an issuer.
///
/// Passed as a parameter rather than read from ambient state; the
/// caller (normally the HTTP layer, after external authorization) is
/// responsible for populating it.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    pub user_id: Option<Uuid>,
}

/// Service for managing the certificate lifecycle.
pub struct CertificateIssuer {
    repository: Arc<dyn Repository>,
    allocator: Arc<dyn IdentifierAllocator>,
}

impl CertificateIssuer {
    /// Creates a new issuer backed by the given repository and the
    /// default UUID code allocator.
    pub fn new(repository: Arc<dyn Repository>) -> Self {
        Self::with_allocator(repository, Arc::new(UuidAllocator))
    }

    /// Creates an issuer with an explicit allocator.
    pub fn with_allocator(
        repository: Arc<dyn Repository>,
        allocator: Arc<dyn IdentifierAllocator>,
    ) -> Self {
        CertificateIssuer {
            repository,
            allocator,
        }
    }

    /// Issues a new certificate.
    ///
    /// # Arguments
    /// * `request` - Caller-supplied certificate fields
    /// * `context` - Acting-user context; `user_id` is recorded as the
    ///   issuing user
    ///
    /// # Errors
    /// - `NotFound` if the student or course reference does not resolve
    /// - `Conflict` if a unique code could not be allocated within the
    ///   retry bound, or on any non-code uniqueness violation
    ///
    /// # Process Flow
    /// 1. Resolve the student and course references
    /// 2. Allocate a `unique_code`
    /// 3. Assemble the record with its creation timestamp
    /// 4. Compute the signature over the canonical field set
    /// 5. Persist the signed record in one write; on a code collision,
    ///    reallocate and retry
    pub fn create(&self, request: IssueRequest, context: &RequestContext) -> Result<Certificate> {
        let student = self.repository.student(request.student_id)?;
        let course = self.repository.course(request.course_id)?;

        for attempt in 1..=MAX_CODE_ATTEMPTS {
            let now = Utc::now();
            let mut certificate = Certificate {
                id: Uuid::new_v4(),
                student_id: student.id,
                course_id: course.id,
                issue_date: request.issue_date,
                expiry_date: request.expiry_date,
                unique_code: self.allocator.allocate(),
                signature: None,
                status: request.status.unwrap_or(CertificateStatus::Active),
                created_by: context.user_id,
                created_at: now,
                updated_at: now,
            };
            certificate.signature = Some(signature::digest(&certificate, &student, &course)?);

            match self.repository.insert_certificate(certificate) {
                Ok(stored) => {
                    log::info!(
                        "issued certificate {} for student {} ({})",
                        stored.id,
                        student.student_id,
                        course.name
                    );
                    return Ok(stored);
                }
                Err(Error::Conflict {
                    field: "unique_code",
                    ..
                }) => {
                    log::warn!(
                        "unique code collision on attempt {}, reallocating",
                        attempt
                    );
                }
                Err(err) => return Err(err),
            }
        }

        Err(Error::conflict(
            "unique_code",
            format!(
                "could not allocate a unique code after {} attempts",
                MAX_CODE_ATTEMPTS
            ),
        ))
    }

    /// Transitions a certificate to a new status.
    ///
    /// The status enumeration is closed at the type level; anything the
    /// HTTP layer could not parse never reaches this method. Neither
    /// `signature` nor `unique_code` is touched.
    pub fn transition_status(
        &self,
        certificate_id: Uuid,
        new_status: CertificateStatus,
    ) -> Result<Certificate> {
        let updated = self.repository.update_certificate(
            certificate_id,
            CertificateUpdate {
                status: Some(new_status),
                ..Default::default()
            },
        )?;
        log::info!("certificate {} transitioned to {}", certificate_id, new_status);
        Ok(updated)
    }

    /// Applies an administrative update to a certificate.
    ///
    /// Only `issue_date`, `expiry_date`, and `status` are mutable;
    /// `unique_code` and `signature` are server-controlled and frozen.
    pub fn update(&self, certificate_id: Uuid, changes: CertificateUpdate) -> Result<Certificate> {
        self.repository.update_certificate(certificate_id, changes)
    }

    /// Deletes a certificate by identity.
    pub fn delete(&self, certificate_id: Uuid) -> Result<()> {
        self.repository.delete_certificate(certificate_id)
    }

    /// Fetches a certificate by identity.
    pub fn certificate(&self, certificate_id: Uuid) -> Result<Certificate> {
        self.repository.certificate(certificate_id)
    }

    /// Lists all certificates, newest first.
    pub fn list(&self) -> Result<Vec<Certificate>> {
        self.repository.list_certificates()
    }
}
