// src/storage/repository.rs
//! Storage abstraction for the certificate system.
//!
//! The lifecycle and validation services depend on this trait rather
//! than on a concrete engine, so the same code runs against the
//! in-process store shipped with the binary and against test doubles.
//! The contract mirrors an ordinary relational store: create / read /
//! update / delete by primary key, read by unique secondary key, and
//! uniqueness enforcement with a reportable conflict error.

use crate::error::Result;
use crate::models::certificate::{Certificate, CertificateUpdate};
use crate::models::course::{Course, CourseUpdate};
use crate::models::student::{Student, StudentUpdate};
use uuid::Uuid;

/// Data access interface for students, courses, and certificates.
///
/// # Contract
/// - `insert_*` rejects duplicates on any unique field with
///   [`Error::Conflict`](crate::error::Error::Conflict) naming the field
/// - `get`-style methods fail with `NotFound` for unknown primary keys;
///   the unique-code lookup instead reports absence as `Ok(None)`
///   because absence is a normal outcome for public validation
/// - updates stamp `updated_at` and never touch creation timestamps,
///   `unique_code`, or `signature`
/// - deleting a student cascades to its certificates; deleting a course
///   that certificates still reference is a conflict
pub trait Repository: Send + Sync {
    // Students

    fn insert_student(&self, student: Student) -> Result<Student>;
    fn student(&self, id: Uuid) -> Result<Student>;
    fn update_student(&self, id: Uuid, changes: StudentUpdate) -> Result<Student>;
    fn delete_student(&self, id: Uuid) -> Result<()>;
    fn list_students(&self) -> Result<Vec<Student>>;

    // Courses

    fn insert_course(&self, course: Course) -> Result<Course>;
    fn course(&self, id: Uuid) -> Result<Course>;
    fn update_course(&self, id: Uuid, changes: CourseUpdate) -> Result<Course>;
    fn delete_course(&self, id: Uuid) -> Result<()>;
    fn list_courses(&self) -> Result<Vec<Course>>;

    // Certificates

    fn insert_certificate(&self, certificate: Certificate) -> Result<Certificate>;
    fn certificate(&self, id: Uuid) -> Result<Certificate>;

    /// Looks a certificate up by its public `unique_code`.
    ///
    /// Returns `Ok(None)` when no certificate carries the code.
    fn certificate_by_code(&self, code: &str) -> Result<Option<Certificate>>;

    fn update_certificate(&self, id: Uuid, changes: CertificateUpdate) -> Result<Certificate>;
    fn delete_certificate(&self, id: Uuid) -> Result<()>;
    fn list_certificates(&self) -> Result<Vec<Certificate>>;
}
