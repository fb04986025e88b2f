// src/models/student.rs
//! Student data model.
//!
//! A student is the subject a certificate is issued to. Students own
//! their certificates: deleting a student removes every certificate
//! that references it.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A student eligible to receive certificates.
///
/// # Fields
/// - `id`: Opaque primary identifier, assigned at creation
/// - `student_id`: Externally meaningful identifier (e.g. an enrollment
///   number), unique across all students
/// - `first_name` / `last_name`: Legal name components
/// - `email`: Optional contact address
/// - `date_of_birth`: Optional calendar date
/// - `created_at` / `updated_at`: Server-assigned timestamps
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Student {
    pub id: Uuid,

    /// Unique identifier for the student
    /// Example: "STU001"
    pub student_id: String,

    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Student {
    /// Returns the student's full name.
    ///
    /// Computed on demand from the name components; never stored. This
    /// value enters the certificate signature payload, so renaming a
    /// student breaks verification of previously issued certificates.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Mutable fields accepted by a student update.
///
/// `None` leaves the corresponding field untouched. The primary `id`
/// and both timestamps are server-controlled and never accepted.
#[derive(Debug, Clone, Default)]
pub struct StudentUpdate {
    pub student_id: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
}
