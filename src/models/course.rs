// src/models/course.rs
//! Course data model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A course a certificate can attest completion of.
///
/// Courses are referenced, never owned, by certificates: a course with
/// dependent certificates cannot be deleted.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Course {
    pub id: Uuid,

    /// Course name as it appears on issued certificates
    /// Example: "Python Programming"
    pub name: String,

    pub description: Option<String>,

    /// Duration in weeks or hours, per deployment convention
    pub duration: i32,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Mutable fields accepted by a course update.
#[derive(Debug, Clone, Default)]
pub struct CourseUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub duration: Option<i32>,
}
