// src/storage/memory.rs
//! In-process implementation of the [`Repository`] trait.
//!
//! Backed by mutex-guarded hashmaps, one per entity, with O(1) average
//! case primary-key access. Unique secondary fields (`student_id`,
//! `unique_code`, `signature`) are enforced at insert/update time with
//! the same reportable conflict errors a relational store would raise.
//!
//! This store is the shipped binding for local deployments and doubles
//! as the test store for the services layer.

use std::collections::HashMap;
use std::sync::Mutex;

use crate::error::{Error, Result};
use crate::models::certificate::{Certificate, CertificateUpdate};
use crate::models::course::{Course, CourseUpdate};
use crate::models::student::{Student, StudentUpdate};
use crate::storage::repository::Repository;
use chrono::Utc;
use uuid::Uuid;

#[derive(Default)]
struct Tables {
    students: HashMap<Uuid, Student>,
    courses: HashMap<Uuid, Course>,
    certificates: HashMap<Uuid, Certificate>,
}

/// In-memory store for students, courses, and certificates.
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    /// Creates a new empty store.
    pub fn new() -> Self {
        MemoryStore {
            tables: Mutex::new(Tables::default()),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl Repository for MemoryStore {
    fn insert_student(&self, student: Student) -> Result<Student> {
        let mut tables = self.tables.lock().unwrap();
        if tables.students.contains_key(&student.id) {
            return Err(Error::conflict("id", student.id));
        }
        if tables
            .students
            .values()
            .any(|s| s.student_id == student.student_id)
        {
            return Err(Error::conflict("student_id", &student.student_id));
        }
        tables.students.insert(student.id, student.clone());
        Ok(student)
    }

    fn student(&self, id: Uuid) -> Result<Student> {
        let tables = self.tables.lock().unwrap();
        tables
            .students
            .get(&id)
            .cloned()
            .ok_or_else(|| Error::not_found("student", id))
    }

    fn update_student(&self, id: Uuid, changes: StudentUpdate) -> Result<Student> {
        let mut tables = self.tables.lock().unwrap();
        if let Some(new_student_id) = &changes.student_id {
            if tables
                .students
                .values()
                .any(|s| s.id != id && s.student_id == *new_student_id)
            {
                return Err(Error::conflict("student_id", new_student_id));
            }
        }
        let student = tables
            .students
            .get_mut(&id)
            .ok_or_else(|| Error::not_found("student", id))?;
        if let Some(student_id) = changes.student_id {
            student.student_id = student_id;
        }
        if let Some(first_name) = changes.first_name {
            student.first_name = first_name;
        }
        if let Some(last_name) = changes.last_name {
            student.last_name = last_name;
        }
        if let Some(email) = changes.email {
            student.email = Some(email);
        }
        if let Some(date_of_birth) = changes.date_of_birth {
            student.date_of_birth = Some(date_of_birth);
        }
        student.updated_at = Utc::now();
        Ok(student.clone())
    }

    fn delete_student(&self, id: Uuid) -> Result<()> {
        let mut tables = self.tables.lock().unwrap();
        if tables.students.remove(&id).is_none() {
            return Err(Error::not_found("student", id));
        }
        // Students own their certificates: deletion cascades.
        tables.certificates.retain(|_, c| c.student_id != id);
        Ok(())
    }

    fn list_students(&self) -> Result<Vec<Student>> {
        let tables = self.tables.lock().unwrap();
        let mut students: Vec<Student> = tables.students.values().cloned().collect();
        students.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(students)
    }

    fn insert_course(&self, course: Course) -> Result<Course> {
        let mut tables = self.tables.lock().unwrap();
        if tables.courses.contains_key(&course.id) {
            return Err(Error::conflict("id", course.id));
        }
        tables.courses.insert(course.id, course.clone());
        Ok(course)
    }

    fn course(&self, id: Uuid) -> Result<Course> {
        let tables = self.tables.lock().unwrap();
        tables
            .courses
            .get(&id)
            .cloned()
            .ok_or_else(|| Error::not_found("course", id))
    }

    fn update_course(&self, id: Uuid, changes: CourseUpdate) -> Result<Course> {
        let mut tables = self.tables.lock().unwrap();
        let course = tables
            .courses
            .get_mut(&id)
            .ok_or_else(|| Error::not_found("course", id))?;
        if let Some(name) = changes.name {
            course.name = name;
        }
        if let Some(description) = changes.description {
            course.description = Some(description);
        }
        if let Some(duration) = changes.duration {
            course.duration = duration;
        }
        course.updated_at = Utc::now();
        Ok(course.clone())
    }

    fn delete_course(&self, id: Uuid) -> Result<()> {
        let mut tables = self.tables.lock().unwrap();
        if !tables.courses.contains_key(&id) {
            return Err(Error::not_found("course", id));
        }
        // Courses are referenced, never owned, by certificates.
        if tables.certificates.values().any(|c| c.course_id == id) {
            return Err(Error::conflict("course_id", id));
        }
        tables.courses.remove(&id);
        Ok(())
    }

    fn list_courses(&self) -> Result<Vec<Course>> {
        let tables = self.tables.lock().unwrap();
        let mut courses: Vec<Course> = tables.courses.values().cloned().collect();
        courses.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(courses)
    }

    fn insert_certificate(&self, certificate: Certificate) -> Result<Certificate> {
        let mut tables = self.tables.lock().unwrap();
        if tables.certificates.contains_key(&certificate.id) {
            return Err(Error::conflict("id", certificate.id));
        }
        if tables
            .certificates
            .values()
            .any(|c| c.unique_code == certificate.unique_code)
        {
            return Err(Error::conflict("unique_code", &certificate.unique_code));
        }
        if let Some(signature) = &certificate.signature {
            if tables
                .certificates
                .values()
                .any(|c| c.signature.as_deref() == Some(signature.as_str()))
            {
                return Err(Error::conflict("signature", signature));
            }
        }
        tables
            .certificates
            .insert(certificate.id, certificate.clone());
        Ok(certificate)
    }

    fn certificate(&self, id: Uuid) -> Result<Certificate> {
        let tables = self.tables.lock().unwrap();
        tables
            .certificates
            .get(&id)
            .cloned()
            .ok_or_else(|| Error::not_found("certificate", id))
    }

    fn certificate_by_code(&self, code: &str) -> Result<Option<Certificate>> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .certificates
            .values()
            .find(|c| c.unique_code == code)
            .cloned())
    }

    fn update_certificate(&self, id: Uuid, changes: CertificateUpdate) -> Result<Certificate> {
        let mut tables = self.tables.lock().unwrap();
        let certificate = tables
            .certificates
            .get_mut(&id)
            .ok_or_else(|| Error::not_found("certificate", id))?;
        if let Some(issue_date) = changes.issue_date {
            certificate.issue_date = issue_date;
        }
        if let Some(expiry_date) = changes.expiry_date {
            certificate.expiry_date = Some(expiry_date);
        }
        if let Some(status) = changes.status {
            certificate.status = status;
        }
        certificate.updated_at = Utc::now();
        Ok(certificate.clone())
    }

    fn delete_certificate(&self, id: Uuid) -> Result<()> {
        let mut tables = self.tables.lock().unwrap();
        tables
            .certificates
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| Error::not_found("certificate", id))
    }

    fn list_certificates(&self) -> Result<Vec<Certificate>> {
        let tables = self.tables.lock().unwrap();
        let mut certificates: Vec<Certificate> =
            tables.certificates.values().cloned().collect();
        certificates.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(certificates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::certificate::CertificateStatus;
    use chrono::NaiveDate;

    fn sample_student(student_id: &str) -> Student {
        let now = Utc::now();
        Student {
            id: Uuid::new_v4(),
            student_id: student_id.to_string(),
            first_name: "John".to_string(),
            last_name: "Doe".to_string(),
            email: None,
            date_of_birth: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn sample_course(name: &str) -> Course {
        let now = Utc::now();
        Course {
            id: Uuid::new_v4(),
            name: name.to_string(),
            description: None,
            duration: 10,
            created_at: now,
            updated_at: now,
        }
    }

    fn sample_certificate(student_id: Uuid, course_id: Uuid, code: &str) -> Certificate {
        let now = Utc::now();
        Certificate {
            id: Uuid::new_v4(),
            student_id,
            course_id,
            issue_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            expiry_date: None,
            unique_code: code.to_string(),
            signature: Some(format!("{:0>64}", code)),
            status: CertificateStatus::Active,
            created_by: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn duplicate_student_id_is_a_conflict() {
        let store = MemoryStore::new();
        store.insert_student(sample_student("STU001")).unwrap();

        let err = store.insert_student(sample_student("STU001")).unwrap_err();
        assert!(matches!(
            err,
            Error::Conflict {
                field: "student_id",
                ..
            }
        ));
    }

    #[test]
    fn duplicate_unique_code_is_a_conflict() {
        let store = MemoryStore::new();
        let student = store.insert_student(sample_student("STU001")).unwrap();
        let course = store.insert_course(sample_course("Python Programming")).unwrap();
        store
            .insert_certificate(sample_certificate(student.id, course.id, "code-1"))
            .unwrap();

        let mut duplicate = sample_certificate(student.id, course.id, "code-1");
        duplicate.signature = Some(format!("{:0>64}", "other"));
        let err = store.insert_certificate(duplicate).unwrap_err();
        assert!(matches!(
            err,
            Error::Conflict {
                field: "unique_code",
                ..
            }
        ));
    }

    #[test]
    fn deleting_a_student_cascades_to_certificates() {
        let store = MemoryStore::new();
        let student = store.insert_student(sample_student("STU001")).unwrap();
        let course = store.insert_course(sample_course("Python Programming")).unwrap();
        let certificate = store
            .insert_certificate(sample_certificate(student.id, course.id, "code-1"))
            .unwrap();

        store.delete_student(student.id).unwrap();

        assert!(matches!(
            store.certificate(certificate.id).unwrap_err(),
            Error::NotFound { .. }
        ));
        // The course is untouched by the cascade.
        assert!(store.course(course.id).is_ok());
    }

    #[test]
    fn deleting_a_referenced_course_is_a_conflict() {
        let store = MemoryStore::new();
        let student = store.insert_student(sample_student("STU001")).unwrap();
        let course = store.insert_course(sample_course("Python Programming")).unwrap();
        store
            .insert_certificate(sample_certificate(student.id, course.id, "code-1"))
            .unwrap();

        assert!(matches!(
            store.delete_course(course.id).unwrap_err(),
            Error::Conflict {
                field: "course_id",
                ..
            }
        ));
    }

    #[test]
    fn certificate_lookup_by_code_reports_absence_as_none() {
        let store = MemoryStore::new();
        assert!(store.certificate_by_code("does-not-exist").unwrap().is_none());
    }

    #[test]
    fn update_refreshes_updated_at_but_not_created_at() {
        let store = MemoryStore::new();
        let student = store.insert_student(sample_student("STU001")).unwrap();

        let updated = store
            .update_student(
                student.id,
                StudentUpdate {
                    email: Some("john.doe@example.com".to_string()),
                    ..Default::default()
                },
            )
            .unwrap();

        assert_eq!(updated.created_at, student.created_at);
        assert!(updated.updated_at >= student.updated_at);
        assert_eq!(updated.email.as_deref(), Some("john.doe@example.com"));
    }

    #[test]
    fn student_id_update_checks_uniqueness_against_other_students() {
        let store = MemoryStore::new();
        store.insert_student(sample_student("STU001")).unwrap();
        let other = store.insert_student(sample_student("STU002")).unwrap();

        let err = store
            .update_student(
                other.id,
                StudentUpdate {
                    student_id: Some("STU001".to_string()),
                    ..Default::default()
                },
            )
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Conflict {
                field: "student_id",
                ..
            }
        ));

        // Re-asserting the current value is not a conflict.
        store
            .update_student(
                other.id,
                StudentUpdate {
                    student_id: Some("STU002".to_string()),
                    ..Default::default()
                },
            )
            .unwrap();
    }
}
