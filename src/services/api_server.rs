// src/services/api_server.rs
//! API Server for the Certificate System
//!
//! This module provides the REST API interface for the certificate
//! system, including student and course administration, certificate
//! issuance and lifecycle management, public validation lookups, and
//! QR code generation.
//!
//! The API is built using Axum and includes endpoints for:
//! - Student CRUD
//! - Course CRUD
//! - Certificate issuance, update, deletion, and status transitions
//! - Public certificate validation by unique code
//! - Signature re-verification (tamper detection)
//! - QR code assets linking to the public validation endpoint
//!
//! Authorization is handled outside this module; handlers receive the
//! acting user, when one is relevant, as an explicit `x-user-id`
//! header and pass it down as a request context value.

use std::net::SocketAddr;
use std::str::FromStr;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::models::certificate::{Certificate, CertificateStatus, CertificateUpdate};
use crate::models::course::{Course, CourseUpdate};
use crate::models::student::{Student, StudentUpdate};
use crate::services::issuer::{CertificateIssuer, IssueRequest, RequestContext};
use crate::services::validator::{CertificateValidator, ValidationOutcome};
use crate::storage::repository::Repository;
use crate::utils::qr::{validation_url, QrRenderer};
use axum::{
    extract::{Json, Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    routing::post,
    Router,
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use uuid::Uuid;

// API request and response structures

/// Error body returned for every failed request.
#[derive(Serialize, Deserialize)]
struct ErrorResponse {
    error: String,
}

/// Request payload for registering a student
#[derive(Serialize, Deserialize)]
struct CreateStudentRequest {
    student_id: String,
    first_name: String,
    last_name: String,
    email: Option<String>,
    date_of_birth: Option<NaiveDate>,
}

/// Request payload for updating a student
#[derive(Serialize, Deserialize, Default)]
struct UpdateStudentRequest {
    student_id: Option<String>,
    first_name: Option<String>,
    last_name: Option<String>,
    email: Option<String>,
    date_of_birth: Option<NaiveDate>,
}

/// Full student representation
#[derive(Serialize, Deserialize)]
struct StudentResponse {
    id: Uuid,
    student_id: String,
    first_name: String,
    last_name: String,
    full_name: String,
    email: Option<String>,
    date_of_birth: Option<NaiveDate>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<Student> for StudentResponse {
    fn from(student: Student) -> Self {
        StudentResponse {
            id: student.id,
            full_name: student.full_name(),
            student_id: student.student_id,
            first_name: student.first_name,
            last_name: student.last_name,
            email: student.email,
            date_of_birth: student.date_of_birth,
            created_at: student.created_at,
            updated_at: student.updated_at,
        }
    }
}

/// Request payload for creating a course
#[derive(Serialize, Deserialize)]
struct CreateCourseRequest {
    name: String,
    description: Option<String>,
    duration: i32,
}

/// Request payload for updating a course
#[derive(Serialize, Deserialize, Default)]
struct UpdateCourseRequest {
    name: Option<String>,
    description: Option<String>,
    duration: Option<i32>,
}

/// Full course representation
#[derive(Serialize, Deserialize)]
struct CourseResponse {
    id: Uuid,
    name: String,
    description: Option<String>,
    duration: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<Course> for CourseResponse {
    fn from(course: Course) -> Self {
        CourseResponse {
            id: course.id,
            name: course.name,
            description: course.description,
            duration: course.duration,
            created_at: course.created_at,
            updated_at: course.updated_at,
        }
    }
}

/// Request payload for issuing a certificate
#[derive(Serialize, Deserialize)]
struct CreateCertificateRequest {
    student_id: Uuid,
    course_id: Uuid,
    issue_date: NaiveDate,
    expiry_date: Option<NaiveDate>,
    /// Initial status; defaults to "active"
    status: Option<String>,
}

/// Request payload for updating a certificate
///
/// `unique_code` and `signature` are server-controlled and deliberately
/// not accepted here.
#[derive(Serialize, Deserialize, Default)]
struct UpdateCertificateRequest {
    issue_date: Option<NaiveDate>,
    expiry_date: Option<NaiveDate>,
    status: Option<String>,
}

/// Full certificate representation, including the server-assigned
/// `unique_code` and `signature`
#[derive(Serialize, Deserialize)]
struct CertificateResponse {
    id: Uuid,
    student_id: Uuid,
    course_id: Uuid,
    issue_date: NaiveDate,
    expiry_date: Option<NaiveDate>,
    unique_code: String,
    signature: Option<String>,
    status: CertificateStatus,
    created_by: Option<Uuid>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<Certificate> for CertificateResponse {
    fn from(certificate: Certificate) -> Self {
        CertificateResponse {
            id: certificate.id,
            student_id: certificate.student_id,
            course_id: certificate.course_id,
            issue_date: certificate.issue_date,
            expiry_date: certificate.expiry_date,
            unique_code: certificate.unique_code,
            signature: certificate.signature,
            status: certificate.status,
            created_by: certificate.created_by,
            created_at: certificate.created_at,
            updated_at: certificate.updated_at,
        }
    }
}

/// Request payload for validating a certificate by its public code
#[derive(Serialize, Deserialize)]
struct ValidateCertificateRequest {
    unique_code: String,
}

/// Query parameters accepted by the GET validation endpoint (the form
/// a scanned QR code resolves to)
#[derive(Serialize, Deserialize)]
struct ValidateCertificateQuery {
    code: String,
}

/// A validated certificate with student and course expanded
#[derive(Serialize, Deserialize)]
struct ValidatedCertificateResponse {
    id: Uuid,
    student: StudentResponse,
    course: CourseResponse,
    issue_date: NaiveDate,
    expiry_date: Option<NaiveDate>,
    unique_code: String,
    status: CertificateStatus,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Response for the public validation endpoint
#[derive(Serialize, Deserialize)]
struct ValidationResponse {
    unique_code: String,
    found: bool,
    is_valid: bool,
    certificate: Option<ValidatedCertificateResponse>,
    message: String,
}

impl From<ValidationOutcome> for ValidationResponse {
    fn from(outcome: ValidationOutcome) -> Self {
        ValidationResponse {
            unique_code: outcome.unique_code,
            found: outcome.found,
            is_valid: outcome.is_valid,
            certificate: outcome.certificate.map(|details| ValidatedCertificateResponse {
                id: details.certificate.id,
                student: StudentResponse::from(details.student),
                course: CourseResponse::from(details.course),
                issue_date: details.certificate.issue_date,
                expiry_date: details.certificate.expiry_date,
                unique_code: details.certificate.unique_code,
                status: details.certificate.status,
                created_at: details.certificate.created_at,
                updated_at: details.certificate.updated_at,
            }),
            message: outcome.message,
        }
    }
}

/// Response for signature re-verification
#[derive(Serialize, Deserialize)]
struct VerifySignatureResponse {
    certificate_id: Uuid,
    is_authentic: bool,
}

/// API server state containing all service dependencies
pub struct ApiServer {
    /// Service for certificate issuance and lifecycle management
    issuer: Arc<CertificateIssuer>,

    /// Service for public validation and signature re-verification
    validator: Arc<CertificateValidator>,

    /// Data access for student and course administration
    repository: Arc<dyn Repository>,

    /// Renderer turning validation URLs into QR code images
    qr_renderer: Arc<dyn QrRenderer>,

    /// Externally reachable base URL embedded into QR codes
    base_url: String,
}

impl ApiServer {
    /// Creates a new instance of the API server
    ///
    /// # Arguments
    /// * `issuer` - Service for certificate lifecycle operations
    /// * `validator` - Service for validation and verification
    /// * `repository` - Data access for students and courses
    /// * `qr_renderer` - QR image rendering collaborator
    /// * `base_url` - Base URL for validation links in QR codes
    pub fn new(
        issuer: CertificateIssuer,
        validator: CertificateValidator,
        repository: Arc<dyn Repository>,
        qr_renderer: Arc<dyn QrRenderer>,
        base_url: String,
    ) -> Self {
        ApiServer {
            issuer: Arc::new(issuer),
            validator: Arc::new(validator),
            repository,
            qr_renderer,
            base_url,
        }
    }

    /// Starts the API server and begins listening for requests
    ///
    /// # Arguments
    /// * `addr` - Socket address to bind to (e.g., "127.0.0.1:3000")
    pub async fn run(&self, addr: SocketAddr) -> std::io::Result<()> {
        // Configure all API routes
        let app = Router::new()
            .route(
                "/students",
                post(Self::create_student_handler).get(Self::list_students_handler),
            )
            .route(
                "/students/:id",
                get(Self::get_student_handler)
                    .put(Self::update_student_handler)
                    .delete(Self::delete_student_handler),
            )
            .route(
                "/courses",
                post(Self::create_course_handler).get(Self::list_courses_handler),
            )
            .route(
                "/courses/:id",
                get(Self::get_course_handler)
                    .put(Self::update_course_handler)
                    .delete(Self::delete_course_handler),
            )
            .route(
                "/certificates",
                post(Self::create_certificate_handler).get(Self::list_certificates_handler),
            )
            .route(
                "/certificates/validate",
                post(Self::validate_certificate_handler).get(Self::validate_by_query_handler),
            )
            .route(
                "/certificates/:id",
                get(Self::get_certificate_handler)
                    .put(Self::update_certificate_handler)
                    .delete(Self::delete_certificate_handler),
            )
            .route(
                "/certificates/:id/verify",
                get(Self::verify_certificate_handler),
            )
            .route(
                "/certificates/:id/qr-code",
                get(Self::certificate_qr_code_handler),
            )
            // Validation is consumed by third-party browsers scanning QR codes
            .layer(CorsLayer::permissive())
            .with_state(Arc::new(self.clone()));

        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, app).await
    }

    // =====================
    // Student Handlers
    // =====================

    /// Registers a new student
    ///
    /// # Endpoint
    /// POST /students
    ///
    /// # Responses
    /// - 201 Created: Returns the stored student
    /// - 400 Bad Request: Missing required field
    /// - 409 Conflict: `student_id` already taken
    async fn create_student_handler(
        State(state): State<Arc<ApiServer>>,
        Json(payload): Json<CreateStudentRequest>,
    ) -> impl IntoResponse {
        if let Err(err) = require("student_id", &payload.student_id)
            .and_then(|_| require("first_name", &payload.first_name))
            .and_then(|_| require("last_name", &payload.last_name))
        {
            return error_response(err);
        }

        let now = Utc::now();
        let student = Student {
            id: Uuid::new_v4(),
            student_id: payload.student_id,
            first_name: payload.first_name,
            last_name: payload.last_name,
            email: payload.email,
            date_of_birth: payload.date_of_birth,
            created_at: now,
            updated_at: now,
        };

        match state.repository.insert_student(student) {
            Ok(stored) => {
                (StatusCode::CREATED, Json(StudentResponse::from(stored))).into_response()
            }
            Err(err) => error_response(err),
        }
    }

    async fn list_students_handler(State(state): State<Arc<ApiServer>>) -> impl IntoResponse {
        match state.repository.list_students() {
            Ok(students) => {
                let students: Vec<StudentResponse> =
                    students.into_iter().map(StudentResponse::from).collect();
                (StatusCode::OK, Json(students)).into_response()
            }
            Err(err) => error_response(err),
        }
    }

    async fn get_student_handler(
        State(state): State<Arc<ApiServer>>,
        Path(id): Path<Uuid>,
    ) -> impl IntoResponse {
        match state.repository.student(id) {
            Ok(student) => (StatusCode::OK, Json(StudentResponse::from(student))).into_response(),
            Err(err) => error_response(err),
        }
    }

    /// Updates a student
    ///
    /// # Endpoint
    /// PUT /students/:id
    ///
    /// # Responses
    /// - 200 OK: Returns the updated student
    /// - 404 Not Found: Unknown student
    /// - 409 Conflict: New `student_id` already taken
    async fn update_student_handler(
        State(state): State<Arc<ApiServer>>,
        Path(id): Path<Uuid>,
        Json(payload): Json<UpdateStudentRequest>,
    ) -> impl IntoResponse {
        let changes = StudentUpdate {
            student_id: payload.student_id,
            first_name: payload.first_name,
            last_name: payload.last_name,
            email: payload.email,
            date_of_birth: payload.date_of_birth,
        };
        match state.repository.update_student(id, changes) {
            Ok(student) => (StatusCode::OK, Json(StudentResponse::from(student))).into_response(),
            Err(err) => error_response(err),
        }
    }

    /// Deletes a student and, by cascade, every certificate issued to it
    ///
    /// # Endpoint
    /// DELETE /students/:id
    async fn delete_student_handler(
        State(state): State<Arc<ApiServer>>,
        Path(id): Path<Uuid>,
    ) -> impl IntoResponse {
        match state.repository.delete_student(id) {
            Ok(()) => StatusCode::NO_CONTENT.into_response(),
            Err(err) => error_response(err),
        }
    }

    // =====================
    // Course Handlers
    // =====================

    /// Creates a new course
    ///
    /// # Endpoint
    /// POST /courses
    ///
    /// # Responses
    /// - 201 Created: Returns the stored course
    /// - 400 Bad Request: Missing required field
    async fn create_course_handler(
        State(state): State<Arc<ApiServer>>,
        Json(payload): Json<CreateCourseRequest>,
    ) -> impl IntoResponse {
        if let Err(err) = require("name", &payload.name) {
            return error_response(err);
        }

        let now = Utc::now();
        let course = Course {
            id: Uuid::new_v4(),
            name: payload.name,
            description: payload.description,
            duration: payload.duration,
            created_at: now,
            updated_at: now,
        };

        match state.repository.insert_course(course) {
            Ok(stored) => (StatusCode::CREATED, Json(CourseResponse::from(stored))).into_response(),
            Err(err) => error_response(err),
        }
    }

    async fn list_courses_handler(State(state): State<Arc<ApiServer>>) -> impl IntoResponse {
        match state.repository.list_courses() {
            Ok(courses) => {
                let courses: Vec<CourseResponse> =
                    courses.into_iter().map(CourseResponse::from).collect();
                (StatusCode::OK, Json(courses)).into_response()
            }
            Err(err) => error_response(err),
        }
    }

    async fn get_course_handler(
        State(state): State<Arc<ApiServer>>,
        Path(id): Path<Uuid>,
    ) -> impl IntoResponse {
        match state.repository.course(id) {
            Ok(course) => (StatusCode::OK, Json(CourseResponse::from(course))).into_response(),
            Err(err) => error_response(err),
        }
    }

    async fn update_course_handler(
        State(state): State<Arc<ApiServer>>,
        Path(id): Path<Uuid>,
        Json(payload): Json<UpdateCourseRequest>,
    ) -> impl IntoResponse {
        let changes = CourseUpdate {
            name: payload.name,
            description: payload.description,
            duration: payload.duration,
        };
        match state.repository.update_course(id, changes) {
            Ok(course) => (StatusCode::OK, Json(CourseResponse::from(course))).into_response(),
            Err(err) => error_response(err),
        }
    }

    /// Deletes a course
    ///
    /// # Endpoint
    /// DELETE /courses/:id
    ///
    /// # Responses
    /// - 204 No Content: Course removed
    /// - 404 Not Found: Unknown course
    /// - 409 Conflict: Certificates still reference the course
    async fn delete_course_handler(
        State(state): State<Arc<ApiServer>>,
        Path(id): Path<Uuid>,
    ) -> impl IntoResponse {
        match state.repository.delete_course(id) {
            Ok(()) => StatusCode::NO_CONTENT.into_response(),
            Err(err) => error_response(err),
        }
    }

    // =====================
    // Certificate Handlers
    // =====================

    /// Issues a new certificate
    ///
    /// # Endpoint
    /// POST /certificates
    ///
    /// # Request Body
    /// JSON payload with student/course references and dates; the
    /// issuing user, if any, arrives in the `x-user-id` header.
    ///
    /// # Responses
    /// - 201 Created: Returns the certificate including its
    ///   server-assigned `unique_code` and `signature`
    /// - 400 Bad Request: Status outside the closed enumeration
    /// - 404 Not Found: Student or course reference does not resolve
    async fn create_certificate_handler(
        State(state): State<Arc<ApiServer>>,
        headers: HeaderMap,
        Json(payload): Json<CreateCertificateRequest>,
    ) -> impl IntoResponse {
        let context = match issuing_context(&headers) {
            Ok(context) => context,
            Err(err) => return error_response(err),
        };
        let status = match parse_status(payload.status.as_deref()) {
            Ok(status) => status,
            Err(err) => return error_response(err),
        };

        let request = IssueRequest {
            student_id: payload.student_id,
            course_id: payload.course_id,
            issue_date: payload.issue_date,
            expiry_date: payload.expiry_date,
            status,
        };

        match state.issuer.create(request, &context) {
            Ok(certificate) => {
                (StatusCode::CREATED, Json(CertificateResponse::from(certificate)))
                    .into_response()
            }
            Err(err) => error_response(err),
        }
    }

    async fn list_certificates_handler(State(state): State<Arc<ApiServer>>) -> impl IntoResponse {
        match state.issuer.list() {
            Ok(certificates) => {
                let certificates: Vec<CertificateResponse> = certificates
                    .into_iter()
                    .map(CertificateResponse::from)
                    .collect();
                (StatusCode::OK, Json(certificates)).into_response()
            }
            Err(err) => error_response(err),
        }
    }

    async fn get_certificate_handler(
        State(state): State<Arc<ApiServer>>,
        Path(id): Path<Uuid>,
    ) -> impl IntoResponse {
        match state.issuer.certificate(id) {
            Ok(certificate) => {
                (StatusCode::OK, Json(CertificateResponse::from(certificate))).into_response()
            }
            Err(err) => error_response(err),
        }
    }

    /// Updates a certificate's mutable fields
    ///
    /// # Endpoint
    /// PUT /certificates/:id
    ///
    /// # Request Body
    /// Any of `issue_date`, `expiry_date`, `status`. `unique_code` and
    /// `signature` are never accepted.
    ///
    /// # Responses
    /// - 200 OK: Returns the updated certificate
    /// - 400 Bad Request: Status outside the closed enumeration
    /// - 404 Not Found: Unknown certificate
    async fn update_certificate_handler(
        State(state): State<Arc<ApiServer>>,
        Path(id): Path<Uuid>,
        Json(payload): Json<UpdateCertificateRequest>,
    ) -> impl IntoResponse {
        let status = match parse_status(payload.status.as_deref()) {
            Ok(status) => status,
            Err(err) => return error_response(err),
        };
        let changes = CertificateUpdate {
            issue_date: payload.issue_date,
            expiry_date: payload.expiry_date,
            status,
        };
        // A status-only update is a lifecycle transition.
        let result = match changes {
            CertificateUpdate {
                issue_date: None,
                expiry_date: None,
                status: Some(new_status),
            } => state.issuer.transition_status(id, new_status),
            changes => state.issuer.update(id, changes),
        };
        match result {
            Ok(certificate) => {
                (StatusCode::OK, Json(CertificateResponse::from(certificate))).into_response()
            }
            Err(err) => error_response(err),
        }
    }

    async fn delete_certificate_handler(
        State(state): State<Arc<ApiServer>>,
        Path(id): Path<Uuid>,
    ) -> impl IntoResponse {
        match state.issuer.delete(id) {
            Ok(()) => StatusCode::NO_CONTENT.into_response(),
            Err(err) => error_response(err),
        }
    }

    // =====================
    // Validation & Verification
    // =====================

    /// Validates a certificate by its public code
    ///
    /// # Endpoint
    /// POST /certificates/validate
    ///
    /// # Responses
    /// - 200 OK: Always, for known and unknown codes alike; an unknown
    ///   code is a normal negative outcome, not an error
    /// - 500 Internal Server Error: Stored certificate violates the
    ///   signing invariant
    async fn validate_certificate_handler(
        State(state): State<Arc<ApiServer>>,
        Json(payload): Json<ValidateCertificateRequest>,
    ) -> impl IntoResponse {
        Self::validate_code(&state, &payload.unique_code)
    }

    /// Validates a certificate from a scanned QR code link
    ///
    /// # Endpoint
    /// GET /certificates/validate?code=...
    async fn validate_by_query_handler(
        State(state): State<Arc<ApiServer>>,
        Query(query): Query<ValidateCertificateQuery>,
    ) -> impl IntoResponse {
        Self::validate_code(&state, &query.code)
    }

    fn validate_code(state: &ApiServer, code: &str) -> Response {
        match state.validator.validate_by_code(code) {
            Ok(outcome) => {
                (StatusCode::OK, Json(ValidationResponse::from(outcome))).into_response()
            }
            Err(err) => error_response(err),
        }
    }

    /// Re-verifies a certificate's signature
    ///
    /// # Endpoint
    /// GET /certificates/:id/verify
    ///
    /// # Responses
    /// - 200 OK: Reports whether the stored signature still matches the
    ///   record's current canonical fields
    /// - 404 Not Found: Unknown certificate
    /// - 500 Internal Server Error: Certificate has no stored signature
    async fn verify_certificate_handler(
        State(state): State<Arc<ApiServer>>,
        Path(id): Path<Uuid>,
    ) -> impl IntoResponse {
        match state.validator.verify_signature(id) {
            Ok(is_authentic) => (
                StatusCode::OK,
                Json(VerifySignatureResponse {
                    certificate_id: id,
                    is_authentic,
                }),
            )
                .into_response(),
            Err(err) => error_response(err),
        }
    }

    /// Generates the QR code image for a certificate
    ///
    /// # Endpoint
    /// GET /certificates/:id/qr-code
    ///
    /// # Responses
    /// - 200 OK: Image byte stream encoding the public validation URL
    /// - 404 Not Found: Unknown certificate
    async fn certificate_qr_code_handler(
        State(state): State<Arc<ApiServer>>,
        Path(id): Path<Uuid>,
    ) -> impl IntoResponse {
        let certificate = match state.issuer.certificate(id) {
            Ok(certificate) => certificate,
            Err(err) => return error_response(err),
        };

        let url = validation_url(&state.base_url, &certificate.unique_code);
        match state.qr_renderer.render(&url) {
            Ok(image) => (
                StatusCode::OK,
                [
                    (
                        header::CONTENT_TYPE,
                        state.qr_renderer.content_type().to_string(),
                    ),
                    (
                        header::CONTENT_DISPOSITION,
                        format!(
                            "attachment; filename=\"certificate_{}_qrcode.{}\"",
                            certificate.id,
                            state.qr_renderer.file_extension()
                        ),
                    ),
                ],
                image,
            )
                .into_response(),
            Err(err) => error_response(err),
        }
    }
}

/// Maps a domain error onto its HTTP status and error body.
fn error_response(err: Error) -> Response {
    let status = match &err {
        Error::Validation(_) => StatusCode::BAD_REQUEST,
        Error::NotFound { .. } => StatusCode::NOT_FOUND,
        Error::Conflict { .. } => StatusCode::CONFLICT,
        Error::Integrity(_) | Error::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    if status.is_server_error() {
        log::error!("request failed: {}", err);
    }
    (
        status,
        Json(ErrorResponse {
            error: err.to_string(),
        }),
    )
        .into_response()
}

/// Rejects empty required string fields before any persistence.
fn require(field: &'static str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::Validation(format!("{} must not be empty", field)));
    }
    Ok(())
}

/// Parses an optional status string against the closed enumeration.
fn parse_status(status: Option<&str>) -> Result<Option<CertificateStatus>> {
    status.map(CertificateStatus::from_str).transpose()
}

/// Builds the acting-user context from the `x-user-id` header.
///
/// Authorization happens outside this service; the header only conveys
/// the already-authorized identity to record as the issuing user.
fn issuing_context(headers: &HeaderMap) -> Result<RequestContext> {
    let Some(value) = headers.get("x-user-id") else {
        return Ok(RequestContext::default());
    };
    let raw = value
        .to_str()
        .map_err(|_| Error::Validation("x-user-id header is not valid UTF-8".to_string()))?;
    let user_id = Uuid::parse_str(raw).map_err(|_| {
        Error::Validation(format!("x-user-id header is not a valid UUID: {}", raw))
    })?;
    Ok(RequestContext {
        user_id: Some(user_id),
    })
}

// Implement Clone for ApiServer to use with Axum's State
impl Clone for ApiServer {
    fn clone(&self) -> Self {
        ApiServer {
            issuer: Arc::clone(&self.issuer),
            validator: Arc::clone(&self.validator),
            repository: Arc::clone(&self.repository),
            qr_renderer: Arc::clone(&self.qr_renderer),
            base_url: self.base_url.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_status_rejects_values_outside_the_enumeration() {
        assert!(parse_status(Some("cancelled")).is_err());
        assert_eq!(
            parse_status(Some("revoked")).unwrap(),
            Some(CertificateStatus::Revoked)
        );
        assert_eq!(parse_status(None).unwrap(), None);
    }

    #[test]
    fn issuing_context_parses_the_user_header() {
        let mut headers = HeaderMap::new();
        assert_eq!(issuing_context(&headers).unwrap().user_id, None);

        let user_id = Uuid::new_v4();
        headers.insert("x-user-id", user_id.to_string().parse().unwrap());
        assert_eq!(issuing_context(&headers).unwrap().user_id, Some(user_id));

        headers.insert("x-user-id", "not-a-uuid".parse().unwrap());
        assert!(matches!(
            issuing_context(&headers).unwrap_err(),
            Error::Validation(_)
        ));
    }
}
