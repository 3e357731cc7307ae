//! Error types for the job board services
//!
//! Provides a comprehensive error handling system with:
//! - Distinct error types for each failure mode of the API
//! - HTTP status code mapping
//! - The `{success, message, errors?, data?}` response envelope
//! - Error codes for client handling

use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use sea_orm::{DbErr, RuntimeErr, SqlErr};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use thiserror::Error;
use uuid::Uuid;

/// Result type alias using AppError
pub type Result<T> = std::result::Result<T, AppError>;

static EXPOSE_INTERNAL_DETAILS: AtomicBool = AtomicBool::new(false);

/// Include internal error detail in 5xx responses (non-production only).
pub fn expose_internal_details(enabled: bool) {
    EXPOSE_INTERNAL_DETAILS.store(enabled, Ordering::Relaxed);
}

/// Error codes for machine-readable error identification
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Validation errors (1xxx)
    ValidationError,
    InvalidOperation,
    ProfileIncomplete,
    CompanyRequired,
    CompanyInactive,

    // Authentication errors (2xxx)
    Unauthorized,
    ExpiredToken,

    // Authorization errors (3xxx)
    Forbidden,

    // Resource errors (4xxx)
    NotFound,

    // Conflict errors (5xxx)
    Conflict,

    // Rate limiting (6xxx)
    RateLimited,

    // Database errors (7xxx)
    DatabaseError,
    ConnectionError,

    // Internal errors (9xxx)
    InternalError,
    ConfigurationError,
}

impl ErrorCode {
    /// Get the numeric code for this error
    pub fn as_code(&self) -> u16 {
        match self {
            ErrorCode::ValidationError => 1001,
            ErrorCode::InvalidOperation => 1002,
            ErrorCode::ProfileIncomplete => 1101,
            ErrorCode::CompanyRequired => 1102,
            ErrorCode::CompanyInactive => 1103,

            ErrorCode::Unauthorized => 2001,
            ErrorCode::ExpiredToken => 2002,

            ErrorCode::Forbidden => 3001,

            ErrorCode::NotFound => 4001,

            ErrorCode::Conflict => 5001,

            ErrorCode::RateLimited => 6001,

            ErrorCode::DatabaseError => 7001,
            ErrorCode::ConnectionError => 7002,

            ErrorCode::InternalError => 9001,
            ErrorCode::ConfigurationError => 9002,
        }
    }
}

/// A single field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldIssue {
    pub field: String,
    pub message: String,
}

impl FieldIssue {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Onboarding prerequisite that a guarded endpoint found missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Requirement {
    JobSeekerProfile,
    EmployerProfile,
    CompanySelection,
    ActiveCompany,
}

impl Requirement {
    /// Client-side routing hint returned with the error.
    pub fn action(&self) -> &'static str {
        match self {
            Requirement::JobSeekerProfile => "create_job_seeker_profile",
            Requirement::EmployerProfile => "create_employer_profile",
            Requirement::CompanySelection => "select_company",
            Requirement::ActiveCompany => "select_active_company",
        }
    }

    fn code(&self) -> ErrorCode {
        match self {
            Requirement::JobSeekerProfile | Requirement::EmployerProfile => {
                ErrorCode::ProfileIncomplete
            }
            Requirement::CompanySelection => ErrorCode::CompanyRequired,
            Requirement::ActiveCompany => ErrorCode::CompanyInactive,
        }
    }
}

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Validation errors
    #[error("{message}")]
    Validation {
        message: String,
        issues: Vec<FieldIssue>,
    },

    #[error("{message}")]
    InvalidOperation { message: String },

    #[error("{message}")]
    PreconditionFailed {
        message: String,
        requirement: Requirement,
    },

    // Authentication errors
    #[error("Unauthorized: {message}")]
    Unauthorized { message: String },

    #[error("Token expired")]
    ExpiredToken,

    // Authorization errors
    #[error("Forbidden: {message}")]
    Forbidden { message: String },

    // Resource errors
    #[error("{message}")]
    NotFound { message: String },

    // Conflict errors
    #[error("{message}")]
    Conflict {
        message: String,
        existing_id: Option<Uuid>,
    },

    // Rate limiting
    #[error("Too many requests, slow down")]
    RateLimited,

    // Database errors
    #[error("Database error: {0}")]
    Database(#[source] DbErr),

    #[error("Database connection error: {message}")]
    DatabaseConnection { message: String },

    // Internal errors
    #[error("Internal server error: {message}")]
    Internal { message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

impl AppError {
    /// Single-field validation failure
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        let message = message.into();
        AppError::Validation {
            issues: vec![FieldIssue::new(field, message.clone())],
            message,
        }
    }

    pub fn invalid_operation(message: impl Into<String>) -> Self {
        AppError::InvalidOperation {
            message: message.into(),
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        AppError::Unauthorized {
            message: message.into(),
        }
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        AppError::Forbidden {
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        AppError::NotFound {
            message: message.into(),
        }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        AppError::Conflict {
            message: message.into(),
            existing_id: None,
        }
    }

    pub fn precondition(requirement: Requirement, message: impl Into<String>) -> Self {
        AppError::PreconditionFailed {
            message: message.into(),
            requirement,
        }
    }

    /// Get the error code for this error
    pub fn code(&self) -> ErrorCode {
        match self {
            AppError::Validation { .. } => ErrorCode::ValidationError,
            AppError::InvalidOperation { .. } => ErrorCode::InvalidOperation,
            AppError::PreconditionFailed { requirement, .. } => requirement.code(),
            AppError::Unauthorized { .. } => ErrorCode::Unauthorized,
            AppError::ExpiredToken => ErrorCode::ExpiredToken,
            AppError::Forbidden { .. } => ErrorCode::Forbidden,
            AppError::NotFound { .. } => ErrorCode::NotFound,
            AppError::Conflict { .. } => ErrorCode::Conflict,
            AppError::RateLimited => ErrorCode::RateLimited,
            AppError::Database(_) => ErrorCode::DatabaseError,
            AppError::DatabaseConnection { .. } => ErrorCode::ConnectionError,
            AppError::Internal { .. } => ErrorCode::InternalError,
            AppError::Configuration { .. } => ErrorCode::ConfigurationError,
        }
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            // 400 Bad Request
            AppError::Validation { .. }
            | AppError::InvalidOperation { .. }
            | AppError::PreconditionFailed { .. } => StatusCode::BAD_REQUEST,

            // 401 Unauthorized
            AppError::Unauthorized { .. } | AppError::ExpiredToken => StatusCode::UNAUTHORIZED,

            // 403 Forbidden
            AppError::Forbidden { .. } => StatusCode::FORBIDDEN,

            // 404 Not Found
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,

            // 409 Conflict
            AppError::Conflict { .. } => StatusCode::CONFLICT,

            // 429 Too Many Requests
            AppError::RateLimited => StatusCode::TOO_MANY_REQUESTS,

            // 500 Internal Server Error
            AppError::Database(_)
            | AppError::DatabaseConnection { .. }
            | AppError::Internal { .. }
            | AppError::Configuration { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Check if this error should be logged at error level
    pub fn is_server_error(&self) -> bool {
        self.status_code().is_server_error()
    }

    /// Check if this error is a client error
    pub fn is_client_error(&self) -> bool {
        self.status_code().is_client_error()
    }
}

/// Detail of a unique index violation, if that is what `err` reports
fn unique_violation(err: &DbErr) -> Option<String> {
    if let Some(SqlErr::UniqueConstraintViolation(detail)) = err.sql_err() {
        return Some(detail);
    }
    match err {
        DbErr::Exec(RuntimeErr::SqlxError(sqlx::Error::Database(e)))
        | DbErr::Query(RuntimeErr::SqlxError(sqlx::Error::Database(e)))
            if e.is_unique_violation() =>
        {
            Some(e.message().to_string())
        }
        _ => None,
    }
}

impl From<DbErr> for AppError {
    fn from(err: DbErr) -> Self {
        match unique_violation(&err) {
            Some(detail) => {
                tracing::debug!(detail = %detail, "Unique constraint violation");
                AppError::conflict("Resource already exists")
            }
            None => AppError::Database(err),
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut issues: Vec<FieldIssue> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |e| {
                    let message = e
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("invalid value ({})", e.code));
                    FieldIssue::new(field.to_string(), message)
                })
            })
            .collect();

        if issues.is_empty() {
            issues.push(FieldIssue::new("body", errors.to_string()));
        }
        issues.sort_by(|a, b| a.field.cmp(&b.field));

        AppError::Validation {
            message: "Validation failed".to_string(),
            issues,
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::validation("body", rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::validation("query", rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::validation("path", rejection.body_text())
    }
}

/// Structured error response for API
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub success: bool,
    pub message: String,
    pub code: ErrorCode,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<FieldIssue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl AppError {
    fn into_body(self) -> ErrorResponse {
        let code = self.code();
        let server_error = self.is_server_error();
        let message = if server_error {
            "Internal server error".to_string()
        } else {
            self.to_string()
        };
        let detail = (server_error && EXPOSE_INTERNAL_DETAILS.load(Ordering::Relaxed))
            .then(|| format!("{:?}", self));

        let (errors, data) = match self {
            AppError::Validation { issues, .. } => (issues, None),
            AppError::PreconditionFailed { requirement, .. } => (
                Vec::new(),
                Some(serde_json::json!({
                    "action": requirement.action(),
                    "requirement": requirement,
                })),
            ),
            AppError::Conflict {
                existing_id: Some(id),
                ..
            } => (
                Vec::new(),
                Some(serde_json::json!({ "existingId": id, "suggestion": "join" })),
            ),
            _ => (Vec::new(), None),
        };

        ErrorResponse {
            success: false,
            message,
            code,
            errors,
            data,
            detail,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let code = self.code();

        // Log based on severity
        if self.is_server_error() {
            tracing::error!(
                error = %self,
                code = ?code,
                status = status.as_u16(),
                "Server error"
            );
        } else if self.is_client_error() {
            tracing::warn!(
                error = %self,
                code = ?code,
                status = status.as_u16(),
                "Client error"
            );
        }

        (status, Json(self.into_body())).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::error::{DatabaseError, ErrorKind};
    use std::borrow::Cow;

    #[derive(Debug)]
    struct StubDbError {
        unique: bool,
    }

    impl std::fmt::Display for StubDbError {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.write_str("duplicate key value violates unique constraint")
        }
    }

    impl std::error::Error for StubDbError {}

    impl DatabaseError for StubDbError {
        fn message(&self) -> &str {
            "duplicate key value violates unique constraint"
        }

        fn code(&self) -> Option<Cow<'_, str>> {
            Some(Cow::Borrowed("23505"))
        }

        fn as_error(&self) -> &(dyn std::error::Error + Send + Sync + 'static) {
            self
        }

        fn as_error_mut(&mut self) -> &mut (dyn std::error::Error + Send + Sync + 'static) {
            self
        }

        fn into_error(self: Box<Self>) -> Box<dyn std::error::Error + Send + Sync + 'static> {
            self
        }

        fn kind(&self) -> ErrorKind {
            if self.unique {
                ErrorKind::UniqueViolation
            } else {
                ErrorKind::ForeignKeyViolation
            }
        }
    }

    fn sqlx_db_error(unique: bool) -> RuntimeErr {
        RuntimeErr::SqlxError(sqlx::Error::Database(Box::new(StubDbError { unique })))
    }

    #[test]
    fn test_unique_violation_becomes_conflict() {
        let err: AppError = DbErr::Query(sqlx_db_error(true)).into();
        assert_eq!(err.code(), ErrorCode::Conflict);
        assert_eq!(err.status_code(), StatusCode::CONFLICT);
        assert_eq!(err.to_string(), "Resource already exists");

        let err: AppError = DbErr::Exec(sqlx_db_error(true)).into();
        assert_eq!(err.code(), ErrorCode::Conflict);
    }

    #[test]
    fn test_other_database_errors_stay_internal() {
        let err: AppError = DbErr::Exec(sqlx_db_error(false)).into();
        assert_eq!(err.code(), ErrorCode::DatabaseError);
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);

        let err: AppError = DbErr::Custom("connection reset".into()).into();
        assert_eq!(err.code(), ErrorCode::DatabaseError);
    }

    #[test]
    fn test_error_code_mapping() {
        let err = AppError::not_found("Job not found");
        assert_eq!(err.code(), ErrorCode::NotFound);
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_validation_error() {
        let err = AppError::validation("title", "Title is required");
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert!(!err.is_server_error());
        assert!(err.is_client_error());

        let body = err.into_body();
        assert!(!body.success);
        assert_eq!(body.errors, vec![FieldIssue::new("title", "Title is required")]);
    }

    #[test]
    fn test_precondition_is_bad_request_with_action() {
        let err = AppError::precondition(Requirement::CompanySelection, "Select a company first");
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.code(), ErrorCode::CompanyRequired);

        let body = err.into_body();
        let data = body.data.unwrap();
        assert_eq!(data["action"], "select_company");
    }

    #[test]
    fn test_precondition_kinds_are_distinct() {
        let codes = [
            Requirement::EmployerProfile.code(),
            Requirement::CompanySelection.code(),
            Requirement::ActiveCompany.code(),
        ];
        assert_ne!(codes[0], codes[1]);
        assert_ne!(codes[1], codes[2]);
        assert_ne!(codes[0], codes[2]);
    }

    #[test]
    fn test_conflict_carries_existing_id() {
        let id = Uuid::new_v4();
        let err = AppError::Conflict {
            message: "Company already exists".into(),
            existing_id: Some(id),
        };
        assert_eq!(err.status_code(), StatusCode::CONFLICT);
        let body = err.into_body();
        assert_eq!(body.data.unwrap()["existingId"], id.to_string());
    }

    #[test]
    fn test_server_error_hides_message() {
        let err = AppError::Internal {
            message: "pool exhausted".into(),
        };
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(err.is_server_error());
        let body = err.into_body();
        assert_eq!(body.message, "Internal server error");
    }

    #[test]
    fn test_internal_failures_use_9xxx_codes() {
        let internal = AppError::Internal {
            message: "pool exhausted".into(),
        };
        let config = AppError::Configuration {
            message: "auth.jwt_secret missing".into(),
        };
        assert_eq!(internal.code().as_code(), 9001);
        assert_eq!(config.code().as_code(), 9002);
        assert_eq!(config.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
