//! Response types for the HR payroll API.
//!
//! This module defines the listing and login bodies, the error body, and
//! the mapping from [`PayrollError`] to HTTP status codes.

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::Session;
use crate::error::PayrollError;
use crate::models::{AttendanceEntry, Employee, PayrollEntry};

/// API error response structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Optional details about the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Creates a new API error with details.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: Some(details.into()),
        }
    }

    /// Creates a malformed JSON error response.
    pub fn malformed_json(message: impl Into<String>) -> Self {
        Self::new("MALFORMED_JSON", message)
    }

    /// Maps a JSON body rejection to an error body.
    pub fn from_json_rejection(rejection: &JsonRejection) -> Self {
        match rejection {
            JsonRejection::JsonDataError(err) => {
                let body_text = err.body_text();
                if body_text.contains("missing field") {
                    Self::new("VALIDATION_ERROR", body_text)
                } else {
                    Self::malformed_json(body_text)
                }
            }
            JsonRejection::JsonSyntaxError(err) => {
                Self::malformed_json(format!("Invalid JSON syntax: {}", err))
            }
            JsonRejection::MissingJsonContentType(_) => {
                Self::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
            }
            _ => Self::malformed_json("Failed to parse request body"),
        }
    }
}

/// API error with HTTP status code.
#[derive(Debug)]
pub struct ApiErrorResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The error body.
    pub error: ApiError,
}

impl ApiErrorResponse {
    /// A 400 response.
    pub fn bad_request(error: ApiError) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            error,
        }
    }
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.error)).into_response()
    }
}

impl From<PayrollError> for ApiErrorResponse {
    fn from(error: PayrollError) -> Self {
        let message = error.to_string();
        let (status, error) = match error {
            PayrollError::ConfigNotFound { .. } | PayrollError::ConfigParseError { .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::with_details("CONFIG_ERROR", "Configuration error", message),
            ),
            PayrollError::Validation { field, .. } => (
                StatusCode::BAD_REQUEST,
                ApiError::with_details("VALIDATION_ERROR", message, field),
            ),
            PayrollError::NotFound { .. } => {
                (StatusCode::NOT_FOUND, ApiError::new("NOT_FOUND", message))
            }
            PayrollError::ReferentialIntegrity { .. } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ApiError::new("REFERENTIAL_INTEGRITY_ERROR", message),
            ),
            PayrollError::InvalidPeriod { .. } => (
                StatusCode::BAD_REQUEST,
                ApiError::new("INVALID_PERIOD", message),
            ),
            PayrollError::InvalidArgument { field, .. } => (
                StatusCode::BAD_REQUEST,
                ApiError::with_details("INVALID_ARGUMENT", message, field),
            ),
            PayrollError::Conflict { .. } => {
                (StatusCode::CONFLICT, ApiError::new("CONFLICT", message))
            }
            PayrollError::Storage { .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::with_details("STORAGE_ERROR", "Storage failure", message),
            ),
            PayrollError::AuthenticationFailed => (
                StatusCode::UNAUTHORIZED,
                ApiError::new("AUTHENTICATION_FAILED", message),
            ),
            PayrollError::Unauthorized { .. } => (
                StatusCode::UNAUTHORIZED,
                ApiError::new("UNAUTHORIZED", message),
            ),
        };
        Self { status, error }
    }
}

/// Response body for `POST /login`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    /// Bearer token for the `Authorization` header.
    pub token: Uuid,
    /// The authenticated user.
    pub username: String,
    /// When the token stops being accepted.
    pub expires_at: DateTime<Utc>,
}

impl From<Session> for LoginResponse {
    fn from(session: Session) -> Self {
        Self {
            token: session.token,
            username: session.username,
            expires_at: session.expires_at,
        }
    }
}

/// Response body for `GET /employees`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmployeeList {
    /// Every employee.
    pub employees: Vec<Employee>,
}

/// Response body for `GET /attendance`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttendanceList {
    /// Matching attendance records.
    pub attendances: Vec<AttendanceEntry>,
}

/// Response body for `GET /payroll`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayrollList {
    /// Matching payroll records.
    pub payroll: Vec<PayrollEntry>,
}

/// A plain status message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusMessage {
    /// The status.
    pub status: String,
}

impl StatusMessage {
    /// Creates a status message.
    pub fn new(status: impl Into<String>) -> Self {
        Self {
            status: status.into(),
        }
    }
}
