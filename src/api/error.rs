use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};
use std::fmt;

use crate::constants::paths::LOGIN;
use crate::services::{ComplaintError, StudentError};
use crate::views;

#[derive(Debug)]
pub enum ApiError {
    NotFound(String),

    DatabaseError(String),

    ValidationError(String),

    Conflict(String),

    InternalError(String),

    /// No usable session identity. Rendered as a redirect to the login page.
    Unauthorized(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ApiError::DatabaseError(msg) => write!(f, "Database error: {}", msg),
            ApiError::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            ApiError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            ApiError::InternalError(msg) => write!(f, "Internal error: {}", msg),
            ApiError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_message) = match &self {
            ApiError::Unauthorized(msg) => {
                tracing::debug!("Redirecting to login: {}", msg);
                return Redirect::to(LOGIN).into_response();
            }
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            ApiError::DatabaseError(msg) => {
                tracing::error!("Database error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "A database error occurred".to_string(),
                )
            }
            ApiError::ValidationError(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg.clone()),
            ApiError::InternalError(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal error occurred".to_string(),
                )
            }
        };

        let title = status.canonical_reason().unwrap_or("Error");
        (status, Html(views::error_page(title, &error_message))).into_response()
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        ApiError::InternalError(err.to_string())
    }
}

impl From<StudentError> for ApiError {
    fn from(err: StudentError) -> Self {
        match err {
            StudentError::InvalidCredentials => Self::Unauthorized(err.to_string()),
            StudentError::NotFound(email) => Self::not_found("Student", email),
            StudentError::AlreadyRegistered => Self::Conflict(err.to_string()),
            StudentError::IncorrectCurrentPassword | StudentError::ConfirmationMismatch => {
                Self::validation(err.to_string())
            }
            StudentError::Validation(msg) => Self::validation(msg),
            StudentError::Database(msg) => Self::DatabaseError(msg),
            StudentError::Internal(msg) => Self::internal(msg),
        }
    }
}

impl From<ComplaintError> for ApiError {
    fn from(err: ComplaintError) -> Self {
        match err {
            ComplaintError::Validation(msg) => Self::validation(msg),
            ComplaintError::Database(msg) => Self::DatabaseError(msg),
            ComplaintError::Internal(msg) => Self::internal(msg),
        }
    }
}

impl ApiError {
    pub fn not_found(resource: &str, id: impl fmt::Display) -> Self {
        ApiError::NotFound(format!("{} {} not found", resource, id))
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        ApiError::ValidationError(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        ApiError::InternalError(msg.into())
    }

    pub fn unauthorized(msg: impl Into<String>) -> Self {
        ApiError::Unauthorized(msg.into())
    }
}
