//! Domain service for student accounts.
//!
//! Handles registration, identity lookup, credential checks and password
//! changes. Password hashing is delegated to a [`PasswordEncoder`].
//!
//! [`PasswordEncoder`]: crate::services::PasswordEncoder

use sea_orm::SqlErr;
use thiserror::Error;

use crate::models::student::{Registration, Student};

/// Errors specific to student operations.
#[derive(Debug, Error)]
pub enum StudentError {
    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Student not found: {0}")]
    NotFound(String),

    #[error("A student with this email or enrollment number is already registered")]
    AlreadyRegistered,

    #[error("Current password is incorrect")]
    IncorrectCurrentPassword,

    #[error("New password and confirmation do not match")]
    ConfirmationMismatch,

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sea_orm::DbErr> for StudentError {
    fn from(err: sea_orm::DbErr) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => Self::AlreadyRegistered,
            _ => Self::Database(err.to_string()),
        }
    }
}

impl From<anyhow::Error> for StudentError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// Domain service trait for students.
#[async_trait::async_trait]
pub trait StudentService: Send + Sync {
    /// Hashes the password and persists a new student. `photo_path` is the
    /// stored photo filename, if one was uploaded.
    ///
    /// # Errors
    ///
    /// Returns [`StudentError::AlreadyRegistered`] when the email or
    /// enrollment number is taken.
    async fn register(
        &self,
        registration: Registration,
        photo_path: Option<String>,
    ) -> Result<Student, StudentError>;

    /// Looks up a student by login email.
    async fn find_by_email(&self, email: &str) -> Result<Option<Student>, StudentError>;

    /// Verifies a login attempt.
    ///
    /// # Errors
    ///
    /// Returns [`StudentError::InvalidCredentials`] for an unknown email or
    /// a wrong password.
    async fn authenticate(&self, email: &str, password: &str) -> Result<Student, StudentError>;

    /// Changes the password of the student identified by `email`.
    ///
    /// The current password is checked first, then the confirmation. Nothing
    /// is written unless both pass.
    async fn change_password(
        &self,
        email: &str,
        current_password: &str,
        new_password: &str,
        confirm_password: &str,
    ) -> Result<(), StudentError>;

    async fn list_students(&self) -> Result<Vec<Student>, StudentError>;
}
