//! Domain service for complaints.
//!
//! Complaints are created once and never modified. The submitter fields
//! are a snapshot of the authenticated student taken at filing time.

use thiserror::Error;

use crate::models::complaint::{Complaint, NewComplaint, Submitter};

/// Errors specific to complaint operations.
#[derive(Debug, Error)]
pub enum ComplaintError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sea_orm::DbErr> for ComplaintError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for ComplaintError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// Domain service trait for complaints.
#[async_trait::async_trait]
pub trait ComplaintService: Send + Sync {
    /// Persists exactly one complaint for `submitter`.
    async fn submit(
        &self,
        submitter: &Submitter,
        complaint: NewComplaint,
    ) -> Result<Complaint, ComplaintError>;

    /// Every complaint, oldest first.
    async fn list_all(&self) -> Result<Vec<Complaint>, ComplaintError>;

    /// Complaints whose snapshot email equals `email`, oldest first.
    async fn list_by_email(&self, email: &str) -> Result<Vec<Complaint>, ComplaintError>;
}
