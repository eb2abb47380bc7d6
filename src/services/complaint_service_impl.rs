//! `SeaORM` implementation of the `ComplaintService` trait.

use async_trait::async_trait;
use tracing::info;

use crate::db::Store;
use crate::models::complaint::{Complaint, NewComplaint, Submitter};
use crate::models::student::normalize_email;
use crate::services::complaint_service::{ComplaintError, ComplaintService};

pub struct SeaOrmComplaintService {
    store: Store,
}

impl SeaOrmComplaintService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }
}

#[async_trait]
impl ComplaintService for SeaOrmComplaintService {
    async fn submit(
        &self,
        submitter: &Submitter,
        complaint: NewComplaint,
    ) -> Result<Complaint, ComplaintError> {
        if complaint.complaint_type.trim().is_empty() {
            return Err(ComplaintError::Validation(
                "Complaint type is required".to_string(),
            ));
        }
        if complaint.description.trim().is_empty() {
            return Err(ComplaintError::Validation(
                "Description is required".to_string(),
            ));
        }

        let stored = self.store.insert_complaint(submitter, &complaint).await?;

        metrics::counter!("complaints_submitted_total").increment(1);
        info!(
            complaint_id = stored.id,
            complaint_type = %stored.complaint_type,
            "Complaint registered"
        );

        Ok(stored)
    }

    async fn list_all(&self) -> Result<Vec<Complaint>, ComplaintError> {
        Ok(self.store.list_complaints().await?)
    }

    async fn list_by_email(&self, email: &str) -> Result<Vec<Complaint>, ComplaintError> {
        Ok(self
            .store
            .list_complaints_by_email(&normalize_email(email))
            .await?)
    }
}
