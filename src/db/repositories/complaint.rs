use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};

use crate::entities::{complaints, prelude::*};
use crate::models::complaint::{Complaint, NewComplaint, Submitter};

/// Repository for complaint records
pub struct ComplaintRepository {
    conn: DatabaseConnection,
}

impl ComplaintRepository {
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    fn map_model(m: complaints::Model) -> Complaint {
        Complaint {
            id: m.id,
            enrollment_number: m.enrollment_number,
            name: m.name,
            email: m.email,
            course: m.course,
            department: m.department,
            complaint_type: m.complaint_type,
            description: m.description,
            created_at: m.created_at,
        }
    }

    pub async fn insert(&self, submitter: &Submitter, complaint: &NewComplaint) -> Result<Complaint> {
        let active = complaints::ActiveModel {
            enrollment_number: Set(submitter.enrollment_number.clone()),
            name: Set(submitter.name.clone()),
            email: Set(submitter.email.clone()),
            course: Set(submitter.course.clone()),
            department: Set(submitter.department.clone()),
            complaint_type: Set(complaint.complaint_type.clone()),
            description: Set(complaint.description.clone()),
            created_at: Set(chrono::Utc::now().to_rfc3339()),
            ..Default::default()
        };

        let model = active
            .insert(&self.conn)
            .await
            .context("Failed to insert complaint")?;

        Ok(Self::map_model(model))
    }

    /// All complaints in insertion order
    pub async fn list_all(&self) -> Result<Vec<Complaint>> {
        let rows = Complaints::find()
            .order_by_asc(complaints::Column::Id)
            .all(&self.conn)
            .await
            .context("Failed to list complaints")?;

        Ok(rows.into_iter().map(Self::map_model).collect())
    }

    pub async fn list_by_email(&self, email: &str) -> Result<Vec<Complaint>> {
        let rows = Complaints::find()
            .filter(complaints::Column::Email.eq(email))
            .order_by_asc(complaints::Column::Id)
            .all(&self.conn)
            .await
            .context("Failed to list complaints by email")?;

        Ok(rows.into_iter().map(Self::map_model).collect())
    }

    pub async fn count(&self) -> Result<u64> {
        Complaints::find()
            .count(&self.conn)
            .await
            .context("Failed to count complaints")
    }
}
