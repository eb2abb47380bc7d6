use axum::{
    Form,
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{error, info, warn};

use super::auth::AuthenticatedStudent;
use super::validation::validate_complaint;
use super::{ApiError, AppState};
use crate::constants::paths::DASHBOARD;
use crate::constants::session::FLASH_KEY;
use crate::models::complaint::Submitter;
use crate::models::student::normalize_email;
use crate::views;

pub const SUBMITTED_FLASH: &str = "Complaint registered successfully.";

/// Complaint form body. Identity fields posted alongside are ignored; the
/// submitter always comes from the session. Only `email` is read, to log
/// a mismatch.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ComplaintForm {
    pub complaint_type: String,
    pub description: String,
    pub email: Option<String>,
}

/// GET /complaint
pub async fn show_form(auth: AuthenticatedStudent) -> Html<String> {
    Html(views::complaint_form_page(&auth.student, None))
}

/// POST /registerComplaint
pub async fn submit(
    State(state): State<Arc<AppState>>,
    auth: AuthenticatedStudent,
    Form(form): Form<ComplaintForm>,
) -> Response {
    let student = &auth.student;

    if let Some(posted) = form.email.as_deref()
        && !posted.trim().is_empty()
        && normalize_email(posted) != student.email
    {
        warn!(
            session_email = %student.email,
            posted_email = %posted,
            "Complaint form email differs from session identity, using session"
        );
    }

    let complaint = match validate_complaint(&form.complaint_type, &form.description) {
        Ok(complaint) => complaint,
        Err(e) => {
            let message = match e {
                ApiError::ValidationError(msg) => msg,
                other => other.to_string(),
            };
            return (
                StatusCode::BAD_REQUEST,
                Html(views::complaint_form_page(student, Some(&message))),
            )
                .into_response();
        }
    };

    let submitter = Submitter::from(student);
    match state.complaint_service().submit(&submitter, complaint).await {
        Ok(saved) => {
            info!(complaint_id = saved.id, student_id = student.id, "Complaint submitted");
            if let Err(e) = auth.session.insert(FLASH_KEY, SUBMITTED_FLASH).await {
                warn!(error = %e, "Failed to store flash message");
            }
            Redirect::to(DASHBOARD).into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to submit complaint");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Html(views::complaint_form_page(
                    student,
                    Some("An error occurred while registering the complaint. Please try again."),
                )),
            )
                .into_response()
        }
    }
}

/// GET /student/allComplaints
pub async fn all_complaints(
    State(state): State<Arc<AppState>>,
    auth: AuthenticatedStudent,
) -> Result<Html<String>, ApiError> {
    let complaints = state.complaint_service().list_all().await?;
    Ok(Html(views::complaints_page(
        "All Complaints",
        &auth.student,
        &complaints,
    )))
}

/// GET /student/myComplaints
pub async fn my_complaints(
    State(state): State<Arc<AppState>>,
    auth: AuthenticatedStudent,
) -> Result<Html<String>, ApiError> {
    let complaints = state
        .complaint_service()
        .list_by_email(&auth.student.email)
        .await?;
    Ok(Html(views::complaints_page(
        "My Complaints",
        &auth.student,
        &complaints,
    )))
}
