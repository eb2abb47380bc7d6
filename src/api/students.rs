use axum::{
    Form,
    extract::{Multipart, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{error, warn};

use super::auth::AuthenticatedStudent;
use super::validation::{validate_email, validate_password, validate_required};
use super::{ApiError, AppState};
use crate::constants::paths::LOGIN;
use crate::constants::session::FLASH_KEY;
use crate::models::student::Registration;
use crate::services::StudentError;
use crate::views::{self, RegisterFormValues};

// ============================================================================
// Request Types
// ============================================================================

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePasswordForm {
    #[serde(default)]
    pub current_password: String,
    #[serde(default)]
    pub new_password: String,
    #[serde(default)]
    pub confirm_password: String,
}

/// Raw multipart registration fields.
#[derive(Default)]
struct RegisterFields {
    values: RegisterFormValues,
    password: String,
    photo: Option<UploadedPhoto>,
}

struct UploadedPhoto {
    file_name: String,
    bytes: Vec<u8>,
}

impl RegisterFields {
    async fn read(multipart: &mut Multipart) -> Result<Self, (StatusCode, String)> {
        let mut fields = Self::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| (e.status(), e.body_text()))?
        {
            let name = field.name().unwrap_or_default().to_string();

            if name == "photo" {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| (e.status(), e.body_text()))?;

                // An empty file input still submits a part with no name and no bytes.
                if !file_name.is_empty() && !bytes.is_empty() {
                    fields.photo = Some(UploadedPhoto {
                        file_name,
                        bytes: bytes.to_vec(),
                    });
                }
                continue;
            }

            let value = field.text().await.map_err(|e| (e.status(), e.body_text()))?;
            match name.as_str() {
                "enrollmentNumber" => fields.values.enrollment_number = value,
                "studentName" => fields.values.student_name = value,
                "email" => fields.values.email = value,
                "department" => fields.values.department = value,
                "course" => fields.values.course = value,
                "password" => fields.password = value,
                _ => {}
            }
        }

        Ok(fields)
    }

    fn validate(&self) -> Result<Registration, ApiError> {
        let v = &self.values;
        Ok(Registration {
            enrollment_number: validate_required("Enrollment number", &v.enrollment_number)?
                .to_string(),
            student_name: validate_required("Name", &v.student_name)?.to_string(),
            email: validate_email(&v.email)?.to_string(),
            department: validate_required("Department", &v.department)?.to_string(),
            course: validate_required("Course", &v.course)?.to_string(),
            password: validate_password(&self.password)?.to_string(),
        })
    }
}

fn register_form(status: StatusCode, message: &str, values: &RegisterFormValues) -> Response {
    (status, Html(views::register_page(Some(message), values))).into_response()
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /student/register
pub async fn show_register() -> Html<String> {
    Html(views::register_page(None, &RegisterFormValues::default()))
}

/// POST /student/register
///
/// The photo is written before the student row. If the insert then fails
/// the file stays behind as an orphan for the scheduled sweep.
pub async fn register(State(state): State<Arc<AppState>>, mut multipart: Multipart) -> Response {
    let fields = match RegisterFields::read(&mut multipart).await {
        Ok(fields) => fields,
        Err((status, message)) => {
            return register_form(status, &message, &RegisterFormValues::default());
        }
    };

    let registration = match fields.validate() {
        Ok(registration) => registration,
        Err(e) => {
            let message = match &e {
                ApiError::ValidationError(msg) => msg.clone(),
                other => other.to_string(),
            };
            return register_form(StatusCode::BAD_REQUEST, &message, &fields.values);
        }
    };

    let photo_path = match &fields.photo {
        Some(photo) => match state
            .photo_store()
            .save(&photo.file_name, &photo.bytes)
            .await
        {
            Ok(filename) => Some(filename),
            Err(e) if e.is_rejection() => {
                return register_form(StatusCode::BAD_REQUEST, &e.to_string(), &fields.values);
            }
            Err(e) => {
                error!(error = %e, "Photo upload failed");
                return register_form(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    &format!("Failed to upload photo: {e}"),
                    &fields.values,
                );
            }
        },
        None => None,
    };

    match state
        .student_service()
        .register(registration, photo_path.clone())
        .await
    {
        Ok(_) => Redirect::to(LOGIN).into_response(),
        Err(e) => {
            if let Some(orphan) = &photo_path {
                warn!(photo = %orphan, "Registration failed after photo upload, photo left for sweep");
            }

            match e {
                StudentError::AlreadyRegistered => {
                    register_form(StatusCode::CONFLICT, &e.to_string(), &fields.values)
                }
                StudentError::Validation(msg) => {
                    register_form(StatusCode::BAD_REQUEST, &msg, &fields.values)
                }
                other => {
                    error!(error = %other, "Registration failed");
                    register_form(
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "Registration failed. Please try again.",
                        &fields.values,
                    )
                }
            }
        }
    }
}

/// GET /student/dashboard
pub async fn dashboard(auth: AuthenticatedStudent) -> Html<String> {
    let flash = auth
        .session
        .remove::<String>(FLASH_KEY)
        .await
        .ok()
        .flatten();

    Html(views::dashboard_page(&auth.student, flash.as_deref()))
}

/// GET /student/student_profile
pub async fn profile(auth: AuthenticatedStudent) -> Html<String> {
    Html(views::profile_page(&auth.student, None))
}

/// POST /student/updatePassword
///
/// On success the session is dropped so the student logs in again with the
/// new password.
pub async fn update_password(
    State(state): State<Arc<AppState>>,
    auth: AuthenticatedStudent,
    Form(form): Form<UpdatePasswordForm>,
) -> Result<Response, ApiError> {
    let result = state
        .student_service()
        .change_password(
            &auth.student.email,
            &form.current_password,
            &form.new_password,
            &form.confirm_password,
        )
        .await;

    match result {
        Ok(()) => {
            if let Err(e) = auth.session.flush().await {
                warn!(error = %e, student_id = auth.student.id, "Failed to end session after password change");
            }
            Ok(Redirect::to(LOGIN).into_response())
        }
        Err(
            e @ (StudentError::IncorrectCurrentPassword
            | StudentError::ConfirmationMismatch
            | StudentError::Validation(_)),
        ) => {
            let message = match e {
                StudentError::Validation(msg) => msg,
                other => other.to_string(),
            };
            Ok((
                StatusCode::BAD_REQUEST,
                Html(views::profile_page(&auth.student, Some(&message))),
            )
                .into_response())
        }
        Err(e) => Err(e.into()),
    }
}
