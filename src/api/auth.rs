use axum::{
    Form,
    extract::{FromRequestParts, Query, Request, State},
    http::request::Parts,
    middleware::Next,
    response::{Html, IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use std::sync::Arc;
use tower_sessions::Session;
use tracing::{info, warn};

use super::observability::RequestSpan;
use super::{ApiError, AppState};
use crate::constants::paths::{DASHBOARD, LOGIN};
use crate::constants::session::STUDENT_KEY;
use crate::models::student::Student;
use crate::services::StudentError;
use crate::views;

// ============================================================================
// Request Types
// ============================================================================

/// Flags are presence-only (`/student/login?error`).
#[derive(Debug, Default, Deserialize)]
pub struct LoginQuery {
    pub error: Option<String>,
    pub logout: Option<String>,
}

#[derive(Deserialize)]
pub struct LoginForm {
    #[serde(alias = "username")]
    pub email: String,
    pub password: String,
}

// ============================================================================
// Middleware
// ============================================================================

/// Lets a request through only when the session carries a student identity;
/// everything else is sent to the login page.
pub async fn auth_middleware(session: Session, request: Request, next: Next) -> Response {
    match session.get::<String>(STUDENT_KEY).await {
        Ok(Some(email)) => {
            if let Some(RequestSpan(span)) = request.extensions().get::<RequestSpan>() {
                span.record("user_id", email.as_str());
            }
            next.run(request).await
        }
        Ok(None) => Redirect::to(LOGIN).into_response(),
        Err(e) => ApiError::internal(format!("Session error: {e}")).into_response(),
    }
}

// ============================================================================
// Identity
// ============================================================================

/// The student behind the current session, resolved once per request.
///
/// If the session names an email with no matching record the session is
/// flushed and the request is redirected to the login page.
pub struct AuthenticatedStudent {
    pub student: Student,
    pub session: Session,
}

impl FromRequestParts<Arc<AppState>> for AuthenticatedStudent {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let session = Session::from_request_parts(parts, state)
            .await
            .map_err(|(_, msg)| ApiError::internal(msg))?;

        let email = get_session_email(&session).await?;

        match state.student_service().find_by_email(&email).await? {
            Some(student) => Ok(Self { student, session }),
            None => {
                warn!(email = %email, "Session identity has no student record, forcing re-login");
                let _ = session.flush().await;
                Err(ApiError::unauthorized("Student record missing"))
            }
        }
    }
}

/// Get the student email from the session, errors if not authenticated
pub async fn get_session_email(session: &Session) -> Result<String, ApiError> {
    session
        .get::<String>(STUDENT_KEY)
        .await
        .map_err(|e| ApiError::internal(format!("Session error: {e}")))?
        .ok_or_else(|| ApiError::unauthorized("Not authenticated"))
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /student/login
pub async fn show_login(Query(query): Query<LoginQuery>) -> Html<String> {
    let error = query
        .error
        .map(|_| "Invalid email or password. Please try again.");
    let notice = query.logout.map(|_| "You have been logged out.");

    Html(views::login_page(error, notice))
}

/// POST /student/login
pub async fn login(
    State(state): State<Arc<AppState>>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Result<Redirect, ApiError> {
    if form.email.trim().is_empty() || form.password.is_empty() {
        metrics::counter!("logins_total", "outcome" => "failure").increment(1);
        return Ok(Redirect::to("/student/login?error"));
    }

    let student = match state
        .student_service()
        .authenticate(&form.email, &form.password)
        .await
    {
        Ok(student) => student,
        Err(StudentError::InvalidCredentials) => {
            metrics::counter!("logins_total", "outcome" => "failure").increment(1);
            info!("Failed login attempt");
            return Ok(Redirect::to("/student/login?error"));
        }
        Err(e) => return Err(e.into()),
    };

    session
        .cycle_id()
        .await
        .map_err(|e| ApiError::internal(format!("Failed to create session: {e}")))?;
    session
        .insert(STUDENT_KEY, &student.email)
        .await
        .map_err(|e| ApiError::internal(format!("Failed to create session: {e}")))?;

    metrics::counter!("logins_total", "outcome" => "success").increment(1);
    info!(student_id = student.id, "Student logged in");

    Ok(Redirect::to(DASHBOARD))
}

/// POST /student/logout
pub async fn logout(session: Session) -> Redirect {
    let _ = session.flush().await;
    Redirect::to("/student/login?logout")
}
