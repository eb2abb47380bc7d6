use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware,
    response::Redirect,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer};

use crate::config::Config;
use crate::constants::paths::{DASHBOARD, PHOTO_URL_PREFIX};
use crate::constants::session::COOKIE_NAME;
use crate::services::{ComplaintService, PhotoStore, StudentService};
use crate::state::SharedState;

mod assets;
pub mod auth;
pub mod complaints;
mod error;
mod observability;
pub mod students;
mod validation;

pub use error::ApiError;

use metrics_exporter_prometheus::PrometheusHandle;

/// Slack on top of the photo limit for the text fields and multipart framing.
const REGISTER_BODY_OVERHEAD: usize = 64 * 1024;

#[derive(Clone)]
pub struct AppState {
    pub shared: Arc<SharedState>,

    pub prometheus_handle: Option<PrometheusHandle>,
}

impl AppState {
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.shared.config
    }

    #[must_use]
    pub fn store(&self) -> &crate::db::Store {
        &self.shared.store
    }

    #[must_use]
    pub fn student_service(&self) -> &Arc<dyn StudentService> {
        &self.shared.student_service
    }

    #[must_use]
    pub fn complaint_service(&self) -> &Arc<dyn ComplaintService> {
        &self.shared.complaint_service
    }

    #[must_use]
    pub fn photo_store(&self) -> &Arc<PhotoStore> {
        &self.shared.photo_store
    }
}

#[must_use]
pub fn create_app_state(
    shared: Arc<SharedState>,
    prometheus_handle: Option<PrometheusHandle>,
) -> Arc<AppState> {
    Arc::new(AppState {
        shared,
        prometheus_handle,
    })
}

pub async fn create_app_state_from_config(
    config: Config,
    prometheus_handle: Option<PrometheusHandle>,
) -> anyhow::Result<Arc<AppState>> {
    let shared = Arc::new(SharedState::new(config).await?);
    Ok(create_app_state(shared, prometheus_handle))
}

pub fn router(state: Arc<AppState>) -> Router {
    let config = state.config();
    let photo_dir = config.uploads.photo_dir.clone();
    let register_body_limit = config.uploads.max_photo_bytes + REGISTER_BODY_OVERHEAD;

    let session_layer = SessionManagerLayer::new(MemoryStore::default())
        .with_name(COOKIE_NAME)
        .with_secure(config.server.secure_cookies)
        .with_http_only(true)
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_expiry(Expiry::OnInactivity(time::Duration::minutes(
            config.server.session_inactivity_minutes,
        )));

    let app_routes = Router::new()
        .merge(create_protected_router())
        .route("/", get(|| async { Redirect::to(DASHBOARD) }))
        .route(
            "/student/register",
            get(students::show_register)
                .post(students::register)
                .layer(DefaultBodyLimit::max(register_body_limit)),
        )
        .route("/student/login", get(auth::show_login).post(auth::login))
        .route("/student/logout", post(auth::logout))
        .layer(session_layer)
        .route("/health", get(observability::health))
        .route("/metrics", get(observability::get_metrics))
        .with_state(state);

    Router::new()
        .merge(app_routes)
        .nest_service(PHOTO_URL_PREFIX, ServeDir::new(photo_dir))
        .fallback(assets::serve_asset)
        .layer(middleware::from_fn(observability::logging_middleware))
        .layer(middleware::from_fn(observability::security_headers_middleware))
        .layer(TraceLayer::new_for_http())
}

fn create_protected_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/student/dashboard", get(students::dashboard))
        .route("/student/student_profile", get(students::profile))
        .route(
            "/student/updatePassword",
            post(students::update_password),
        )
        .route("/complaint", get(complaints::show_form))
        .route("/registerComplaint", post(complaints::submit))
        .route("/student/allComplaints", get(complaints::all_complaints))
        .route("/student/myComplaints", get(complaints::my_complaints))
        .route_layer(middleware::from_fn(auth::auth_middleware))
}
