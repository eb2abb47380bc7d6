//! Smoke tests for the infrastructure around the student flows.

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use complaint_desk::config::Config;
use complaint_desk::models::student::NewStudent;
use complaint_desk::services::OrphanPhotoSweeper;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;

async fn spawn_app() -> (Arc<complaint_desk::api::AppState>, Router, PathBuf) {
    let id = uuid::Uuid::new_v4();
    let db_path = std::env::temp_dir().join(format!("complaint-desk-smoke-test-{id}.db"));
    let photo_dir = std::env::temp_dir().join(format!("complaint-desk-smoke-photos-{id}"));
    std::fs::create_dir_all(&photo_dir).unwrap();

    let mut config = Config::default();
    config.general.database_path = format!("sqlite:{}", db_path.display());
    config.uploads.photo_dir = photo_dir.display().to_string();
    config.server.secure_cookies = false;
    config.observability.metrics_enabled = false;

    let state = complaint_desk::api::create_app_state_from_config(config, None)
        .await
        .expect("failed to create app state");

    let router = complaint_desk::api::router(state.clone());
    (state, router, photo_dir)
}

async fn get(app: &Router, uri: &str) -> axum::response::Response {
    app.clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

fn student_with_photo(enrollment: &str, email: &str, photo: Option<&str>) -> NewStudent {
    NewStudent {
        enrollment_number: enrollment.to_string(),
        student_name: "Smoke Student".to_string(),
        email: email.to_string(),
        department: "CSE".to_string(),
        course: "B.Tech".to_string(),
        password_hash: "not-a-real-hash".to_string(),
        photo_path: photo.map(str::to_string),
    }
}

#[tokio::test]
async fn smoke_health_root_and_assets() {
    let (_, app, _) = spawn_app().await;

    let health = get(&app, "/health").await;
    assert_eq!(health.status(), StatusCode::OK);

    let root = get(&app, "/").await;
    assert_eq!(root.status(), StatusCode::SEE_OTHER);
    assert_eq!(root.headers()[header::LOCATION], "/student/dashboard");

    let css = get(&app, "/css/app.css").await;
    assert_eq!(css.status(), StatusCode::OK);
    assert!(
        css.headers()[header::CONTENT_TYPE]
            .to_str()
            .unwrap()
            .starts_with("text/css")
    );

    let placeholder = get(&app, "/images/user-profile.jpg").await;
    assert_eq!(placeholder.status(), StatusCode::OK);
    assert_eq!(placeholder.headers()[header::CONTENT_TYPE], "image/jpeg");

    let missing = get(&app, "/no/such/page").await;
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);

    let register = get(&app, "/student/register").await;
    assert_eq!(register.status(), StatusCode::OK);
    assert_eq!(register.headers()["x-frame-options"], "DENY");
    assert!(register.headers().contains_key("content-security-policy"));
}

#[tokio::test]
async fn smoke_metrics_disabled_message() {
    let (_, app, _) = spawn_app().await;

    let response = get(&app, "/metrics").await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn sweeper_removes_only_unreferenced_photos() {
    let (state, _, photo_dir) = spawn_app().await;

    state
        .store()
        .insert_student(&student_with_photo("EN-1", "kept@x.com", Some("1_kept.png")))
        .await
        .unwrap();

    std::fs::write(photo_dir.join("1_kept.png"), b"kept").unwrap();
    std::fs::write(photo_dir.join("2_stray.png"), b"stray").unwrap();

    // A long grace period protects the fresh orphan.
    let cautious = OrphanPhotoSweeper::new(
        state.store().clone(),
        &photo_dir,
        Duration::from_secs(3600),
    );
    let report = cautious.sweep().await.unwrap();
    assert_eq!(report.scanned, 2);
    assert_eq!(report.removed, 0);
    assert_eq!(report.kept_recent, 1);
    assert!(photo_dir.join("2_stray.png").exists());

    let eager = OrphanPhotoSweeper::new(state.store().clone(), &photo_dir, Duration::ZERO);
    let report = eager.sweep().await.unwrap();
    assert_eq!(report.removed, 1);
    assert!(photo_dir.join("1_kept.png").exists());
    assert!(!photo_dir.join("2_stray.png").exists());
}

#[tokio::test]
async fn sweeper_tolerates_missing_directory() {
    let (state, _, _) = spawn_app().await;

    let missing = std::env::temp_dir().join(format!("complaint-desk-absent-{}", uuid::Uuid::new_v4()));
    let sweeper = OrphanPhotoSweeper::new(state.store().clone(), missing, Duration::ZERO);

    let report = sweeper.sweep().await.unwrap();
    assert_eq!(report.scanned, 0);
}
