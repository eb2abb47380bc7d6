//! End-to-end tests for the student and complaint flows.

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
    response::Response,
};
use complaint_desk::api::AppState;
use complaint_desk::config::Config;
use http_body_util::BodyExt;
use sea_orm::ConnectionTrait;
use std::sync::{Arc, Mutex};
use tower::ServiceExt;
use tracing_subscriber::fmt::MakeWriter;

const BOUNDARY: &str = "complaint-desk-test-boundary";

struct TestApp {
    state: Arc<AppState>,
    router: Router,
}

async fn spawn_app() -> TestApp {
    spawn_app_with(|_| {}).await
}

async fn spawn_app_with(configure: impl FnOnce(&mut Config)) -> TestApp {
    let id = uuid::Uuid::new_v4();
    let db_path = std::env::temp_dir().join(format!("complaint-desk-api-test-{id}.db"));
    let photo_dir = std::env::temp_dir().join(format!("complaint-desk-api-photos-{id}"));

    let mut config = Config::default();
    config.general.database_path = format!("sqlite:{}", db_path.display());
    config.uploads.photo_dir = photo_dir.display().to_string();
    config.server.secure_cookies = false;
    config.observability.metrics_enabled = false;
    config.security.argon2_memory_cost_kib = 1024;
    config.security.argon2_time_cost = 1;
    config.security.argon2_parallelism = 1;
    configure(&mut config);

    let state = complaint_desk::api::create_app_state_from_config(config, None)
        .await
        .expect("failed to create app state");

    let router = complaint_desk::api::router(state.clone());
    TestApp { state, router }
}

/// Log sink shared between a scoped fmt subscriber and the test.
#[derive(Clone, Default)]
struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    fn contents(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }
}

impl std::io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for CapturedLogs {
    type Writer = Self;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

fn multipart_body(fields: &[(&str, &str)], photo: Option<(&str, &[u8])>) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    if let Some((filename, bytes)) = photo {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"photo\"; filename=\"{filename}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

fn registration_fields<'a>(enrollment: &'a str, email: &'a str) -> Vec<(&'a str, &'a str)> {
    vec![
        ("enrollmentNumber", enrollment),
        ("studentName", "Asha Rao"),
        ("email", email),
        ("department", "CSE"),
        ("course", "B.Tech"),
        ("password", "secret1"),
    ]
}

async fn post_multipart(app: &TestApp, fields: &[(&str, &str)], photo: Option<(&str, &[u8])>) -> Response {
    app.router
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/student/register")
                .header(
                    header::CONTENT_TYPE,
                    format!("multipart/form-data; boundary={BOUNDARY}"),
                )
                .body(Body::from(multipart_body(fields, photo)))
                .unwrap(),
        )
        .await
        .unwrap()
}

async fn register(app: &TestApp, enrollment: &str, email: &str) -> Response {
    post_multipart(app, &registration_fields(enrollment, email), None).await
}

async fn post_form(app: &TestApp, uri: &str, body: &str, cookie: Option<&str>) -> Response {
    let mut request = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
    if let Some(cookie) = cookie {
        request = request.header(header::COOKIE, cookie);
    }

    app.router
        .clone()
        .oneshot(request.body(Body::from(body.to_string())).unwrap())
        .await
        .unwrap()
}

async fn get(app: &TestApp, uri: &str, cookie: Option<&str>) -> Response {
    let mut request = Request::builder().uri(uri);
    if let Some(cookie) = cookie {
        request = request.header(header::COOKIE, cookie);
    }

    app.router
        .clone()
        .oneshot(request.body(Body::empty()).unwrap())
        .await
        .unwrap()
}

/// Logs in and returns the `name=value` session cookie on success.
async fn login(app: &TestApp, email: &str, password: &str) -> Option<String> {
    let response = post_form(
        app,
        "/student/login",
        &format!("email={email}&password={password}"),
        None,
    )
    .await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    if location(&response) != "/student/dashboard" {
        return None;
    }

    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .expect("login should set a session cookie")
        .to_str()
        .unwrap();
    Some(set_cookie.split(';').next().unwrap().to_string())
}

fn location(response: &Response) -> &str {
    response
        .headers()
        .get(header::LOCATION)
        .map_or("", |v| v.to_str().unwrap())
}

async fn body_text(response: Response) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

async fn stored_hash(app: &TestApp, email: &str) -> String {
    app.state
        .store()
        .get_student_credentials(email)
        .await
        .unwrap()
        .expect("student should exist")
        .1
}

#[tokio::test]
async fn register_without_photo_stores_hashed_password() {
    let app = spawn_app().await;

    let response = register(&app, "EN-1", "Asha@X.com ").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/student/login");

    let (student, hash) = app
        .state
        .store()
        .get_student_credentials("asha@x.com")
        .await
        .unwrap()
        .expect("student should be stored under the normalized email");

    assert_eq!(student.enrollment_number, "EN-1");
    assert_eq!(student.student_name, "Asha Rao");
    assert_eq!(student.photo_path, None);
    assert_ne!(hash, "secret1");
    assert!(hash.starts_with("$argon2"));
}

#[tokio::test]
async fn register_with_photo_saves_file_and_serves_it() {
    let app = spawn_app().await;
    let photo: &[u8] = b"\x89PNG\r\n\x1a\nnot-really-a-png";

    let response = post_multipart(
        &app,
        &registration_fields("EN-2", "photo@x.com"),
        Some(("me.png", photo)),
    )
    .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let student = app
        .state
        .store()
        .get_student_by_email("photo@x.com")
        .await
        .unwrap()
        .unwrap();
    let filename = student.photo_path.clone().expect("photo path should be set");
    assert!(filename.ends_with("_me.png"));
    assert!(!filename.contains('/'));

    let on_disk = app.state.photo_store().dir().join(&filename);
    assert_eq!(std::fs::read(&on_disk).unwrap(), photo);

    let served = get(&app, &format!("/user_profile/{filename}"), None).await;
    assert_eq!(served.status(), StatusCode::OK);

    let cookie = login(&app, "photo@x.com", "secret1").await.unwrap();
    let dashboard = body_text(get(&app, "/student/dashboard", Some(&cookie)).await).await;
    assert!(dashboard.contains(&format!("/user_profile/{filename}")));
}

#[tokio::test]
async fn register_rejects_unsupported_photo_type() {
    let app = spawn_app().await;

    let response = post_multipart(
        &app,
        &registration_fields("EN-3", "exe@x.com"),
        Some(("run.exe", b"MZ")),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let student = app.state.store().get_student_by_email("exe@x.com").await.unwrap();
    assert!(student.is_none());
}

#[tokio::test]
async fn duplicate_registration_conflicts() {
    let app = spawn_app().await;

    assert_eq!(register(&app, "EN-1", "dup@x.com").await.status(), StatusCode::SEE_OTHER);

    let same_email = register(&app, "EN-9", "DUP@x.com").await;
    assert_eq!(same_email.status(), StatusCode::CONFLICT);
    let body = body_text(same_email).await;
    assert!(body.contains("already registered"));
    // Non-sensitive fields are kept on the re-rendered form.
    assert!(body.contains("EN-9"));

    let same_enrollment = register(&app, "EN-1", "other@x.com").await;
    assert_eq!(same_enrollment.status(), StatusCode::CONFLICT);

    assert_eq!(app.state.store().count_students().await.unwrap(), 1);
}

#[tokio::test]
async fn register_missing_field_is_bad_request() {
    let app = spawn_app().await;

    let fields = [
        ("enrollmentNumber", "EN-4"),
        ("email", "nameless@x.com"),
        ("department", "CSE"),
        ("course", "B.Tech"),
        ("password", "secret1"),
    ];
    let response = post_multipart(&app, &fields, None).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(body_text(response).await.contains("Name is required"));

    let bad_email = register(&app, "EN-5", "not-an-email").await;
    assert_eq!(bad_email.status(), StatusCode::BAD_REQUEST);

    assert_eq!(app.state.store().count_students().await.unwrap(), 0);
}

#[tokio::test]
async fn login_failure_redirects_with_error_flag() {
    let app = spawn_app().await;
    register(&app, "EN-1", "a@x.com").await;

    let wrong_password = post_form(&app, "/student/login", "email=a@x.com&password=nope", None).await;
    assert_eq!(wrong_password.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&wrong_password), "/student/login?error");

    let unknown = post_form(&app, "/student/login", "email=ghost@x.com&password=secret1", None).await;
    assert_eq!(location(&unknown), "/student/login?error");

    let page = body_text(get(&app, "/student/login?error", None).await).await;
    assert!(page.contains("Invalid email or password"));
}

#[tokio::test]
async fn login_accepts_username_field() {
    let app = spawn_app().await;
    register(&app, "EN-1", "a@x.com").await;

    let response = post_form(&app, "/student/login", "username=a@x.com&password=secret1", None).await;
    assert_eq!(location(&response), "/student/dashboard");
}

#[tokio::test]
async fn protected_routes_redirect_anonymous_users() {
    let app = spawn_app().await;

    for uri in [
        "/student/dashboard",
        "/student/student_profile",
        "/complaint",
        "/student/allComplaints",
        "/student/myComplaints",
    ] {
        let response = get(&app, uri, None).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER, "{uri}");
        assert_eq!(location(&response), "/student/login", "{uri}");
    }

    let submit = post_form(
        &app,
        "/registerComplaint",
        "complaintType=Hostel&description=leak",
        None,
    )
    .await;
    assert_eq!(location(&submit), "/student/login");

    let update = post_form(
        &app,
        "/student/updatePassword",
        "currentPassword=a&newPassword=b&confirmPassword=b",
        None,
    )
    .await;
    assert_eq!(location(&update), "/student/login");

    assert_eq!(app.state.store().count_complaints().await.unwrap(), 0);
}

#[tokio::test]
async fn password_change_requires_relogin_with_new_password() {
    let app = spawn_app().await;
    register(&app, "EN-1", "a@x.com").await;
    let cookie = login(&app, "a@x.com", "secret1").await.unwrap();

    let response = post_form(
        &app,
        "/student/updatePassword",
        "currentPassword=secret1&newPassword=secret2&confirmPassword=secret2",
        Some(&cookie),
    )
    .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/student/login");

    // The old session is gone.
    let dashboard = get(&app, "/student/dashboard", Some(&cookie)).await;
    assert_eq!(location(&dashboard), "/student/login");

    assert!(login(&app, "a@x.com", "secret1").await.is_none());
    assert!(login(&app, "a@x.com", "secret2").await.is_some());
}

#[tokio::test]
async fn password_change_mismatch_leaves_hash_untouched() {
    let app = spawn_app().await;
    register(&app, "EN-1", "a@x.com").await;
    let cookie = login(&app, "a@x.com", "secret1").await.unwrap();
    let before = stored_hash(&app, "a@x.com").await;

    let mismatch = post_form(
        &app,
        "/student/updatePassword",
        "currentPassword=secret1&newPassword=secret2&confirmPassword=secret3",
        Some(&cookie),
    )
    .await;
    assert_eq!(mismatch.status(), StatusCode::BAD_REQUEST);
    assert!(body_text(mismatch).await.contains("do not match"));

    let wrong_current = post_form(
        &app,
        "/student/updatePassword",
        "currentPassword=wrong&newPassword=secret2&confirmPassword=secret2",
        Some(&cookie),
    )
    .await;
    assert_eq!(wrong_current.status(), StatusCode::BAD_REQUEST);
    assert!(body_text(wrong_current).await.contains("Current password is incorrect"));

    assert_eq!(stored_hash(&app, "a@x.com").await, before);

    // Session survives a rejected change.
    let profile = get(&app, "/student/student_profile", Some(&cookie)).await;
    assert_eq!(profile.status(), StatusCode::OK);
}

#[tokio::test]
async fn my_complaints_only_lists_the_session_student() {
    let app = spawn_app().await;
    register(&app, "EN-A", "a@x.com").await;
    register(&app, "EN-B", "b@x.com").await;

    let cookie_a = login(&app, "a@x.com", "secret1").await.unwrap();
    let cookie_b = login(&app, "b@x.com", "secret1").await.unwrap();

    let from_a = post_form(
        &app,
        "/registerComplaint",
        "complaintType=Hostel&description=Water+leak+in+A+block",
        Some(&cookie_a),
    )
    .await;
    assert_eq!(location(&from_a), "/student/dashboard");

    let from_b = post_form(
        &app,
        "/registerComplaint",
        "complaintType=Library&description=Too+few+seats",
        Some(&cookie_b),
    )
    .await;
    assert_eq!(location(&from_b), "/student/dashboard");

    let mine = get(&app, "/student/myComplaints", Some(&cookie_a)).await;
    assert_eq!(mine.status(), StatusCode::OK);
    let mine = body_text(mine).await;
    assert!(mine.contains("Water leak in A block"));
    assert!(!mine.contains("Too few seats"));

    let listed = app.state.complaint_service().list_by_email("a@x.com").await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].email, "a@x.com");

    let all = body_text(get(&app, "/student/allComplaints", Some(&cookie_a)).await).await;
    let first = all.find("Water leak in A block").unwrap();
    let second = all.find("Too few seats").unwrap();
    assert!(first < second);
}

#[tokio::test]
async fn complaint_identity_comes_from_session() {
    let app = spawn_app().await;
    register(&app, "EN-A", "a@x.com").await;
    let cookie = login(&app, "a@x.com", "secret1").await.unwrap();

    let response = post_form(
        &app,
        "/registerComplaint",
        "enrollmentNumber=EN-Z&name=Mallory&email=b%40x.com&course=MBA&department=HR\
         &complaintType=Hostel&description=++Leaky+tap%0ARoom+12",
        Some(&cookie),
    )
    .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/student/dashboard");

    let complaints = app.state.complaint_service().list_all().await.unwrap();
    assert_eq!(complaints.len(), 1);

    let complaint = &complaints[0];
    assert_eq!(complaint.enrollment_number, "EN-A");
    assert_eq!(complaint.name, "Asha Rao");
    assert_eq!(complaint.email, "a@x.com");
    assert_eq!(complaint.course, "B.Tech");
    assert_eq!(complaint.department, "CSE");
    assert_eq!(complaint.complaint_type, "Hostel");
    assert_eq!(complaint.description, "  Leaky tap\nRoom 12");

    // The flash is shown once.
    let first = body_text(get(&app, "/student/dashboard", Some(&cookie)).await).await;
    assert!(first.contains("Complaint registered successfully."));
    let second = body_text(get(&app, "/student/dashboard", Some(&cookie)).await).await;
    assert!(!second.contains("Complaint registered successfully."));
}

#[tokio::test]
async fn empty_complaint_is_rejected() {
    let app = spawn_app().await;
    register(&app, "EN-A", "a@x.com").await;
    let cookie = login(&app, "a@x.com", "secret1").await.unwrap();

    let response = post_form(
        &app,
        "/registerComplaint",
        "complaintType=Hostel&description=+++",
        Some(&cookie),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(body_text(response).await.contains("Description is required"));
    assert_eq!(app.state.store().count_complaints().await.unwrap(), 0);
}

#[tokio::test]
async fn logout_ends_the_session() {
    let app = spawn_app().await;
    register(&app, "EN-A", "a@x.com").await;
    let cookie = login(&app, "a@x.com", "secret1").await.unwrap();

    let response = post_form(&app, "/student/logout", "", Some(&cookie)).await;
    assert_eq!(location(&response), "/student/login?logout");

    let dashboard = get(&app, "/student/dashboard", Some(&cookie)).await;
    assert_eq!(location(&dashboard), "/student/login");
}

#[tokio::test]
async fn upload_failure_is_server_error_and_stores_nothing() {
    let blocker = std::env::temp_dir().join(format!(
        "complaint-desk-not-a-dir-{}",
        uuid::Uuid::new_v4()
    ));
    std::fs::write(&blocker, b"plain file").unwrap();
    let photo_dir = blocker.display().to_string();

    let app = spawn_app_with(|config| config.uploads.photo_dir = photo_dir).await;

    let response = post_multipart(
        &app,
        &registration_fields("EN-7", "upload@x.com"),
        Some(("me.png", b"\x89PNG\r\n\x1a\nbytes")),
    )
    .await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_text(response).await;
    assert!(body.contains("Failed to upload photo"));
    assert!(body.contains("EN-7"));

    assert_eq!(app.state.store().count_students().await.unwrap(), 0);
}

#[tokio::test]
async fn complaint_storage_failure_rerenders_form() {
    let app = spawn_app().await;
    register(&app, "EN-A", "a@x.com").await;
    let cookie = login(&app, "a@x.com", "secret1").await.unwrap();

    app.state
        .store()
        .conn
        .execute_unprepared("DROP TABLE complaints")
        .await
        .unwrap();

    let response = post_form(
        &app,
        "/registerComplaint",
        "complaintType=Hostel&description=Broken+fan",
        Some(&cookie),
    )
    .await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_text(response).await;
    assert!(body.contains("An error occurred while registering the complaint. Please try again."));
    assert!(body.contains("registerComplaint"));

    // No flash is left behind for a failed submission.
    let dashboard = body_text(get(&app, "/student/dashboard", Some(&cookie)).await).await;
    assert!(!dashboard.contains("Complaint registered successfully."));
}

#[tokio::test]
async fn request_log_carries_the_session_student() {
    let app = spawn_app().await;
    register(&app, "EN-A", "a@x.com").await;
    let cookie = login(&app, "a@x.com", "secret1").await.unwrap();

    let logs = CapturedLogs::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(logs.clone())
        .with_ansi(false)
        .finish();
    let guard = tracing::subscriber::set_default(subscriber);

    let response = get(&app, "/student/dashboard", Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::OK);
    drop(guard);

    let output = logs.contents();
    let finished = output
        .lines()
        .find(|line| line.contains("Request finished") && line.contains("/student/dashboard"))
        .unwrap_or_else(|| panic!("no request log line in:\n{output}"));
    assert!(finished.contains("user_id"), "{finished}");
    assert!(finished.contains("a@x.com"), "{finished}");
}
