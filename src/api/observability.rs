use axum::{
    extract::{MatchedPath, Request, State},
    http::{HeaderValue, StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use std::time::Instant;
use tracing::{Instrument, Span, error, info, info_span};
use uuid::Uuid;

use crate::api::AppState;
use crate::constants::paths::PHOTO_URL_PREFIX;

pub async fn get_metrics(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    state.prometheus_handle.as_ref().map_or_else(
        || "Metrics not enabled or failed to initialize".to_string(),
        metrics_exporter_prometheus::PrometheusHandle::render,
    )
}

/// GET /health
pub async fn health(State(state): State<Arc<AppState>>) -> Response {
    match state.store().ping().await {
        Ok(()) => (StatusCode::OK, "OK").into_response(),
        Err(e) => {
            error!(error = %e, "Health check failed");
            (StatusCode::SERVICE_UNAVAILABLE, "Database unavailable").into_response()
        }
    }
}

fn outcome(status: u16) -> &'static str {
    match status {
        500.. => "error",
        400..=499 => "client_error",
        300..=399 => "redirect",
        _ => "success",
    }
}

/// Metrics label for a request path. Unmatched paths never become labels of
/// their own: uploaded photos share one and everything else is `fallback`.
fn metrics_route(matched: Option<&str>, path: &str) -> String {
    match matched {
        Some(route) => route.to_string(),
        None if path.starts_with(PHOTO_URL_PREFIX) => PHOTO_URL_PREFIX.to_string(),
        None => "fallback".to_string(),
    }
}

/// Handle to the `request` span, stored in the request extensions so inner
/// middleware can record fields on it.
#[derive(Clone)]
pub struct RequestSpan(pub Span);

/// Opens a `request` span carrying a fresh request id and emits one
/// `http_request_finished` event per request.
pub async fn logging_middleware(mut req: Request, next: Next) -> Response {
    let start = Instant::now();
    let request_id = Uuid::new_v4();
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let matched = req
        .extensions()
        .get::<MatchedPath>()
        .map(|mp| mp.as_str().to_string());
    let user_agent = req
        .headers()
        .get(header::USER_AGENT)
        .and_then(|h| h.to_str().ok())
        .unwrap_or("unknown")
        .to_string();

    let span = info_span!(
        "request",
        request_id = %request_id,
        method = %method,
        path = %path,
        route = matched.as_deref(),
        user_id = tracing::field::Empty,
    );
    req.extensions_mut().insert(RequestSpan(span.clone()));

    async move {
        let response = next.run(req).await;

        let elapsed = start.elapsed();
        let status = response.status().as_u16();

        let labels = [
            ("method", method.to_string()),
            ("path", metrics_route(matched.as_deref(), &path)),
            ("status", status.to_string()),
        ];
        metrics::counter!("http_requests_total", &labels).increment(1);
        metrics::histogram!("http_request_duration_seconds", &labels)
            .record(elapsed.as_secs_f64());

        info!(
            event = "http_request_finished",
            duration_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
            status_code = status,
            user_agent = %user_agent,
            outcome = outcome(status),
            "Request finished"
        );

        response
    }
    .instrument(span)
    .await
}

pub async fn security_headers_middleware(req: Request, next: Next) -> Response {
    let mut response = next.run(req).await;
    let headers = response.headers_mut();

    headers.insert(header::X_CONTENT_TYPE_OPTIONS, HeaderValue::from_static("nosniff"));
    headers.insert(header::X_FRAME_OPTIONS, HeaderValue::from_static("DENY"));
    headers.insert(header::REFERRER_POLICY, HeaderValue::from_static("same-origin"));
    headers.insert(
        header::CONTENT_SECURITY_POLICY,
        HeaderValue::from_static(
            "default-src 'self'; img-src 'self' data:; style-src 'self'; form-action 'self'; frame-ancestors 'none'; base-uri 'self'",
        ),
    );

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_buckets() {
        assert_eq!(outcome(200), "success");
        assert_eq!(outcome(303), "redirect");
        assert_eq!(outcome(409), "client_error");
        assert_eq!(outcome(503), "error");
    }

    #[test]
    fn test_photo_paths_share_a_label() {
        assert_eq!(metrics_route(None, "/user_profile/1_me.png"), "/user_profile");
        assert_eq!(metrics_route(Some("/student/login"), "/student/login"), "/student/login");
    }

    #[test]
    fn test_unmatched_paths_collapse_to_fallback() {
        assert_eq!(metrics_route(None, "/random-1"), "fallback");
        assert_eq!(metrics_route(None, "/random-2"), "fallback");
        assert_eq!(metrics_route(None, "/css/app.css"), "fallback");
    }
}
