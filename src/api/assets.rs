use axum::{
    body::Body,
    http::{StatusCode, Uri, header},
    response::{Html, IntoResponse},
};
use rust_embed::RustEmbed;

use crate::views;

#[derive(RustEmbed)]
#[folder = "assets"]
struct Asset;

/// Serves the embedded stylesheet and placeholder image. Anything else is a
/// plain 404 page.
pub async fn serve_asset(uri: Uri) -> impl IntoResponse {
    let path = uri.path().trim_start_matches('/');

    match Asset::get(path) {
        Some(content) => {
            let mime = mime_guess::from_path(path).first_or_octet_stream();
            (
                [(header::CONTENT_TYPE, mime.as_ref())],
                Body::from(content.data),
            )
                .into_response()
        }
        None => (
            StatusCode::NOT_FOUND,
            Html(views::error_page(
                "Not Found",
                "The page you requested does not exist.",
            )),
        )
            .into_response(),
    }
}
