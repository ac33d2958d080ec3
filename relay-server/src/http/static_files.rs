//! Static file serving for the embedded landing page

use axum::{
    body::Body,
    http::{StatusCode, Uri, header},
    response::{IntoResponse, Response},
};
use rust_embed::RustEmbed;

/// Embedded site assets (compiled into binary)
#[derive(RustEmbed)]
#[folder = "assets/"]
struct SiteAssets;

/// Handler for serving static files from embedded assets
///
/// Any path that doesn't match a real file falls back to index.html.
pub async fn static_handler(uri: Uri) -> impl IntoResponse {
    let path = uri.path().trim_start_matches('/');

    if let Some(response) = serve_file(path) {
        return response;
    }

    serve_file("index.html")
        .unwrap_or_else(|| (StatusCode::NOT_FOUND, "Not found").into_response())
}

/// Serve a file from embedded assets
fn serve_file(path: &str) -> Option<Response<Body>> {
    let file = SiteAssets::get(path)?;

    let mime = mime_guess::from_path(path).first_or_octet_stream();

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, mime.as_ref())
        .body(Body::from(file.data.into_owned()))
        .ok()
}
