//! HTTP server module

mod api;
mod static_files;

use std::sync::Arc;

use axum::{Router, routing::get};
use tower_http::cors::CorsLayer;

use crate::AppState;
use crate::ws;

pub use api::HealthResponse;

/// Create the HTTP router with all routes configured
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/health", get(api::health))
        .route("/ws", get(ws::ws_handler))
        .with_state(state)
        .fallback(static_files::static_handler)
        .layer(CorsLayer::permissive())
}
