//! REST API handlers

use std::sync::Arc;

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};

use crate::AppState;

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Status of the server
    pub status: String,
    /// Server version
    pub version: String,
    /// Seconds since server started
    pub uptime_seconds: i64,
    /// Number of registered device connections
    pub connected_devices: usize,
}

/// Health check endpoint
///
/// Returns server status, version, uptime, and connected device count.
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let connected_devices = state.registry.device_count().await;

    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.uptime_seconds(),
        connected_devices,
    })
}
