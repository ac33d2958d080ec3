//! Shared application state for the relay server

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use relay_core::ConnectionRegistry;
use relay_core::keepalive::DEFAULT_KEEPALIVE_INTERVAL;

/// Shared state accessible by all handlers
#[derive(Clone)]
pub struct AppState {
    /// Registry of connected devices
    pub registry: Arc<ConnectionRegistry>,
    /// Interval between periodic server messages to each device
    pub keepalive_interval: Duration,
    /// When the server started
    pub started_at: DateTime<Utc>,
}

impl AppState {
    /// Create a new AppState with an empty registry
    pub fn new(keepalive_interval: Duration) -> Self {
        Self {
            registry: Arc::new(ConnectionRegistry::new()),
            keepalive_interval,
            started_at: Utc::now(),
        }
    }

    /// Returns how long the server has been running
    pub fn uptime_seconds(&self) -> i64 {
        (Utc::now() - self.started_at).num_seconds()
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(DEFAULT_KEEPALIVE_INTERVAL)
    }
}
