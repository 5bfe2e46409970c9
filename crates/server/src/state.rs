//! Application state for the Maharitage API server.
//!
//! Health endpoints use this directly; the auth and contact routes carry
//! their own service as Axum state.

use crate::config::AppConfig;
use crate::db::DbPool;
use std::sync::Arc;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: DbPool,

    /// Application configuration
    pub config: Arc<AppConfig>,

    /// Server start time for uptime calculation
    pub start_time: std::time::Instant,
}

impl AppState {
    /// Create a new application state.
    pub fn new(db: DbPool, config: Arc<AppConfig>) -> Self {
        Self {
            db,
            config,
            start_time: std::time::Instant::now(),
        }
    }

    /// Get the server uptime in seconds.
    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}
