//! Health check for load balancers and uptime monitors.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use serde::Serialize;
use tracing::warn;

use crate::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// `ok` or `degraded`
    pub status: &'static str,
    pub timestamp: String,
    /// `connected` or `disconnected`
    pub database: &'static str,
}

/// `GET /api/health`
///
/// Answers 503 with `degraded` while the database is unreachable.
pub async fn health(State(state): State<Arc<AppState>>) -> (StatusCode, Json<HealthResponse>) {
    let database_ok = state.db.health_check().await;
    if !database_ok {
        warn!("Health check: database unreachable");
    }

    let (code, status, database) = if database_ok {
        (StatusCode::OK, "ok", "connected")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "degraded", "disconnected")
    };

    (
        code,
        Json(HealthResponse {
            status,
            timestamp: Utc::now().to_rfc3339(),
            database,
        }),
    )
}
