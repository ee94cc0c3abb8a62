//! Health check endpoints
//!
//! - `/health` - status, version, uptime and routing summary
//! - `/health/live` - liveness probe

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;

use crate::AppState;

/// Health status enum
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded,
}

/// Routing summary
#[derive(Debug, Serialize)]
pub struct RoutingStats {
    pub models: usize,
    pub upstream_configured: bool,
}

/// Full health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub version: String,
    pub uptime_seconds: u64,
    pub timestamp: String,
    pub routing: RoutingStats,
}

/// Simple health response for liveness
#[derive(Debug, Serialize)]
pub struct SimpleHealthResponse {
    pub status: HealthStatus,
}

/// Full health check endpoint
///
/// Reports `degraded` when no inference server URL is configured, since every
/// forwarded request would then fail.
pub async fn health_check(State(state): State<Arc<AppState>>) -> (StatusCode, Json<HealthResponse>) {
    let upstream_configured = !state.routing.inference_server_url.is_empty();
    let status = if upstream_configured {
        HealthStatus::Healthy
    } else {
        HealthStatus::Degraded
    };

    let response = HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        timestamp: chrono::Utc::now().to_rfc3339(),
        routing: RoutingStats {
            models: state.routing.model_mapping.len(),
            upstream_configured,
        },
    };

    (StatusCode::OK, Json(response))
}

/// Liveness probe endpoint
pub async fn liveness_check() -> (StatusCode, Json<SimpleHealthResponse>) {
    (
        StatusCode::OK,
        Json(SimpleHealthResponse {
            status: HealthStatus::Healthy,
        }),
    )
}
