//! Prometheus metrics endpoint
//!
//! Exposes application metrics in Prometheus format for monitoring. The
//! exporter handle is created by `main` and carried in [`AppState`].

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::IntoResponse};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};

use crate::{
    proxy::{RequestObserver, RequestRecord},
    AppState,
};

/// Exporter handle plus the route it is served on
#[derive(Clone)]
pub struct MetricsExporter {
    pub handle: PrometheusHandle,
    pub path: String,
}

/// Install the process-wide Prometheus recorder (call once at startup)
pub fn install_recorder() -> Result<PrometheusHandle, BuildError> {
    let handle = PrometheusBuilder::new().install_recorder()?;
    describe_metrics();
    Ok(handle)
}

/// Describe all custom metrics
fn describe_metrics() {
    metrics::describe_counter!(
        "vibe_router_requests_total",
        "Total number of routed requests by endpoint"
    );
    metrics::describe_histogram!(
        "vibe_router_request_duration_seconds",
        "Request duration in seconds"
    );
}

/// Prometheus metrics endpoint handler
pub async fn prometheus_metrics(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match &state.metrics {
        Some(exporter) => (StatusCode::OK, exporter.handle.render()),
        None => (StatusCode::NOT_FOUND, String::new()),
    }
}

/// Record a completed request
pub fn record_request(endpoint: &str, status: &str, alias: &str, model: &str, duration_secs: f64) {
    metrics::counter!(
        "vibe_router_requests_total",
        "endpoint" => endpoint.to_string(),
        "status" => status.to_string(),
        "alias" => alias.to_string(),
        "model" => model.to_string()
    )
    .increment(1);
    metrics::histogram!(
        "vibe_router_request_duration_seconds",
        "endpoint" => endpoint.to_string(),
        "model" => model.to_string()
    )
    .record(duration_secs);
}

/// Observer feeding request records into the metrics recorder
#[derive(Debug, Default, Clone, Copy)]
pub struct MetricsObserver;

impl RequestObserver for MetricsObserver {
    fn observe(&self, record: &RequestRecord) {
        record_request(
            &record.endpoint,
            record.outcome.as_str(),
            record.alias.as_deref().unwrap_or("unknown"),
            record.resolved_model.as_deref().unwrap_or("unknown"),
            record.duration.as_secs_f64(),
        );
    }
}
