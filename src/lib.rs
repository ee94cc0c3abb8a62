//! Vibe Router - model-alias routing gateway
//!
//! Clients call OpenAI-style endpoints with a friendly model alias. The
//! gateway swaps the alias for the backend's concrete model name, forwards
//! the request to the inference server and relays the answer.

pub mod config;
pub mod error;
pub mod proxy;
pub mod routes;
pub mod routing;

use std::sync::Arc;
use std::time::Instant;

pub use crate::config::Settings;
pub use crate::error::{AppError, ConfigError, UpstreamError};
pub use crate::proxy::{HttpForwarder, InferenceForwarder, RequestObserver};
pub use crate::routes::metrics::MetricsExporter;
pub use crate::routing::CanonicalConfig;

/// Application state shared across all request handlers
///
/// Everything in here is built once at startup and only read afterwards.
pub struct AppState {
    /// Routing table and upstream target
    pub routing: CanonicalConfig,
    /// Delivers requests to the inference server
    pub forwarder: Arc<dyn InferenceForwarder>,
    /// Receives one record per forwarded request
    pub observer: Arc<dyn RequestObserver>,
    /// Prometheus exporter, when metrics are enabled
    pub metrics: Option<MetricsExporter>,
    pub start_time: Instant,
}

impl AppState {
    /// Create a new application state
    pub fn new(
        routing: CanonicalConfig,
        forwarder: Arc<dyn InferenceForwarder>,
        observer: Arc<dyn RequestObserver>,
    ) -> Self {
        Self {
            routing,
            forwarder,
            observer,
            metrics: None,
            start_time: Instant::now(),
        }
    }

    /// Expose a Prometheus exporter through the router
    pub fn with_metrics(mut self, exporter: MetricsExporter) -> Self {
        self.metrics = Some(exporter);
        self
    }
}
