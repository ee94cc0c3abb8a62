//! HTTP routes for Vibe Router
//!
//! This module defines all HTTP endpoints exposed by the gateway.

pub mod completions;
pub mod health;
pub mod metrics;
pub mod models;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::AppState;

/// Create the main application router
pub fn create_router(state: Arc<AppState>) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        .route(completions::COMPLETIONS_PATH, post(completions::completions))
        .route(models::MODELS_PATH, get(models::list_models));

    let mut public_routes = Router::new()
        .route("/health", get(health::health_check))
        .route("/health/live", get(health::liveness_check));

    if let Some(exporter) = &state.metrics {
        public_routes = public_routes.route(&exporter.path, get(metrics::prometheus_metrics));
    }

    Router::new()
        .merge(public_routes)
        .merge(api_routes)
        // Outermost layer listed first
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors)
                .layer(CompressionLayer::new()),
        )
        .with_state(state)
}
