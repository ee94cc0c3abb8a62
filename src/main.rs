//! Vibe Router - model-alias routing gateway
//!
//! This is the main entry point for the gateway server.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::signal;
use tracing::{info, warn};

use vibe_router::{
    config::LogFormat,
    proxy::{CompositeObserver, TracingObserver},
    routes::{self, metrics::MetricsObserver},
    routing, AppState, HttpForwarder, MetricsExporter, Settings,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let settings = Settings::from_env()?;

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "vibe_router=info,tower_http=info".into());
    match settings.log_format {
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_target(true)
            .init(),
        LogFormat::Pretty => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .with_thread_ids(true)
            .init(),
    }

    info!("Starting Vibe Router");

    // An unreadable or unparsable routing config is fatal
    let routing = routing::load(&settings.config_path, &settings.overrides)
        .with_context(|| format!("Failed to load {}", settings.config_path.display()))?;
    info!(
        models = ?routing::list_aliases(&routing),
        inference_server_url = %routing.inference_server_url,
        "Configuration loaded successfully"
    );
    if routing.inference_server_url.is_empty() {
        warn!("No inference server URL configured; completions will fail");
    }

    let client = HttpForwarder::build_client(settings.upstream_timeout)?;
    let forwarder = Arc::new(HttpForwarder::new(client));

    let mut observer = CompositeObserver::new().with(Arc::new(TracingObserver));
    let mut exporter = None;
    if settings.metrics_enabled {
        let handle = routes::metrics::install_recorder()?;
        observer = observer.with(Arc::new(MetricsObserver));
        exporter = Some(MetricsExporter {
            handle,
            path: settings.metrics_path.clone(),
        });
        info!(path = %settings.metrics_path, "Metrics initialized");
    }

    let mut state = AppState::new(routing, forwarder, Arc::new(observer));
    if let Some(exporter) = exporter {
        state = state.with_metrics(exporter);
    }
    let state = Arc::new(state);
    info!("Application state initialized");

    // Build the router
    let app = routes::create_router(state);

    // Bind to address
    let addr: SocketAddr = format!("{}:{}", settings.host, settings.port).parse()?;
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    // Start server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Vibe Router shutdown complete");
    Ok(())
}

/// Handle graceful shutdown signals
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            warn!("Received Ctrl+C, initiating shutdown");
        }
        _ = terminate => {
            warn!("Received SIGTERM, initiating shutdown");
        }
    }
}
