//! Stand-in inference server for local development
//!
//! Answers `POST /completions` with a canned text completion that echoes the
//! requested model. Point `INFERENCE_BASE_URL` at it to exercise the gateway
//! without a real backend.

use std::net::SocketAddr;

use anyhow::{Context, Result};
use axum::{http::HeaderMap, routing::post, Json, Router};
use serde_json::{json, Value};
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

async fn completions(headers: HeaderMap, Json(body): Json<Value>) -> Json<Value> {
    let model = body
        .get("model")
        .and_then(Value::as_str)
        .unwrap_or("unknown")
        .to_string();
    info!(
        model = %model,
        authorized = headers.contains_key(axum::http::header::AUTHORIZATION),
        "Received completion request"
    );

    Json(json!({
        "id": "mock-id",
        "object": "text_completion",
        "created": chrono::Utc::now().timestamp(),
        "model": model,
        "choices": [
            {
                "text": "This is a mock response from the inference server.",
                "index": 0,
                "logprobs": null,
                "finish_reason": "length"
            }
        ]
    }))
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mock_inference=info".into()),
        )
        .init();

    let port: u16 = std::env::var("MOCK_PORT")
        .unwrap_or_else(|_| "5004".to_string())
        .parse()
        .context("Invalid MOCK_PORT")?;

    let app = Router::new()
        .route("/completions", post(completions))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        );

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!("Mock inference server running on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
