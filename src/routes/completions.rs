//! Completions endpoint
//!
//! OpenAI-compatible `/v1/completions`. The body is kept as free-form JSON:
//! only `model` is looked at, everything else is relayed untouched.

use std::sync::Arc;

use axum::{body::Bytes, extract::State, Json};
use serde_json::Value;
use tracing::Instrument;

use crate::{
    error::{AppError, AppResult},
    proxy::{RequestContext, RequestOutcome},
    routing::{requested_alias, rewrite},
    AppState,
};

/// Route path, also used as the endpoint label in logs
pub const COMPLETIONS_PATH: &str = "/v1/completions";

/// Handle completion requests
///
/// Rewrites the alias, forwards to the inference server and relays its JSON.
/// Upstream failures become an opaque 500; the cause is only logged.
pub async fn completions(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> AppResult<Json<Value>> {
    let inbound: Value = serde_json::from_slice(&body)
        .map_err(|e| AppError::BadRequest(format!("Invalid JSON body: {}", e)))?;

    let outbound = rewrite(&inbound, &state.routing.model_mapping);

    let ctx = RequestContext::new(COMPLETIONS_PATH)
        .with_alias(requested_alias(&inbound))
        .with_resolved_model(requested_alias(&outbound));
    ctx.log_request_start();

    let result = state
        .forwarder
        .forward(&outbound, &state.routing)
        .instrument(ctx.create_span())
        .await;

    match result {
        Ok(response) => {
            state.observer.observe(&ctx.finish(RequestOutcome::Success));
            Ok(Json(response))
        }
        Err(e) => {
            ctx.log_error(state.forwarder.name(), &e.to_string());
            state.observer.observe(&ctx.finish(RequestOutcome::Failure));
            Err(e.into())
        }
    }
}
