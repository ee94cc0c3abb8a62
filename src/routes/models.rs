//! Models endpoint
//!
//! Lists the configured aliases in the OpenAI models-list format.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
    error::AppResult,
    proxy::{RequestContext, RequestOutcome},
    routing::list_models as configured_models,
    AppState,
};

/// Route path, also used as the endpoint label in logs and metrics
pub const MODELS_PATH: &str = "/v1/models";

/// Fixed owner reported for every alias
pub const OWNED_BY: &str = "organization-name";

/// Where an alias points
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelAdditional {
    pub actual_model: String,
    pub api_name: Option<String>,
}

/// Model information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Model {
    pub id: String,
    pub object: String,
    pub owned_by: String,
    pub additional: ModelAdditional,
}

/// Models list response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelsResponse {
    pub object: String,
    pub data: Vec<Model>,
}

/// List configured aliases
pub async fn list_models(
    State(state): State<Arc<AppState>>,
) -> AppResult<(StatusCode, Json<ModelsResponse>)> {
    let ctx = RequestContext::new(MODELS_PATH);
    let data: Vec<Model> = configured_models(&state.routing)
        .into_iter()
        .map(|entry| Model {
            id: entry.alias,
            object: "model".to_string(),
            owned_by: OWNED_BY.to_string(),
            additional: ModelAdditional {
                actual_model: entry.actual_model,
                api_name: entry.api_name,
            },
        })
        .collect();

    info!(trace_id = %ctx.trace_id, count = data.len(), "Listed models");
    state.observer.observe(&ctx.finish(RequestOutcome::Success));

    Ok((
        StatusCode::OK,
        Json(ModelsResponse {
            object: "list".to_string(),
            data,
        }),
    ))
}
