//! Models endpoint integration tests
//!
//! Tests for GET /v1/models under both config schemas.

use pretty_assertions::assert_eq;
use serde_json::{json, Value};

use vibe_router::{proxy::RequestOutcome, routes::models::ModelsResponse};

use crate::common::{test_data, RouterTestHarness};

#[tokio::test]
async fn test_list_models_legacy_schema() {
    let harness = RouterTestHarness::new(test_data::legacy_config()).await;

    let response = harness.server.get("/v1/models").await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(
        body,
        json!({
            "object": "list",
            "data": [
                {
                    "id": "thinker",
                    "object": "model",
                    "owned_by": "organization-name",
                    "additional": { "actual_model": "devstral-small-2507-mlx", "api_name": null }
                },
                {
                    "id": "coder",
                    "object": "model",
                    "owned_by": "organization-name",
                    "additional": { "actual_model": "mistral-small-3.2-24b-instruct-2506", "api_name": null }
                }
            ]
        })
    );
}

#[tokio::test]
async fn test_list_models_multi_backend_schema() {
    let harness = RouterTestHarness::new(test_data::multi_backend_config()).await;

    let response = harness.server.get("/v1/models").await;

    response.assert_status_ok();
    let body: ModelsResponse = response.json();
    let ids: Vec<&str> = body.data.iter().map(|m| m.id.as_str()).collect();
    assert_eq!(ids, vec!["thinker", "coder"]);

    assert_eq!(body.data[0].additional.api_name.as_deref(), Some("lmstudio"));
    assert_eq!(body.data[1].additional.api_name.as_deref(), Some("ollama"));
    assert_eq!(body.data[1].additional.actual_model, "qwen2.5-coder");
}

#[tokio::test]
async fn test_list_models_empty_mapping() {
    let harness = RouterTestHarness::new(json!({})).await;

    let body: ModelsResponse = harness.server.get("/v1/models").await.json();
    assert_eq!(body.object, "list");
    assert!(body.data.is_empty());
}

#[tokio::test]
async fn test_listing_does_not_call_upstream() {
    let harness = RouterTestHarness::new(test_data::legacy_config()).await;

    harness.server.get("/v1/models").await.assert_status_ok();
    assert!(harness.upstream.received_requests().await.is_empty());
}

#[tokio::test]
async fn test_listing_is_observed() {
    let harness = RouterTestHarness::new(test_data::legacy_config()).await;

    harness.server.get("/v1/models").await.assert_status_ok();

    let records = harness.observer.records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].endpoint, "/v1/models");
    assert_eq!(records[0].outcome, RequestOutcome::Success);
    assert_eq!(records[0].alias, None);
}
