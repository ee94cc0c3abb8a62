//! Completions endpoint integration tests
//!
//! Tests for POST /v1/completions:
//! - Alias rewriting before forwarding
//! - Pass-through of unknown or missing models
//! - Credential handling
//! - Opaque errors on upstream failure

use axum::http::{header::AUTHORIZATION, HeaderValue, StatusCode};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

use vibe_router::proxy::RequestOutcome;

use crate::common::{constants, test_data, RouterTestHarness};

#[tokio::test]
async fn test_alias_is_rewritten_before_forwarding() {
    let harness = RouterTestHarness::new(test_data::legacy_config()).await;
    harness
        .upstream
        .mock_completion_for_model("devstral-small-2507-mlx")
        .await;

    let response = harness
        .server
        .post("/v1/completions")
        .json(&test_data::completion_request("thinker"))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["id"], "mock-id");
    assert_eq!(body["model"], "devstral-small-2507-mlx");

    let sent = harness.upstream.received_bodies().await;
    assert_eq!(
        sent,
        vec![json!({
            "model": "devstral-small-2507-mlx",
            "prompt": "Say hello",
            "max_tokens": 16,
            "stop": ["\n"]
        })]
    );
}

#[tokio::test]
async fn test_unknown_alias_passes_through() {
    let harness = RouterTestHarness::new(test_data::legacy_config()).await;
    harness.upstream.mock_completion_for_model("gpt-oss-20b").await;

    let response = harness
        .server
        .post("/v1/completions")
        .json(&test_data::completion_request("gpt-oss-20b"))
        .await;

    response.assert_status_ok();
    let sent = harness.upstream.received_bodies().await;
    assert_eq!(sent[0]["model"], "gpt-oss-20b");
}

#[tokio::test]
async fn test_missing_model_is_not_invented() {
    let harness = RouterTestHarness::new(test_data::legacy_config()).await;
    harness.upstream.mock_completion_success("default").await;

    let response = harness
        .server
        .post("/v1/completions")
        .json(&json!({ "prompt": "Hello" }))
        .await;

    response.assert_status_ok();
    let sent = harness.upstream.received_bodies().await;
    assert_eq!(sent, vec![json!({ "prompt": "Hello" })]);
}

#[tokio::test]
async fn test_bearer_key_is_sent_when_configured() {
    let harness = RouterTestHarness::new(test_data::legacy_config()).await;
    harness
        .upstream
        .mock_completion_requires_key(constants::TEST_API_KEY)
        .await;

    let response = harness
        .server
        .post("/v1/completions")
        .json(&test_data::completion_request("thinker"))
        .await;

    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["model"], "keyed");
}

#[tokio::test]
async fn test_env_api_key_override_is_sent() {
    let harness =
        RouterTestHarness::with_api_key(test_data::legacy_config(), Some("env-key")).await;
    harness.upstream.mock_completion_requires_key("env-key").await;

    let response = harness
        .server
        .post("/v1/completions")
        .json(&test_data::completion_request("thinker"))
        .await;

    response.assert_status_ok();
}

#[tokio::test]
async fn test_no_authorization_header_without_key() {
    let harness = RouterTestHarness::new(json!({ "modelMapping": { "thinker": "real-1" } })).await;
    harness.upstream.mock_completion_success("real-1").await;

    harness
        .server
        .post("/v1/completions")
        .json(&test_data::completion_request("thinker"))
        .await
        .assert_status_ok();

    let requests = harness.upstream.received_requests().await;
    assert_eq!(requests.len(), 1);
    assert!(requests[0].headers.get("authorization").is_none());
}

#[tokio::test]
async fn test_client_authorization_is_not_forwarded() {
    let harness = RouterTestHarness::new(json!({ "modelMapping": { "thinker": "real-1" } })).await;
    harness.upstream.mock_completion_success("real-1").await;

    harness
        .server
        .post("/v1/completions")
        .add_header(AUTHORIZATION, HeaderValue::from_static("Bearer client-token"))
        .json(&test_data::completion_request("thinker"))
        .await
        .assert_status_ok();

    let requests = harness.upstream.received_requests().await;
    assert!(requests[0].headers.get("authorization").is_none());
}

#[tokio::test]
async fn test_upstream_error_is_opaque() {
    let harness = RouterTestHarness::new(test_data::legacy_config()).await;
    harness
        .upstream
        .mock_completion_error(503, "CUDA out of memory on node gpu-7")
        .await;

    let response = harness
        .server
        .post("/v1/completions")
        .json(&test_data::completion_request("thinker"))
        .await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    let text = response.text();
    assert!(text.contains("Internal server error"));
    assert!(!text.contains("CUDA"));
    assert!(!text.contains("gpu-7"));
}

#[tokio::test]
async fn test_connection_failure_is_opaque() {
    let harness = RouterTestHarness::with_unreachable_upstream(test_data::legacy_config()).await;

    let response = harness
        .server
        .post("/v1/completions")
        .json(&test_data::completion_request("thinker"))
        .await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    let text = response.text();
    let body: Value = serde_json::from_str(&text).unwrap();
    assert_eq!(body["error"]["code"], "INTERNAL_ERROR");
    assert_eq!(body["error"]["message"], "Internal server error");
    assert!(!text.contains("127.0.0.1"));
    assert!(!text.contains("error sending request"));

    let records = harness.observer.records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].outcome, RequestOutcome::Failure);
    assert_eq!(records[0].resolved_model.as_deref(), Some("devstral-small-2507-mlx"));
}

#[tokio::test]
async fn test_unparsable_upstream_body_is_an_error() {
    let harness = RouterTestHarness::new(test_data::legacy_config()).await;
    harness.upstream.mock_completion_garbage().await;

    let response = harness
        .server
        .post("/v1/completions")
        .json(&test_data::completion_request("thinker"))
        .await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    assert!(!response.text().contains("gateway timeout page"));
}

#[tokio::test]
async fn test_invalid_json_body_is_bad_request() {
    let harness = RouterTestHarness::new(test_data::legacy_config()).await;

    let response = harness
        .server
        .post("/v1/completions")
        .text("{ not json")
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "BAD_REQUEST");
    assert!(harness.upstream.received_requests().await.is_empty());
}

#[tokio::test]
async fn test_observer_receives_success_and_failure_records() {
    let harness = RouterTestHarness::new(test_data::legacy_config()).await;
    harness
        .upstream
        .mock_completion_for_model("devstral-small-2507-mlx")
        .await;

    harness
        .server
        .post("/v1/completions")
        .json(&test_data::completion_request("thinker"))
        .await
        .assert_status_ok();

    // No mock matches this model, so wiremock answers 404
    harness
        .server
        .post("/v1/completions")
        .json(&test_data::completion_request("coder"))
        .await
        .assert_status(StatusCode::INTERNAL_SERVER_ERROR);

    let records = harness.observer.records();
    assert_eq!(records.len(), 2);

    assert_eq!(records[0].endpoint, "/v1/completions");
    assert_eq!(records[0].alias.as_deref(), Some("thinker"));
    assert_eq!(records[0].resolved_model.as_deref(), Some("devstral-small-2507-mlx"));
    assert_eq!(records[0].outcome, RequestOutcome::Success);

    assert_eq!(records[1].alias.as_deref(), Some("coder"));
    assert_eq!(
        records[1].resolved_model.as_deref(),
        Some("mistral-small-3.2-24b-instruct-2506")
    );
    assert_eq!(records[1].outcome, RequestOutcome::Failure);
}

#[tokio::test]
async fn test_multi_backend_aliases_are_rewritten() {
    let harness = RouterTestHarness::new(test_data::multi_backend_config()).await;
    harness.upstream.mock_completion_for_model("qwen2.5-coder").await;
    // Bound to an undeclared backend, so dropped from the mapping
    harness.upstream.mock_completion_for_model("ghost").await;

    harness
        .server
        .post("/v1/completions")
        .json(&test_data::completion_request("coder"))
        .await
        .assert_status_ok();

    harness
        .server
        .post("/v1/completions")
        .json(&test_data::completion_request("ghost"))
        .await
        .assert_status_ok();

    let requests = harness.upstream.received_requests().await;
    assert_eq!(requests.len(), 2);
    assert!(requests.iter().all(|r| r.url.path() == "/completions"));
}
