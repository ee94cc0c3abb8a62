//! Inference server forwarding
//!
//! Sends a rewritten completion body to the configured inference server and
//! hands back its JSON response.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, instrument};

use crate::error::UpstreamError;
use crate::proxy::headers::build_upstream_headers;
use crate::routing::CanonicalConfig;

/// Endpoint appended to the inference server base URL
pub const COMPLETIONS_ENDPOINT: &str = "completions";

/// Join base URL and endpoint
///
/// No separator is inserted. The normalizer guarantees the base URL ends in
/// exactly one `/`.
pub fn construct_inference_url(base_url: &str, endpoint: &str) -> String {
    format!("{}{}", base_url, endpoint)
}

/// Something that can deliver a completion request upstream
///
/// Implementations make a single attempt; any failure comes back as an
/// [`UpstreamError`] for the caller to report.
#[async_trait]
pub trait InferenceForwarder: Send + Sync {
    /// Name for logging
    fn name(&self) -> &'static str;

    /// Forward a completion body and return the upstream response body
    async fn forward(&self, body: &Value, config: &CanonicalConfig) -> Result<Value, UpstreamError>;
}

/// Forwarder backed by a pooled reqwest client
#[derive(Debug, Clone)]
pub struct HttpForwarder {
    client: reqwest::Client,
}

impl HttpForwarder {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// Build the shared HTTP client
    ///
    /// Without a timeout the call waits as long as the backend does.
    pub fn build_client(timeout: Option<Duration>) -> reqwest::Result<reqwest::Client> {
        let mut builder = reqwest::Client::builder().pool_max_idle_per_host(100);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        builder.build()
    }
}

#[async_trait]
impl InferenceForwarder for HttpForwarder {
    fn name(&self) -> &'static str {
        "http"
    }

    #[instrument(skip(self, body, config), fields(url = tracing::field::Empty))]
    async fn forward(&self, body: &Value, config: &CanonicalConfig) -> Result<Value, UpstreamError> {
        let url = construct_inference_url(&config.inference_server_url, COMPLETIONS_ENDPOINT);
        tracing::Span::current().record("url", url.as_str());

        let headers = build_upstream_headers(config.api_key())?;
        debug!(
            url = %url,
            authenticated = config.api_key().is_some(),
            "Sending request to inference server"
        );

        let response = self
            .client
            .post(&url)
            .headers(headers)
            .json(body)
            .send()
            .await
            .map_err(|source| UpstreamError::Transport {
                url: url.clone(),
                source,
            })?;

        let status = response.status();
        debug!(url = %url, status = %status, "Received response from inference server");

        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(UpstreamError::Status {
                url,
                status: status.as_u16(),
                body: text,
            });
        }

        response
            .json::<Value>()
            .await
            .map_err(|source| UpstreamError::InvalidBody { url, source })
    }
}
