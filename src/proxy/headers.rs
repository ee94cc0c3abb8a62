//! Header utilities for upstream requests
//!
//! Client headers are never copied upstream; the gateway sends its own
//! minimal set, with the configured credential when there is one.

use reqwest::header::{HeaderMap, HeaderValue, InvalidHeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE};

/// Build headers for a request to the inference server
///
/// `Authorization: Bearer <key>` is only present when `api_key` is given.
pub fn build_upstream_headers(api_key: Option<&str>) -> Result<HeaderMap, InvalidHeaderValue> {
    let mut headers = HeaderMap::new();

    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

    if let Some(api_key) = api_key {
        let mut value = HeaderValue::from_str(&format!("Bearer {}", api_key))?;
        value.set_sensitive(true);
        headers.insert(AUTHORIZATION, value);
    }

    Ok(headers)
}
