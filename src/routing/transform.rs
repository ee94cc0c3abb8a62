//! Outbound request rewriting

use serde_json::Value;

use crate::routing::canonical::AliasMapping;

/// Build the outbound body for an inbound completion request
///
/// The result is an independent copy of `inbound`. When `inbound.model` is a
/// known alias the copy carries the concrete model name instead; otherwise
/// the copy is identical, including a missing `model` field.
pub fn rewrite(inbound: &Value, mapping: &AliasMapping) -> Value {
    let mut outbound = inbound.clone();

    let concrete = inbound
        .get("model")
        .and_then(Value::as_str)
        .and_then(|alias| mapping.get(alias));

    if let (Some(concrete), Some(fields)) = (concrete, outbound.as_object_mut()) {
        fields.insert("model".to_string(), Value::String(concrete.to_string()));
    }

    outbound
}

/// Alias named by a request body, if any
pub fn requested_alias(body: &Value) -> Option<&str> {
    body.get("model").and_then(Value::as_str)
}
