//! Per-request logging
//!
//! [`RequestContext`] follows one request through the gateway with a short
//! correlation id. When the request finishes it produces a [`RequestRecord`]
//! which is handed to the injected [`RequestObserver`]s.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, error, info, Span};
use uuid::Uuid;

/// How a forwarded request ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestOutcome {
    Success,
    Failure,
}

impl RequestOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestOutcome::Success => "success",
            RequestOutcome::Failure => "error",
        }
    }
}

/// Everything an external logger or metrics exporter needs about a request
#[derive(Debug, Clone, PartialEq)]
pub struct RequestRecord {
    pub trace_id: String,
    pub endpoint: String,
    /// Model name the client asked for
    pub alias: Option<String>,
    /// Model name actually sent upstream
    pub resolved_model: Option<String>,
    pub duration: Duration,
    pub outcome: RequestOutcome,
}

/// Receiver of finished request records
///
/// Called inline on the request path, so implementations must be cheap and
/// must not fail.
pub trait RequestObserver: Send + Sync {
    fn observe(&self, record: &RequestRecord);
}

/// Observer that writes each record to the tracing log
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl RequestObserver for TracingObserver {
    fn observe(&self, record: &RequestRecord) {
        info!(
            trace_id = %record.trace_id,
            endpoint = %record.endpoint,
            alias = ?record.alias,
            model = ?record.resolved_model,
            status = record.outcome.as_str(),
            elapsed_ms = %record.duration.as_millis(),
            "Request recorded"
        );
    }
}

/// Fans a record out to several observers
#[derive(Default, Clone)]
pub struct CompositeObserver {
    observers: Vec<Arc<dyn RequestObserver>>,
}

impl CompositeObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, observer: Arc<dyn RequestObserver>) -> Self {
        self.observers.push(observer);
        self
    }

    pub fn len(&self) -> usize {
        self.observers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }
}

impl RequestObserver for CompositeObserver {
    fn observe(&self, record: &RequestRecord) {
        for observer in &self.observers {
            observer.observe(record);
        }
    }
}

/// Context for tracking a request through the gateway
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// Short identifier for log correlation
    pub trace_id: String,
    pub start_time: Instant,
    pub endpoint: String,
    pub alias: Option<String>,
    pub resolved_model: Option<String>,
}

impl RequestContext {
    pub fn new(endpoint: &str) -> Self {
        Self {
            trace_id: Uuid::new_v4().to_string()[..8].to_string(),
            start_time: Instant::now(),
            endpoint: endpoint.to_string(),
            alias: None,
            resolved_model: None,
        }
    }

    pub fn with_alias(mut self, alias: Option<&str>) -> Self {
        self.alias = alias.map(str::to_string);
        self
    }

    pub fn with_resolved_model(mut self, model: Option<&str>) -> Self {
        self.resolved_model = model.map(str::to_string);
        self
    }

    pub fn elapsed_ms(&self) -> u128 {
        self.start_time.elapsed().as_millis()
    }

    /// Whether the alias was rewritten on the way out
    pub fn was_rewritten(&self) -> bool {
        self.alias.is_some() && self.alias != self.resolved_model
    }

    pub fn log_request_start(&self) {
        info!(
            trace_id = %self.trace_id,
            endpoint = %self.endpoint,
            alias = ?self.alias,
            model = ?self.resolved_model,
            "Request started"
        );
        if self.alias.is_some() && !self.was_rewritten() {
            debug!(
                trace_id = %self.trace_id,
                alias = ?self.alias,
                "Alias not in mapping, forwarding unchanged"
            );
        }
    }

    /// Log a failure with its internal detail
    pub fn log_error(&self, forwarder: &str, error: &str) {
        error!(
            trace_id = %self.trace_id,
            forwarder = %forwarder,
            endpoint = %self.endpoint,
            alias = ?self.alias,
            model = ?self.resolved_model,
            elapsed_ms = %self.elapsed_ms(),
            error = %error,
            "Request failed"
        );
    }

    /// Close the context into a record
    pub fn finish(&self, outcome: RequestOutcome) -> RequestRecord {
        RequestRecord {
            trace_id: self.trace_id.clone(),
            endpoint: self.endpoint.clone(),
            alias: self.alias.clone(),
            resolved_model: self.resolved_model.clone(),
            duration: self.start_time.elapsed(),
            outcome,
        }
    }

    pub fn create_span(&self) -> Span {
        tracing::info_span!(
            "route_request",
            trace_id = %self.trace_id,
            endpoint = %self.endpoint,
            alias = ?self.alias,
        )
    }
}
