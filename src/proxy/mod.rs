//! Proxy module
//!
//! Handles request forwarding to the inference server.

pub mod forwarder;
pub mod headers;
pub mod logging;

pub use forwarder::{construct_inference_url, HttpForwarder, InferenceForwarder, COMPLETIONS_ENDPOINT};
pub use logging::{
    CompositeObserver, RequestContext, RequestObserver, RequestOutcome, RequestRecord,
    TracingObserver,
};
