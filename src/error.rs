//! Error types for Vibe Router
//!
//! Configuration errors are fatal at startup. Upstream errors are recovered
//! per request and turned into an opaque response at the handler boundary.

use std::path::PathBuf;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Failure to produce a canonical configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Error reading config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Error parsing config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Failure talking to the inference backend
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("Request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Upstream {url} returned {status}: {body}")]
    Status {
        url: String,
        status: u16,
        body: String,
    },

    #[error("Inference API key is not a valid header value")]
    InvalidCredential(#[from] reqwest::header::InvalidHeaderValue),

    #[error("Upstream {url} returned an unparsable body: {source}")]
    InvalidBody {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

/// Application-level errors surfaced by request handlers
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error(transparent)]
    Upstream(#[from] UpstreamError),
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

/// Error details
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Upstream detail stays in the logs, never in the client body
        let (status, code, message) = match &self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::Upstream(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "Internal server error".to_string(),
            ),
        };

        let body = ErrorResponse {
            error: ErrorBody {
                code: code.to_string(),
                message,
            },
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for convenience
pub type AppResult<T> = Result<T, AppError>;
