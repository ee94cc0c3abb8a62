//! Process settings for Vibe Router
//!
//! Settings are loaded from environment variables (a `.env` file is honoured
//! by `main`). The routing table itself lives in the JSON file named by
//! `CONFIG_PATH`, see [`crate::routing`].

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::routing::EnvOverrides;
use crate::routing::normalize::{API_KEY_ENV, BASE_URL_ENV};

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

/// Application settings
#[derive(Debug, Clone)]
pub struct Settings {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,

    /// Path of the routing configuration file
    pub config_path: PathBuf,
    /// Overrides for the inference server URL and key
    pub overrides: EnvOverrides,

    /// Transport timeout for upstream calls, none by default
    pub upstream_timeout: Option<Duration>,

    /// Install the Prometheus recorder and expose it
    pub metrics_enabled: bool,
    /// Route serving Prometheus metrics
    pub metrics_path: String,

    pub log_format: LogFormat,
}

impl Settings {
    /// Load settings from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load settings through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.is_empty());

        Ok(Self {
            host: var("ROUTER_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: var("PORT")
                .unwrap_or_else(|| "3001".to_string())
                .parse()
                .context("Invalid PORT")?,

            config_path: var("CONFIG_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("config.json")),
            overrides: EnvOverrides::new(var(BASE_URL_ENV), var(API_KEY_ENV)),

            upstream_timeout: var("UPSTREAM_TIMEOUT_SECS")
                .map(|v| v.parse::<u64>().context("Invalid UPSTREAM_TIMEOUT_SECS"))
                .transpose()?
                .map(Duration::from_secs),

            metrics_enabled: var("METRICS_ENABLED")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(true),
            metrics_path: var("METRICS_PATH").unwrap_or_else(|| "/metrics".to_string()),

            log_format: match var("LOG_FORMAT").as_deref() {
                Some("json") => LogFormat::Json,
                _ => LogFormat::Pretty,
            },
        })
    }
}
