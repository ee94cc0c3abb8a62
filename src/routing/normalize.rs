//! Configuration normalizer
//!
//! Two file schemas are accepted:
//!
//! - legacy: `{ "modelMapping": {alias: model}, "baseUrl": .., "apiKey": .. }`
//! - multi-backend: `{ "apis": {id: {baseUrl, apiKey}}, "models": {alias: {name, api}} }`
//!
//! Both are resolved once into a [`CanonicalConfig`], after which the
//! environment overrides are applied.

use std::env;
use std::path::Path;

use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::error::ConfigError;
use crate::routing::canonical::{AliasMapping, CanonicalConfig};

/// Environment variable overriding the inference base URL
pub const BASE_URL_ENV: &str = "INFERENCE_BASE_URL";
/// Environment variable overriding the inference API key
pub const API_KEY_ENV: &str = "INFERENCE_API_KEY";

/// A model entry under `models`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ModelDefinition {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub api: Option<String>,
}

/// A backend entry under `apis`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackendDefinition {
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default)]
    pub api_key: Option<String>,
}

/// Single-backend schema
#[derive(Debug, Clone, Default)]
pub struct LegacyConfig {
    pub model_mapping: Option<IndexMap<String, String>>,
    pub base_url: Option<String>,
    pub api_key: Option<String>,
    /// Older files spelled the base URL this way
    pub inference_server_url: Option<String>,
    pub models: Option<IndexMap<String, ModelDefinition>>,
}

/// Schema with named backends
#[derive(Debug, Clone, Default)]
pub struct MultiBackendConfig {
    pub apis: IndexMap<String, BackendDefinition>,
    pub models: IndexMap<String, ModelDefinition>,
}

/// Raw configuration, tagged by schema
#[derive(Debug, Clone)]
pub enum RawConfig {
    Legacy(LegacyConfig),
    MultiBackend(MultiBackendConfig),
}

impl RawConfig {
    /// Detect the schema of an already-parsed JSON document
    ///
    /// A document carrying both `apis` and `models` is multi-backend,
    /// anything else is legacy. Entries of the wrong shape are dropped
    /// individually, so a parsed document always yields a config.
    pub fn from_value(value: Value) -> Self {
        let has = |key: &str| value.get(key).is_some_and(|v| !v.is_null());

        if has("apis") && has("models") {
            Self::MultiBackend(MultiBackendConfig {
                apis: section(&value, "apis").unwrap_or_default(),
                models: section(&value, "models").unwrap_or_default(),
            })
        } else {
            Self::Legacy(LegacyConfig {
                model_mapping: section(&value, "modelMapping"),
                base_url: string_field(&value, "baseUrl"),
                api_key: string_field(&value, "apiKey"),
                inference_server_url: string_field(&value, "inferenceServerUrl"),
                models: section(&value, "models"),
            })
        }
    }

    /// Parse JSON text; only text that is not JSON fails
    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        Ok(Self::from_value(serde_json::from_str(text)?))
    }
}

/// Read a top-level string, ignoring values of any other type
fn string_field(value: &Value, key: &str) -> Option<String> {
    match value.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Null => None,
        other => {
            debug!(key = key, value = %other, "Ignoring non-string config value");
            None
        }
    }
}

/// Read a top-level map entry by entry
///
/// `None` when the key is absent or not an object. Entries that do not
/// deserialize as `T` are dropped with a debug log.
fn section<T: DeserializeOwned>(value: &Value, key: &str) -> Option<IndexMap<String, T>> {
    let entries = match value.get(key)? {
        Value::Object(entries) => entries,
        Value::Null => return None,
        other => {
            debug!(section = key, value = %other, "Ignoring config section that is not a map");
            return None;
        }
    };

    let parsed = entries
        .iter()
        .filter_map(|(name, entry)| match T::deserialize(entry) {
            Ok(parsed) => Some((name.clone(), parsed)),
            Err(e) => {
                debug!(section = key, entry = %name, error = %e, "Dropping malformed config entry");
                None
            }
        })
        .collect();
    Some(parsed)
}

/// Externally supplied values that beat anything in the file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvOverrides {
    pub base_url: Option<String>,
    pub api_key: Option<String>,
}

impl EnvOverrides {
    /// Build overrides, treating empty values as absent
    pub fn new(base_url: Option<String>, api_key: Option<String>) -> Self {
        Self {
            base_url: base_url.filter(|v| !v.is_empty()),
            api_key: api_key.filter(|v| !v.is_empty()),
        }
    }

    /// Read `INFERENCE_BASE_URL` and `INFERENCE_API_KEY`
    pub fn from_env() -> Self {
        Self::new(env::var(BASE_URL_ENV).ok(), env::var(API_KEY_ENV).ok())
    }

    fn apply(&self, config: &mut CanonicalConfig) {
        if let Some(base_url) = &self.base_url {
            debug!(base_url = %base_url, "Applying base URL override from environment");
            config.inference_server_url = normalize_base_url(base_url);
        }
        if let Some(api_key) = &self.api_key {
            debug!("Applying API key override from environment");
            config.inference_api_key = Some(api_key.clone());
        }
    }
}

/// Collapse trailing slashes into exactly one
///
/// Every trailing `/` is trimmed before one is appended, so `http://h:1///`
/// becomes `http://h:1/`. A single-pass strip would leave `http://h:1//`;
/// the forwarder appends its endpoint directly and relies on exactly one.
pub fn normalize_base_url(url: &str) -> String {
    format!("{}/", url.trim_end_matches('/'))
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

impl MultiBackendConfig {
    fn into_canonical(self) -> CanonicalConfig {
        let mut mapping = IndexMap::with_capacity(self.models.len());
        let mut model_apis = IndexMap::new();

        for (alias, model) in self.models {
            let Some(api) = model.api.filter(|api| self.apis.contains_key(api)) else {
                debug!(alias = %alias, "Dropping alias bound to an unknown backend");
                continue;
            };
            let Some(name) = model.name else {
                debug!(alias = %alias, "Dropping alias without a model name");
                continue;
            };
            mapping.insert(alias.clone(), name);
            model_apis.insert(alias, api);
        }

        // The first declared backend is the default target
        let (inference_server_url, inference_api_key) = match self.apis.into_iter().next() {
            Some((api_id, backend)) => {
                debug!(api = %api_id, "Using first backend as default");
                (
                    non_empty(backend.base_url)
                        .map(|url| normalize_base_url(&url))
                        .unwrap_or_default(),
                    non_empty(backend.api_key),
                )
            }
            None => (String::new(), None),
        };

        CanonicalConfig {
            model_mapping: AliasMapping::new(mapping),
            inference_server_url,
            inference_api_key,
            model_apis,
        }
    }
}

impl LegacyConfig {
    fn into_canonical(self) -> CanonicalConfig {
        let inference_server_url = non_empty(self.base_url)
            .or_else(|| non_empty(self.inference_server_url))
            .map(|url| normalize_base_url(&url))
            .unwrap_or_default();

        let models = self.models.unwrap_or_default();
        let mapping = match self.model_mapping {
            Some(mapping) => mapping,
            None => models
                .iter()
                .filter_map(|(alias, model)| Some((alias.clone(), model.name.clone()?)))
                .collect(),
        };
        let model_apis = models
            .into_iter()
            .filter_map(|(alias, model)| Some((alias, model.api?)))
            .collect();

        CanonicalConfig {
            model_mapping: AliasMapping::new(mapping),
            inference_server_url,
            inference_api_key: non_empty(self.api_key),
            model_apis,
        }
    }
}

/// Resolve a raw configuration into canonical form and apply overrides
pub fn normalize(raw: RawConfig, env: &EnvOverrides) -> CanonicalConfig {
    let mut config = match raw {
        RawConfig::Legacy(legacy) => legacy.into_canonical(),
        RawConfig::MultiBackend(multi) => multi.into_canonical(),
    };
    env.apply(&mut config);
    config
}

/// Read, parse and normalize a configuration file
pub fn load(path: impl AsRef<Path>, env: &EnvOverrides) -> Result<CanonicalConfig, ConfigError> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(normalize(RawConfig::parse(&text)?, env))
}
