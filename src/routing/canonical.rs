//! Canonical routing configuration
//!
//! The only configuration shape the rest of the gateway sees, whichever
//! schema the file on disk used.

use std::sync::Arc;

use indexmap::IndexMap;

/// Read-only alias -> concrete model table
///
/// Built once per configuration load and never mutated afterwards. Cloning
/// shares the underlying table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AliasMapping(Arc<IndexMap<String, String>>);

impl AliasMapping {
    pub fn new(entries: IndexMap<String, String>) -> Self {
        Self(Arc::new(entries))
    }

    /// Concrete model name for an alias
    pub fn get(&self, alias: &str) -> Option<&str> {
        self.0.get(alias).map(String::as_str)
    }

    /// Aliases in declaration order
    pub fn aliases(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for AliasMapping {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::new(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// Normalized routing configuration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CanonicalConfig {
    /// Alias -> concrete model name
    pub model_mapping: AliasMapping,
    /// Base URL of the inference server, always ending in a single `/`
    /// (empty when no base URL was supplied anywhere)
    pub inference_server_url: String,
    /// Bearer credential for the inference server
    pub inference_api_key: Option<String>,
    /// Alias -> backend id, when the config declared one
    pub model_apis: IndexMap<String, String>,
}

impl CanonicalConfig {
    /// Credential to send upstream, skipping empty keys
    pub fn api_key(&self) -> Option<&str> {
        self.inference_api_key
            .as_deref()
            .filter(|key| !key.is_empty())
    }
}
