//! Alias resolution and listing

use serde::Serialize;

use crate::routing::canonical::CanonicalConfig;

/// Concrete model name for an alias
///
/// `None` means the alias is unknown and the request goes upstream as-is.
pub fn resolve<'a>(config: &'a CanonicalConfig, alias: &str) -> Option<&'a str> {
    config.model_mapping.get(alias)
}

/// Every configured alias, in declaration order
pub fn list_aliases(config: &CanonicalConfig) -> Vec<&str> {
    config.model_mapping.aliases().collect()
}

/// An alias together with what it points at
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModelEntry {
    pub alias: String,
    pub actual_model: String,
    pub api_name: Option<String>,
}

/// Listing view used by the models endpoint
pub fn list_models(config: &CanonicalConfig) -> Vec<ModelEntry> {
    config
        .model_mapping
        .iter()
        .map(|(alias, model)| ModelEntry {
            alias: alias.to_string(),
            actual_model: model.to_string(),
            api_name: config.model_apis.get(alias).cloned(),
        })
        .collect()
}
