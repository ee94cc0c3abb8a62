//! Routing core
//!
//! Turns a configuration file into a [`CanonicalConfig`], resolves client
//! aliases against it and rewrites request bodies for the upstream.

pub mod canonical;
pub mod normalize;
pub mod resolver;
pub mod transform;

pub use canonical::{AliasMapping, CanonicalConfig};
pub use normalize::{load, normalize, normalize_base_url, EnvOverrides, RawConfig};
pub use resolver::{list_aliases, list_models, resolve, ModelEntry};
pub use transform::{requested_alias, rewrite};
