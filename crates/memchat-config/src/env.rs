//! Environment variable overrides.
//!
//! The variables mirror the ones used by common OpenAI-compatible tooling so
//! an existing shell setup keeps working.

use tracing::debug;

use crate::schema::ChatConfig;

pub const API_KEY_VAR: &str = "LLM_API_KEY";
pub const BASE_URL_VAR: &str = "LLM_BASE_URL";
pub const MODEL_VAR: &str = "LLM_MODEL";

/// Overlay values from the process environment onto `config`.
pub fn apply_env_overrides(config: &mut ChatConfig) {
    apply_overrides_from(config, |key| std::env::var(key).ok());
}

/// Overlay values from an arbitrary lookup. Unset or blank variables leave the
/// existing value alone.
pub fn apply_overrides_from(config: &mut ChatConfig, lookup: impl Fn(&str) -> Option<String>) {
    let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    if let Some(key) = get(API_KEY_VAR) {
        debug!("{API_KEY_VAR} set, overriding api key");
        config.endpoint.api_key = key;
    }
    if let Some(url) = get(BASE_URL_VAR) {
        debug!("{BASE_URL_VAR} set, using {url}");
        config.endpoint.base_url = url;
    }
    if let Some(model) = get(MODEL_VAR) {
        debug!("{MODEL_VAR} set, using {model}");
        config.endpoint.model = model;
    }
}
