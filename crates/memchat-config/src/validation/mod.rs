//! Configuration validation.
//!
//! Collects every problem into a single `ConfigError` so the user can fix
//! them in one pass.

mod helpers;


use memchat_common::ConfigError;

use crate::schema::ChatConfig;

use helpers::{validate_nonzero, validate_range_f64};

/// Run all validations on a config, collecting all errors.
pub fn validate(config: &ChatConfig) -> Result<(), ConfigError> {
    let mut errors: Vec<String> = Vec::new();

    validate_endpoint(&mut errors, config);
    validate_session(&mut errors, config);

    if config.logging.level.trim().is_empty() {
        errors.push("logging.level must not be empty".into());
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(errors.join("; ")))
    }
}

fn validate_endpoint(errors: &mut Vec<String>, config: &ChatConfig) {
    let endpoint = &config.endpoint;

    let url = endpoint.base_url.trim();
    if url.is_empty() {
        errors.push("endpoint.base_url must not be empty".into());
    } else if !(url.starts_with("http://") || url.starts_with("https://")) {
        errors.push(format!(
            "endpoint.base_url = {url:?} must start with http:// or https://"
        ));
    }

    if endpoint.model.trim().is_empty() {
        errors.push("endpoint.model must not be empty".into());
    }

    validate_range_f64(errors, "endpoint.temperature", endpoint.temperature, 0.0, 2.0);
    validate_nonzero(errors, "endpoint.max_tokens", u64::from(endpoint.max_tokens));
    validate_nonzero(
        errors,
        "endpoint.connect_timeout_secs",
        endpoint.connect_timeout_secs,
    );
    validate_nonzero(errors, "endpoint.read_timeout_secs", endpoint.read_timeout_secs);
}

fn validate_session(errors: &mut Vec<String>, config: &ChatConfig) {
    validate_nonzero(
        errors,
        "session.history_preview_len",
        config.session.history_preview_len as u64,
    );
}
