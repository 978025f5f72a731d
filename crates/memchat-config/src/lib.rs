//! memchat configuration.
//!
//! Settings come from, in increasing precedence: built-in defaults, a TOML
//! file, and `LLM_*` environment variables. The binary applies its own CLI
//! flags on top and then calls [`validation::validate`].
//!
//! ```rust,no_run
//! let config = memchat_config::load_config(None).expect("failed to load config");
//! println!("{}", config.endpoint.model);
//! ```

pub mod env;
pub mod schema;
pub mod toml_loader;
pub mod validation;

pub use schema::{ChatConfig, EndpointConfig, LoggingConfig, SessionConfig};
pub use validation::validate;

use std::path::Path;

use memchat_common::ConfigError;

/// Load the TOML config (explicit path or platform default) and overlay the
/// environment. An explicit path must exist; the default path may not.
pub fn load_config(path: Option<&Path>) -> Result<ChatConfig, ConfigError> {
    let mut config = match path {
        Some(path) => toml_loader::load_from_path(path)?,
        None => toml_loader::load_default()?,
    };
    env::apply_env_overrides(&mut config);
    Ok(config)
}
