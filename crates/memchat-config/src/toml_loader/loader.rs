//! Core TOML config loading: read from path or platform default.

use std::path::Path;

use memchat_common::ConfigError;
use tracing::{debug, info};

use crate::schema::ChatConfig;

use super::paths::default_config_path;

/// Load config from a specific TOML file path.
///
/// Deserializes the file using serde defaults for any missing fields.
/// Validation is left to the caller so environment and CLI overrides can
/// be applied first.
pub fn load_from_path(path: &Path) -> Result<ChatConfig, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound(path.to_path_buf()));
    }

    let content = std::fs::read_to_string(path)
        .map_err(|e| ConfigError::ParseError(format!("failed to read {}: {e}", path.display())))?;

    let config: ChatConfig = toml::from_str(&content)
        .map_err(|e| ConfigError::ParseError(format!("failed to parse TOML: {e}")))?;

    info!("loaded config from {}", path.display());
    Ok(config)
}

/// Load config from the platform-specific default path.
///
/// On macOS: `~/Library/Application Support/memchat/config.toml`
/// On Linux: `~/.config/memchat/config.toml`
///
/// A missing file is not an error; built-in defaults are returned.
pub fn load_default() -> Result<ChatConfig, ConfigError> {
    let Some(path) = default_config_path() else {
        debug!("no config directory on this platform, using defaults");
        return Ok(ChatConfig::default());
    };

    match load_from_path(&path) {
        Ok(config) => Ok(config),
        Err(ConfigError::FileNotFound(_)) => {
            debug!("no config found at {}, using defaults", path.display());
            Ok(ChatConfig::default())
        }
        Err(e) => Err(e),
    }
}
