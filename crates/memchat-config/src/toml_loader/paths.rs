use std::path::PathBuf;

/// Get the platform-specific default config file path, if the platform has
/// a config directory.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("memchat").join("config.toml"))
}
