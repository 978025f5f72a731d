//! Conversation session settings.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Fixed instruction sent ahead of every request. Empty means none.
    pub system_prompt: Option<String>,
    /// Characters of each turn shown by the `history` command.
    pub history_preview_len: usize,
    /// Directory for transcripts saved without an explicit filename.
    pub save_dir: PathBuf,
}

impl SessionConfig {
    pub fn system_prompt(&self) -> Option<&str> {
        self.system_prompt
            .as_deref()
            .filter(|s| !s.trim().is_empty())
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            system_prompt: None,
            history_preview_len: 100,
            save_dir: PathBuf::from("."),
        }
    }
}
