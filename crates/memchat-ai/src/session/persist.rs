//! Saving and restoring the transcript as JSON.

use std::path::{Path, PathBuf};

use tracing::info;

use crate::AiError;

use super::manager::Session;
use super::types::BusyGuard;

impl Session {
    /// Write the transcript to `path`, or to a timestamped file in the save
    /// directory when no path is given. Returns the path written.
    ///
    /// Allowed while a reply is streaming; the file then ends with the
    /// unanswered user turn.
    pub async fn save_to_file(&self, path: Option<&Path>) -> Result<PathBuf, AiError> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => self.save_dir.join(default_file_name()),
        };

        let json = self.transcript().serialize()?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&path, json).await?;

        info!("saved transcript to {}", path.display());
        Ok(path)
    }

    /// Replace the transcript with the one stored at `path`.
    ///
    /// Returns the number of turns loaded. On error the transcript is left
    /// unchanged. Fails with `Busy` while a reply is streaming.
    pub async fn load_from_file(&self, path: &Path) -> Result<usize, AiError> {
        let _guard = BusyGuard::acquire(&self.busy)?;
        let blob = match tokio::fs::read_to_string(path).await {
            Ok(blob) => blob,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(AiError::NotFound(path.to_path_buf()));
            }
            Err(e) => return Err(e.into()),
        };

        let count = self.transcript().deserialize(&blob)?;
        info!("loaded {count} turns from {}", path.display());
        Ok(count)
    }
}

/// `chat_history_YYYYMMDD_HHMMSS.json` for the current local time.
pub(crate) fn default_file_name() -> String {
    chrono::Local::now()
        .format("chat_history_%Y%m%d_%H%M%S.json")
        .to_string()
}
