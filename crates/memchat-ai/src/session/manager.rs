//! Session struct and transcript pass-throughs.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::transcript::{RenderedTurn, Transcript};
use crate::{AiError, ChatEndpoint, Turn};

use super::types::BusyGuard;

/// A conversation with one endpoint.
pub struct Session {
    /// Conversation history. Never locked across an await point.
    pub(super) transcript: Mutex<Transcript>,
    pub(super) endpoint: Box<dyn ChatEndpoint>,
    /// Where `save_to_file(None)` writes.
    pub(super) save_dir: PathBuf,
    /// Whether a `send` is in flight.
    pub(super) busy: AtomicBool,
}

impl Session {
    pub fn new(endpoint: impl ChatEndpoint + 'static) -> Self {
        Self {
            transcript: Mutex::new(Transcript::new()),
            endpoint: Box::new(endpoint),
            save_dir: PathBuf::from("."),
            busy: AtomicBool::new(false),
        }
    }

    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        let transcript = self
            .transcript
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner);
        *transcript = std::mem::take(transcript).with_system_prompt(prompt);
        self
    }

    pub fn with_save_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.save_dir = dir.as_ref().to_path_buf();
        self
    }

    pub(super) fn transcript(&self) -> MutexGuard<'_, Transcript> {
        self.transcript.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn model(&self) -> &str {
        self.endpoint.model()
    }

    pub fn system_prompt(&self) -> Option<String> {
        self.transcript().system_prompt().map(String::from)
    }

    /// Copy of the stored turns, oldest first. Excludes the system prompt.
    pub fn history(&self) -> Vec<Turn> {
        self.transcript().turns().to_vec()
    }

    /// Request payload the next `send` would start from.
    pub fn snapshot(&self) -> Vec<Turn> {
        self.transcript().snapshot()
    }

    pub fn render_history(&self, max_len: usize) -> Vec<RenderedTurn> {
        self.transcript().render(max_len)
    }

    pub fn message_count(&self) -> usize {
        self.transcript().len()
    }

    /// Drop every stored turn. Fails with `Busy` while a reply is streaming.
    pub fn clear(&self) -> Result<(), AiError> {
        let _guard = BusyGuard::acquire(&self.busy)?;
        self.transcript().clear();
        tracing::debug!("transcript cleared");
        Ok(())
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }
}
