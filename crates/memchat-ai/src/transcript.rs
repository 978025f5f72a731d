//! Ordered conversation history.
//!
//! The transcript only stores the exchanged turns. The optional system
//! instruction lives beside the sequence so `clear` never removes it, and is
//! prepended by [`Transcript::snapshot`] when building a request.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{AiError, Role, Turn};

/// On-disk shape of a saved transcript.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptFile {
    /// RFC 3339 time the file was written. Tolerated missing on read.
    #[serde(default)]
    pub timestamp: String,
    pub history: Vec<Turn>,
}

/// One line of `history` output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedTurn {
    /// 1-based position in the transcript.
    pub index: usize,
    pub label: &'static str,
    pub content: String,
    pub truncated: bool,
}

impl fmt::Display for RenderedTurn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}. {}: {}", self.index, self.label, self.content)
    }
}

const TRUNCATION_MARKER: &str = "...";

#[derive(Debug, Clone, Default)]
pub struct Transcript {
    turns: Vec<Turn>,
    system: Option<Turn>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system = Some(Turn::system(prompt));
        self
    }

    pub fn system_prompt(&self) -> Option<&str> {
        self.system.as_ref().map(|t| t.content.as_str())
    }

    pub fn append(&mut self, turn: Turn) {
        self.turns.push(turn);
    }

    /// Request payload: the system turn (if any) followed by every stored turn.
    pub fn snapshot(&self) -> Vec<Turn> {
        let mut msgs = Vec::with_capacity(self.turns.len() + 1);
        if let Some(ref system) = self.system {
            msgs.push(system.clone());
        }
        msgs.extend(self.turns.iter().cloned());
        msgs
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn clear(&mut self) {
        self.turns.clear();
    }

    /// Render each turn for display, cutting content at `max_len` characters.
    pub fn render(&self, max_len: usize) -> Vec<RenderedTurn> {
        self.turns
            .iter()
            .enumerate()
            .map(|(i, turn)| {
                let (content, truncated) = truncate_chars(&turn.content, max_len);
                RenderedTurn {
                    index: i + 1,
                    label: turn.role.label(),
                    content,
                    truncated,
                }
            })
            .collect()
    }

    /// Pretty-printed JSON document stamped with the current local time.
    pub fn serialize(&self) -> Result<String, AiError> {
        let file = TranscriptFile {
            timestamp: chrono::Local::now().to_rfc3339(),
            history: self.turns.clone(),
        };
        serde_json::to_string_pretty(&file)
            .map_err(|e| AiError::Format(format!("failed to serialize transcript: {e}")))
    }

    /// Replace the whole sequence with the one stored in `blob`.
    ///
    /// On error the current turns are left untouched. Returns the number of
    /// turns loaded.
    pub fn deserialize(&mut self, blob: &str) -> Result<usize, AiError> {
        let file: TranscriptFile = serde_json::from_str(blob)
            .map_err(|e| AiError::Format(format!("invalid transcript file: {e}")))?;
        self.turns = file.history;
        Ok(self.turns.len())
    }

    /// Whether the stored turns follow `user, assistant, user, ...`.
    pub fn alternates(&self) -> bool {
        self.turns.iter().enumerate().all(|(i, turn)| {
            let expected = if i % 2 == 0 { Role::User } else { Role::Assistant };
            turn.role == expected
        })
    }
}

fn truncate_chars(text: &str, max_len: usize) -> (String, bool) {
    match text.char_indices().nth(max_len) {
        Some((cut, _)) => (format!("{}{TRUNCATION_MARKER}", &text[..cut]), true),
        None => (text.to_string(), false),
    }
}
