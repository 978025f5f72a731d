//! Conversational engine for memchat.
//!
//! Provides an OpenAI-compatible chat-completion client with:
//! - Streaming (SSE) support
//! - An append-only transcript with JSON save/load
//! - A streaming accumulator that forwards fragments as they arrive
//! - A `Session` that ties the transcript to an endpoint

pub mod accumulator;
pub mod openai;
pub mod session;
pub mod streaming;
pub mod transcript;

use std::path::PathBuf;

use async_trait::async_trait;
use futures_util::stream::BoxStream;

pub use accumulator::{accumulate, Fragment, StreamAccumulator};
pub use openai::{OpenAiClient, OpenAiConfig};
pub use session::{EndpointStatus, Session};
pub use transcript::{RenderedTurn, Transcript, TranscriptFile};

/// Lazy, finite sequence of fragments for one assistant reply.
pub type FragmentStream = BoxStream<'static, Result<Fragment, AiError>>;

/// A chat-completion service.
#[async_trait]
pub trait ChatEndpoint: Send + Sync {
    /// Model identifier requests are issued under.
    fn model(&self) -> &str;

    /// Start a streamed completion for the given ordered messages.
    ///
    /// Errors before the first byte of the body (connection, status) are
    /// returned directly; failures after that surface as `Err` items in the
    /// stream.
    async fn stream_chat(&self, messages: &[Turn]) -> Result<FragmentStream, AiError>;

    /// List the model identifiers the endpoint serves.
    async fn list_models(&self) -> Result<Vec<String>, AiError>;
}

/// One exchanged message.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Turn {
    pub role: Role,
    pub content: String,
}

impl Turn {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl Role {
    /// Human-facing label used when printing history.
    pub fn label(self) -> &'static str {
        match self {
            Role::System => "System",
            Role::User => "You",
            Role::Assistant => "Assistant",
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AiError {
    #[error("endpoint error: {0}")]
    Endpoint(String),
    #[error("stream interrupted: {reason}")]
    StreamInterrupted { partial: String, reason: String },
    #[error("format error: {0}")]
    Format(String),
    #[error("file not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("invalid input: {0}")]
    Validation(String),
    #[error("session is busy with another request")]
    Busy,
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl AiError {
    /// Text received before a stream failed, if this is an interruption.
    pub fn partial_text(&self) -> Option<&str> {
        match self {
            AiError::StreamInterrupted { partial, .. } => Some(partial),
            _ => None,
        }
    }
}
