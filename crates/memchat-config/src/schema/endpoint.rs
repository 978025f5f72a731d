//! Remote completion endpoint settings.

use std::fmt;

use serde::{Deserialize, Serialize};

pub const DEFAULT_BASE_URL: &str = "http://localhost:11434/v1";
pub const DEFAULT_API_KEY: &str = "ollama";
pub const DEFAULT_MODEL: &str = "THUDM/glm-4-9b-chat";

/// Connection and decoding parameters for the chat-completion endpoint.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EndpointConfig {
    /// Base URL of the OpenAI-compatible API, including the `/v1` suffix.
    pub base_url: String,
    pub api_key: String,
    pub model: String,
    /// Sampling temperature (valid range: 0.0-2.0).
    pub temperature: f64,
    /// Upper bound on generated tokens per reply.
    pub max_tokens: u32,
    pub connect_timeout_secs: u64,
    /// Maximum idle time between two reads of a streamed reply.
    pub read_timeout_secs: u64,
}

impl fmt::Debug for EndpointConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EndpointConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"[REDACTED]")
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("connect_timeout_secs", &self.connect_timeout_secs)
            .field("read_timeout_secs", &self.read_timeout_secs)
            .finish()
    }
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.into(),
            api_key: DEFAULT_API_KEY.into(),
            model: DEFAULT_MODEL.into(),
            temperature: 0.7,
            max_tokens: 4096,
            connect_timeout_secs: 10,
            read_timeout_secs: 120,
        }
    }
}
