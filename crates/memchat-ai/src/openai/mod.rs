//! OpenAI-compatible chat-completion client.
//!
//! Implements `ChatEndpoint` against any server exposing
//! `POST {base_url}/chat/completions` and `GET {base_url}/models`
//! (OpenAI, vLLM, Ollama, SiliconFlow, ...).

mod api;
mod client;
mod config;

pub use client::OpenAiClient;
pub use config::OpenAiConfig;
