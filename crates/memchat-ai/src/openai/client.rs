//! Client struct, request building, and chunk parsing.

use serde_json::Value;

use crate::{AiError, Fragment, Turn};

use super::config::OpenAiConfig;

/// Maximum characters of an error body echoed back to the user.
const ERROR_BODY_LIMIT: usize = 200;

/// Marker the server sends as the final `data:` payload.
const DONE_MARKER: &str = "[DONE]";

pub struct OpenAiClient {
    pub(crate) config: OpenAiConfig,
    pub(crate) http: reqwest::Client,
}

/// What one streamed `data:` payload means.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Chunk {
    Fragment(Fragment),
    Done,
}

impl OpenAiClient {
    pub fn new(config: OpenAiConfig) -> Result<Self, AiError> {
        let http = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout)
            .read_timeout(config.read_timeout)
            .build()
            .map_err(|e| AiError::Endpoint(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { config, http })
    }

    /// Join `path` onto the configured base URL.
    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}/{}", self.config.base_url.trim_end_matches('/'), path)
    }

    /// Build the JSON request body for `/chat/completions`.
    pub(crate) fn build_request_body(&self, messages: &[Turn], stream: bool) -> Value {
        serde_json::json!({
            "model": self.config.model,
            "messages": messages,
            "stream": stream,
            "max_tokens": self.config.max_tokens,
            "temperature": self.config.temperature,
        })
    }
}

/// Map a non-success response to `AiError::Endpoint`.
pub(crate) async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, AiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let text = response.text().await.unwrap_or_default();
    let text = text.chars().take(ERROR_BODY_LIMIT).collect::<String>();
    Err(AiError::Endpoint(format!("HTTP {status}: {text}")))
}

/// Interpret one streamed `data:` payload.
pub(crate) fn parse_chunk(data: &str) -> Result<Chunk, AiError> {
    let data = data.trim();
    if data == DONE_MARKER {
        return Ok(Chunk::Done);
    }

    let json: Value = serde_json::from_str(data)
        .map_err(|e| AiError::Endpoint(format!("malformed stream chunk: {e}")))?;

    if let Some(error) = json.get("error") {
        let message = error["message"]
            .as_str()
            .map(String::from)
            .unwrap_or_else(|| error.to_string());
        return Err(AiError::Endpoint(message));
    }

    let content = json["choices"][0]["delta"]["content"]
        .as_str()
        .map(String::from);
    Ok(Chunk::Fragment(Fragment::from(content)))
}

/// Extract model ids from a `/models` response.
pub(crate) fn parse_models(json: &Value) -> Result<Vec<String>, AiError> {
    let data = json["data"]
        .as_array()
        .ok_or_else(|| AiError::Endpoint("model list response has no `data` array".into()))?;
    Ok(data
        .iter()
        .filter_map(|m| m["id"].as_str().map(String::from))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> OpenAiClient {
        let config = OpenAiConfig::new("http://localhost:8000/v1/", "sk-test")
            .with_model("test-model")
            .with_max_tokens(256)
            .with_temperature(0.3);
        OpenAiClient::new(config).unwrap()
    }

    #[test]
    fn url_joins_without_double_slash() {
        assert_eq!(
            client().url("chat/completions"),
            "http://localhost:8000/v1/chat/completions"
        );
    }

    #[test]
    fn request_body_carries_transcript_and_params() {
        let messages = vec![Turn::system("Be brief."), Turn::user("hi")];
        let body = client().build_request_body(&messages, true);
        assert_eq!(body["model"], "test-model");
        assert_eq!(body["stream"], true);
        assert_eq!(body["max_tokens"], 256);
        assert_eq!(body["temperature"], 0.3);
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][1]["role"], "user");
        assert_eq!(body["messages"][1]["content"], "hi");
    }

    #[test]
    fn parses_content_delta() {
        let chunk = parse_chunk(r#"{"choices":[{"index":0,"delta":{"content":"Hel"}}]}"#).unwrap();
        assert_eq!(chunk, Chunk::Fragment(Fragment::Text("Hel".into())));
    }

    #[test]
    fn control_chunks_are_empty_fragments() {
        let role_only = r#"{"choices":[{"index":0,"delta":{"role":"assistant"}}]}"#;
        assert_eq!(parse_chunk(role_only).unwrap(), Chunk::Fragment(Fragment::Empty));

        let finish = r#"{"choices":[{"index":0,"delta":{"content":null},"finish_reason":"stop"}]}"#;
        assert_eq!(parse_chunk(finish).unwrap(), Chunk::Fragment(Fragment::Empty));

        let usage_only = r#"{"choices":[],"usage":{"total_tokens":12}}"#;
        assert_eq!(parse_chunk(usage_only).unwrap(), Chunk::Fragment(Fragment::Empty));
    }

    #[test]
    fn done_marker_ends_stream() {
        assert_eq!(parse_chunk("[DONE]").unwrap(), Chunk::Done);
    }

    #[test]
    fn error_object_and_garbage_are_endpoint_errors() {
        let err = parse_chunk(r#"{"error":{"message":"model overloaded"}}"#).unwrap_err();
        assert_eq!(err.to_string(), "endpoint error: model overloaded");

        let err = parse_chunk("{not json").unwrap_err();
        assert!(matches!(err, AiError::Endpoint(_)));
    }

    #[test]
    fn parses_model_list() {
        let json = serde_json::json!({
            "object": "list",
            "data": [{"id": "THUDM/glm-4-9b-chat"}, {"id": "qwen2.5:7b"}, {"object": "model"}]
        });
        assert_eq!(
            parse_models(&json).unwrap(),
            vec!["THUDM/glm-4-9b-chat", "qwen2.5:7b"]
        );
        assert!(parse_models(&serde_json::json!({"models": []})).is_err());
    }
}
