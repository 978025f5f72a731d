//! ChatEndpoint trait implementation for OpenAiClient.

use async_trait::async_trait;
use futures_util::{stream, Stream, StreamExt};
use tracing::debug;

use crate::streaming::{response_events, SseEvent};
use crate::{AiError, ChatEndpoint, Fragment, FragmentStream, Turn};

use super::client::{check_status, parse_chunk, parse_models, Chunk, OpenAiClient};

#[async_trait]
impl ChatEndpoint for OpenAiClient {
    fn model(&self) -> &str {
        &self.config.model
    }

    async fn stream_chat(&self, messages: &[Turn]) -> Result<FragmentStream, AiError> {
        let body = self.build_request_body(messages, true);

        debug!(model = %self.config.model, turns = messages.len(), "chat completion streaming request");

        let response = self
            .http
            .post(self.url("chat/completions"))
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| AiError::Endpoint(e.to_string()))?;
        let response = check_status(response).await?;

        Ok(fragments(response_events(response)).boxed())
    }

    async fn list_models(&self) -> Result<Vec<String>, AiError> {
        let response = self
            .http
            .get(self.url("models"))
            .bearer_auth(&self.config.api_key)
            .send()
            .await
            .map_err(|e| AiError::Endpoint(e.to_string()))?;
        let response = check_status(response).await?;

        let json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| AiError::Endpoint(format!("malformed model list: {e}")))?;

        parse_models(&json)
    }
}

/// Map SSE events to fragments, stopping at `[DONE]` or after the first error.
pub(crate) fn fragments<S>(events: S) -> impl Stream<Item = Result<Fragment, AiError>> + Send
where
    S: Stream<Item = Result<SseEvent, AiError>> + Send + 'static,
{
    stream::unfold((Box::pin(events), false), |(mut events, failed)| async move {
        if failed {
            return None;
        }
        let item = match events.next().await? {
            Ok(event) => match parse_chunk(&event.data) {
                Ok(Chunk::Done) => return None,
                Ok(Chunk::Fragment(fragment)) => Ok(fragment),
                Err(e) => Err(e),
            },
            Err(e) => Err(e),
        };
        let failed = item.is_err();
        Some((item, (events, failed)))
    })
}
