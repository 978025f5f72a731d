//! Async chat methods for Session (send + endpoint probe).

use tracing::{debug, warn};

use crate::accumulator::accumulate;
use crate::{AiError, Turn};

use super::manager::Session;
use super::types::{BusyGuard, EndpointStatus};

impl Session {
    /// Send `user_text` with the full transcript and stream the reply.
    ///
    /// `on_fragment` receives each piece of the reply as it arrives. The user
    /// turn is appended before the request; the assistant turn only after the
    /// stream completes. On failure the transcript ends with the unanswered
    /// user turn, so callers retrying should not re-append it themselves.
    pub async fn send(
        &self,
        user_text: impl Into<String>,
        on_fragment: impl FnMut(&str),
    ) -> Result<String, AiError> {
        let user_text = user_text.into();
        if user_text.trim().is_empty() {
            return Err(AiError::Validation("message must not be empty".into()));
        }

        let _guard = BusyGuard::acquire(&self.busy)?;

        let payload = {
            let mut transcript = self.transcript();
            transcript.append(Turn::user(user_text));
            transcript.snapshot()
        };

        debug!(model = %self.endpoint.model(), turns = payload.len(), "sending transcript");

        let fragments = self.endpoint.stream_chat(&payload).await.inspect_err(|e| {
            warn!("completion request failed: {e}");
        })?;
        let reply = accumulate(fragments, on_fragment).await?;

        self.transcript().append(Turn::assistant(reply.clone()));
        Ok(reply)
    }

    /// Probe the endpoint by listing its models. Diagnostic only.
    pub async fn check_endpoint(&self) -> EndpointStatus {
        match self.endpoint.list_models().await {
            Ok(models) => {
                debug!(count = models.len(), "endpoint reachable");
                EndpointStatus {
                    reachable: true,
                    models,
                    error: None,
                }
            }
            Err(e) => {
                warn!("endpoint probe failed: {e}");
                EndpointStatus {
                    reachable: false,
                    models: Vec::new(),
                    error: Some(e.to_string()),
                }
            }
        }
    }
}
