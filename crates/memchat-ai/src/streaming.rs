//! Server-Sent Events (SSE) streaming parser.
//!
//! OpenAI-compatible servers stream completions as SSE: `data:` lines
//! separated by blank lines. This module turns any async byte source into a
//! stream of events so the reply can be consumed lazily.

use futures_util::{stream, Stream, StreamExt};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines};
use tokio_util::io::StreamReader;

use crate::AiError;

/// A single SSE event parsed from the stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SseEvent {
    /// The event type, when the server names one.
    pub event: Option<String>,
    /// The event data; multiple `data:` lines are joined with `\n`.
    pub data: String,
}

struct SseState<R> {
    lines: Lines<R>,
    done: bool,
}

/// Parse SSE events from a reqwest response body.
pub fn response_events(
    response: reqwest::Response,
) -> impl Stream<Item = Result<SseEvent, AiError>> + Send + 'static {
    let byte_stream = response
        .bytes_stream()
        .map(|result| result.map_err(std::io::Error::other));
    let reader = BufReader::new(StreamReader::new(Box::pin(byte_stream)));
    sse_events(reader)
}

/// Parse SSE events from any buffered async reader.
///
/// A read error is yielded once as `AiError::Endpoint` and ends the stream.
pub fn sse_events<R>(reader: R) -> impl Stream<Item = Result<SseEvent, AiError>> + Send + 'static
where
    R: AsyncBufRead + Unpin + Send + 'static,
{
    let state = SseState {
        lines: reader.lines(),
        done: false,
    };
    stream::unfold(state, |mut state| async move {
        let item = next_event(&mut state).await?;
        Some((item, state))
    })
}

async fn next_event<R>(state: &mut SseState<R>) -> Option<Result<SseEvent, AiError>>
where
    R: AsyncBufRead + Unpin,
{
    if state.done {
        return None;
    }

    let mut event: Option<String> = None;
    let mut data = String::new();
    let mut has_data = false;

    loop {
        let line = match state.lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => {
                state.done = true;
                // Flush a trailing event that was not followed by a blank line
                return has_data.then_some(Ok(SseEvent { event, data }));
            }
            Err(e) => {
                state.done = true;
                return Some(Err(AiError::Endpoint(format!("stream read failed: {e}"))));
            }
        };
        let line = line.strip_suffix('\r').unwrap_or(&line);

        if line.is_empty() {
            // Empty line = end of event
            if has_data {
                return Some(Ok(SseEvent { event, data }));
            }
            event = None;
            continue;
        }

        if line.starts_with(':') {
            continue;
        }

        let (field, value) = match line.split_once(':') {
            Some((field, value)) => (field, value.strip_prefix(' ').unwrap_or(value)),
            None => (line, ""),
        };

        match field {
            "event" => event = Some(value.to_string()),
            "data" => {
                if has_data {
                    data.push('\n');
                }
                data.push_str(value);
                has_data = true;
            }
            // id:, retry: and unknown fields carry nothing we use
            _ => {}
        }
    }
}
