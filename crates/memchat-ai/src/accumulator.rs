//! Assembles streamed fragments into one assistant reply.

use futures_util::{Stream, StreamExt};

use crate::AiError;

/// One item of a streamed reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fragment {
    Text(String),
    /// A control-only chunk (role announcement, finish reason, keep-alive).
    Empty,
}

impl From<String> for Fragment {
    fn from(text: String) -> Self {
        if text.is_empty() {
            Fragment::Empty
        } else {
            Fragment::Text(text)
        }
    }
}

impl From<&str> for Fragment {
    fn from(text: &str) -> Self {
        Fragment::from(text.to_string())
    }
}

impl From<Option<String>> for Fragment {
    fn from(text: Option<String>) -> Self {
        text.map(Fragment::from).unwrap_or(Fragment::Empty)
    }
}

#[derive(Debug, Default)]
pub struct StreamAccumulator {
    text: String,
    forwarded: usize,
}

impl StreamAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a fragment and forward it to `on_fragment`. Returns whether the
    /// fragment carried text.
    pub fn push(&mut self, fragment: Fragment, on_fragment: &mut impl FnMut(&str)) -> bool {
        match fragment {
            Fragment::Text(t) if !t.is_empty() => {
                self.text.push_str(&t);
                self.forwarded += 1;
                on_fragment(&t);
                true
            }
            _ => false,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Number of fragments passed to the callback so far.
    pub fn forwarded(&self) -> usize {
        self.forwarded
    }

    pub fn finish(self) -> String {
        self.text
    }

    /// Turn a source failure into `StreamInterrupted`, keeping the partial text.
    pub fn interrupt(self, cause: AiError) -> AiError {
        AiError::StreamInterrupted {
            partial: self.text,
            reason: cause.to_string(),
        }
    }
}

/// Drive `fragments` to completion.
///
/// `on_fragment` runs once per non-empty fragment, before the next one is
/// polled. A failing item ends the stream with `StreamInterrupted`.
pub async fn accumulate<S>(fragments: S, mut on_fragment: impl FnMut(&str)) -> Result<String, AiError>
where
    S: Stream<Item = Result<Fragment, AiError>>,
{
    let mut fragments = std::pin::pin!(fragments);
    let mut acc = StreamAccumulator::new();

    while let Some(item) = fragments.next().await {
        match item {
            Ok(fragment) => {
                acc.push(fragment, &mut on_fragment);
            }
            Err(e) => {
                tracing::warn!(received = acc.text().len(), "stream failed mid-reply: {e}");
                return Err(acc.interrupt(e));
            }
        }
    }

    tracing::debug!(fragments = acc.forwarded(), "stream complete");
    Ok(acc.finish())
}
