//! Streaming chat transport.
//!
//! Upstream chat completions arrive as newline-delimited `data: <json>`
//! frames terminated by a literal `data: [DONE]` sentinel. [`SseBuffer`] is
//! the sans-IO reassembler: it owns the partial-line buffer and turns byte
//! chunks into [`Delta`]s regardless of where chunk boundaries fall.
//! [`delta_stream`] drives it over an async byte stream with cancellation.

use futures::{Stream, StreamExt};
use serde_json::Value;
use tokio_util::sync::CancellationToken;

use crate::errors::TransportError;

/// One incremental piece of an assistant reply. At least one of the two
/// fields is non-empty; whitespace is preserved exactly as the provider
/// sent it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Delta {
    pub content: Option<String>,
    pub reasoning: Option<String>,
}

impl Delta {
    pub fn content<S: Into<String>>(text: S) -> Self {
        Delta {
            content: Some(text.into()),
            reasoning: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_none() && self.reasoning.is_none()
    }
}

const DATA_PREFIX: &str = "data: ";
const DONE_SENTINEL: &str = "[DONE]";

/// Reassembles SSE lines from arbitrarily chunked bytes.
///
/// Owned by a single request and dropped at stream end; nothing is pooled
/// or reused across requests.
#[derive(Debug, Default)]
pub struct SseBuffer {
    buffer: String,
}

impl SseBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one chunk, get every delta completed by it. The trailing
    /// fragment without a newline is held back for the next chunk.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<Delta> {
        self.buffer.push_str(&String::from_utf8_lossy(chunk));

        let mut deltas = Vec::new();
        while let Some(newline) = self.buffer.find('\n') {
            let line = self.buffer[..newline].to_string();
            self.buffer.drain(..=newline);
            if let Some(delta) = parse_line(&line) {
                deltas.push(delta);
            }
        }
        deltas
    }
}

fn parse_line(line: &str) -> Option<Delta> {
    let data = line.strip_prefix(DATA_PREFIX)?;
    if data.trim() == DONE_SENTINEL {
        // End-of-stream marker, not content.
        return None;
    }
    let value: Value = match serde_json::from_str(data) {
        Ok(value) => value,
        Err(_) => {
            // Malformed partial frames are expected and non-fatal.
            tracing::debug!(line = data, "skipping unparsable frame");
            return None;
        }
    };
    let delta = extract_delta(&value);
    (!delta.is_empty()).then_some(delta)
}

/// Pull content and reasoning deltas out of one parsed frame. Field layout
/// varies by provider, so each is looked up through a fallback chain:
/// `choices[0].delta.<field>`, then `delta.<field>`, then `<field>` at the
/// top level. `reasoning_content` is accepted as an alias for `reasoning`.
fn extract_delta(value: &Value) -> Delta {
    let scopes = [&value["choices"][0]["delta"], &value["delta"], value];

    let lookup = |names: &[&str]| -> Option<String> {
        for scope in scopes {
            for name in names {
                if let Some(text) = scope.get(*name).and_then(Value::as_str) {
                    if !text.is_empty() {
                        return Some(text.to_string());
                    }
                }
            }
        }
        None
    };

    Delta {
        content: lookup(&["content"]),
        reasoning: lookup(&["reasoning", "reasoning_content"]),
    }
}

/// Consume an HTTP response body as a live sequence of deltas.
///
/// The stream ends when the body does. Firing `cancel` stops reading
/// immediately and yields a final [`TransportError::Aborted`]; deltas
/// already produced stay delivered.
pub fn delta_stream<S, B>(
    body: S,
    cancel: CancellationToken,
) -> impl Stream<Item = Result<Delta, TransportError>> + Send
where
    S: Stream<Item = Result<B, reqwest::Error>> + Send + 'static,
    B: AsRef<[u8]> + Send + 'static,
{
    async_stream::try_stream! {
        futures::pin_mut!(body);
        let mut buffer = SseBuffer::new();
        loop {
            // The select! arms collapse into one Result so the error can be
            // propagated outside the macro.
            let step: Result<Option<B>, TransportError> = tokio::select! {
                biased;
                _ = cancel.cancelled() => Err(TransportError::Aborted),
                chunk = body.next() => match chunk {
                    Some(Ok(bytes)) => Ok(Some(bytes)),
                    Some(Err(e)) => Err(TransportError::Network(e)),
                    None => Ok(None),
                },
            };
            match step? {
                Some(bytes) => {
                    for delta in buffer.push(bytes.as_ref()) {
                        yield delta;
                    }
                }
                None => break,
            }
        }
    }
}
