//! Streaming responses
//!
//! A [`ChatStream`] yields text deltas as the provider produces them. It is
//! finite (ends when the provider closes the connection) and cannot be
//! restarted; re-streaming means issuing a new call.

use std::pin::Pin;

use eventsource_stream::{Event, Eventsource};
use futures::Stream;
use futures_util::StreamExt;

use crate::error::LlmError;

pub type ChatStream = Pin<Box<dyn Stream<Item = Result<String, LlmError>> + Send>>;

/// Maps one provider SSE event to a text delta.
pub trait SseEventConverter: Send + Sync {
    /// `None` for events that carry no text (keep-alives, role headers, usage).
    fn convert_event(&self, event: &Event) -> Option<Result<String, LlmError>>;

    /// Whether this event marks the logical end of the stream.
    fn is_terminal(&self, event: &Event) -> bool {
        event.data.trim() == "[DONE]"
    }
}

/// Stream factory for SSE responses
pub struct StreamFactory;

impl StreamFactory {
    /// Turn an already-successful response into a [`ChatStream`].
    pub fn from_sse_response<C>(response: reqwest::Response, converter: C) -> ChatStream
    where
        C: SseEventConverter + 'static,
    {
        let stream = response
            .bytes_stream()
            .eventsource()
            .scan((), move |_, event| {
                let item = match event {
                    Ok(event) if converter.is_terminal(&event) => {
                        return futures::future::ready(None);
                    }
                    Ok(event) if event.data.trim().is_empty() => None,
                    Ok(event) => converter.convert_event(&event),
                    Err(e) => Some(Err(LlmError::StreamError(format!(
                        "SSE parsing error: {e}"
                    )))),
                };
                futures::future::ready(Some(item))
            })
            .filter_map(futures::future::ready);
        Box::pin(stream)
    }
}

/// Collect a stream into one string, failing on the first error.
pub async fn collect_text(mut stream: ChatStream) -> Result<String, LlmError> {
    let mut out = String::new();
    while let Some(chunk) = stream.next().await {
        out.push_str(&chunk?);
    }
    Ok(out)
}
