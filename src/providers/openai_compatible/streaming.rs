//! SSE deltas for the chat completions shape.

use eventsource_stream::Event;
use serde_json::Value;

use crate::error::LlmError;
use crate::streaming::SseEventConverter;

/// Pulls `choices[0].delta.content` out of each chunk; the stream ends on `[DONE]`.
#[derive(Debug, Clone, Copy, Default)]
pub struct OpenAiEventConverter;

impl SseEventConverter for OpenAiEventConverter {
    fn convert_event(&self, event: &Event) -> Option<Result<String, LlmError>> {
        let chunk: Value = match serde_json::from_str(&event.data) {
            Ok(v) => v,
            Err(e) => {
                return Some(Err(LlmError::ParseError(format!(
                    "Invalid stream chunk: {e}"
                ))));
            }
        };
        chunk
            .pointer("/choices/0/delta/content")
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(|s| Ok(s.to_string()))
    }
}
