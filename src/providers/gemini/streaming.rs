//! Gemini streaming (`streamGenerateContent?alt=sse`)

use eventsource_stream::Event;

use super::types::GenerateContentResponse;
use crate::error::LlmError;
use crate::streaming::SseEventConverter;

/// Each SSE event is a full `GenerateContentResponse` holding the next slice
/// of text. Gemini closes the connection instead of sending `[DONE]`.
#[derive(Debug, Clone, Copy, Default)]
pub struct GeminiEventConverter;

impl SseEventConverter for GeminiEventConverter {
    fn convert_event(&self, event: &Event) -> Option<Result<String, LlmError>> {
        match serde_json::from_str::<GenerateContentResponse>(&event.data) {
            Ok(chunk) => chunk.first_text().filter(|t| !t.is_empty()).map(Ok),
            Err(e) => Some(Err(LlmError::ParseError(format!(
                "Invalid Gemini stream chunk: {e}"
            )))),
        }
    }
}
