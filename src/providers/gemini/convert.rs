//! Gemini request conversion helpers (pure functions)

use super::types::{Content, GenerateContentRequest, GenerationConfig, Part};
use crate::types::{ChatMessage, ChatRequest, MessageRole};

/// Gemini names the assistant role `model` and has no system role in
/// `contents`; strict normalization has already relabelled system turns.
fn role_for(role: MessageRole) -> &'static str {
    match role {
        MessageRole::Assistant => "model",
        MessageRole::User | MessageRole::System => "user",
    }
}

pub fn convert_message_to_content(message: &ChatMessage) -> Content {
    Content {
        role: Some(role_for(message.role).to_string()),
        parts: vec![Part {
            text: Some(message.content.clone()),
            thought: None,
        }],
    }
}

pub fn build_request_body(request: &ChatRequest) -> GenerateContentRequest {
    let sampling = request.sampling();
    GenerateContentRequest {
        contents: request
            .messages()
            .iter()
            .map(convert_message_to_content)
            .collect(),
        generation_config: GenerationConfig {
            max_output_tokens: request.max_tokens(),
            temperature: sampling.temperature(),
            top_p: sampling.top_p(),
            top_k: sampling.top_k(),
            response_mime_type: request
                .wants_json()
                .then(|| "application/json".to_string()),
        },
    }
}
