//! llama.cpp server (`/completion`)
//!
//! The native endpoint takes a single prompt string, so the conversation is
//! flattened into a role-prefixed transcript ending with an open assistant
//! turn. No API key is needed unless the server was started with one.

use async_trait::async_trait;
use eventsource_stream::Event;
use serde_json::{Map, Value, json};
use tracing::debug;

use super::{ProviderAdapter, ProviderContext};
use crate::error::LlmError;
use crate::streaming::{ChatStream, SseEventConverter, StreamFactory};
use crate::types::ChatRequest;
use crate::utils::{HttpHeaderBuilder, http, join_url};

#[derive(Debug, Clone)]
pub struct LlamaCppAdapter {
    ctx: ProviderContext,
}

impl LlamaCppAdapter {
    pub fn new(ctx: ProviderContext) -> Result<Self, LlmError> {
        if ctx.config.requires_api_key {
            ctx.require_api_key()?;
        }
        Ok(Self { ctx })
    }

    fn headers(&self) -> Result<reqwest::header::HeaderMap, LlmError> {
        let mut builder = HttpHeaderBuilder::new().with_json_content_type();
        if let Some(key) = self.ctx.api_key() {
            builder = builder.with_bearer_auth(key)?;
        }
        Ok(builder.build())
    }

    fn url(&self) -> String {
        join_url(&self.ctx.base_url, "completion")
    }
}

pub fn build_prompt(request: &ChatRequest) -> String {
    let mut prompt = String::new();
    for message in request.messages() {
        prompt.push_str(message.role.as_str());
        prompt.push_str(": ");
        prompt.push_str(&message.content);
        prompt.push('\n');
    }
    prompt.push_str("assistant:");
    prompt
}

pub fn build_request_body(request: &ChatRequest, stream: bool) -> Value {
    let mut body = Map::new();
    body.insert("prompt".into(), json!(build_prompt(request)));
    body.insert("n_predict".into(), json!(request.max_tokens()));
    let sampling = request.sampling();
    if let Some(t) = sampling.temperature() {
        body.insert("temperature".into(), json!(t));
    }
    if let Some(p) = sampling.top_p() {
        body.insert("top_p".into(), json!(p));
    }
    if let Some(k) = sampling.top_k() {
        body.insert("top_k".into(), json!(k));
    }
    for (name, value) in sampling.extra() {
        body.insert(name.to_string(), json!(value));
    }
    if stream {
        body.insert("stream".into(), json!(true));
    }
    Value::Object(body)
}

#[async_trait]
impl ProviderAdapter for LlamaCppAdapter {
    fn provider_name(&self) -> &str {
        &self.ctx.provider_id
    }

    async fn complete(&self, request: &ChatRequest) -> Result<String, LlmError> {
        let body = build_request_body(request, false);
        debug!(url = %self.ctx.base_url, "llama.cpp completion");
        let json = http::post_json(&self.ctx.http_client, &self.url(), self.headers()?, &body).await?;
        json.get("content")
            .and_then(Value::as_str)
            .map(|s| s.trim_start().to_string())
            .ok_or_else(|| LlmError::ParseError("llama.cpp response has no content".into()))
    }

    async fn stream(&self, request: &ChatRequest) -> Result<ChatStream, LlmError> {
        let body = build_request_body(request, true);
        let response =
            http::send_json(&self.ctx.http_client, &self.url(), self.headers()?, &body).await?;
        Ok(StreamFactory::from_sse_response(response, LlamaCppEventConverter))
    }
}

/// `data: {"content": "...", "stop": false}` chunks.
#[derive(Debug, Clone, Copy, Default)]
pub struct LlamaCppEventConverter;

impl SseEventConverter for LlamaCppEventConverter {
    fn convert_event(&self, event: &Event) -> Option<Result<String, LlmError>> {
        let chunk: Value = match serde_json::from_str(&event.data) {
            Ok(v) => v,
            Err(e) => {
                return Some(Err(LlmError::ParseError(format!(
                    "Invalid llama.cpp stream chunk: {e}"
                ))));
            }
        };
        chunk
            .get("content")
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(|s| Ok(s.to_string()))
    }
}
