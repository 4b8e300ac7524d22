//! OpenAI-compatible chat completions
//!
//! Serves every provider that speaks the `/chat/completions` shape (OpenAI,
//! Groq, DeepSeek, Mistral, Writer, ...). Only the base URL, the chat path and
//! the key differ between them.

mod streaming;
mod transformers;

pub use streaming::OpenAiEventConverter;
pub use transformers::{build_request_body, extract_content};

use async_trait::async_trait;
use tracing::debug;

use super::{ProviderAdapter, ProviderContext};
use crate::error::LlmError;
use crate::streaming::{ChatStream, StreamFactory};
use crate::types::ChatRequest;
use crate::utils::{HttpHeaderBuilder, http, join_url};

pub const DEFAULT_CHAT_PATH: &str = "/chat/completions";

#[derive(Debug, Clone)]
pub struct OpenAiCompatibleAdapter {
    ctx: ProviderContext,
    chat_path: String,
}

impl OpenAiCompatibleAdapter {
    pub fn new(ctx: ProviderContext) -> Result<Self, LlmError> {
        if ctx.config.requires_api_key {
            ctx.require_api_key()?;
        }
        let chat_path = ctx
            .config
            .chat_path
            .clone()
            .unwrap_or_else(|| DEFAULT_CHAT_PATH.to_string());
        Ok(Self { ctx, chat_path })
    }

    fn url(&self) -> String {
        join_url(&self.ctx.base_url, &self.chat_path)
    }

    fn headers(&self) -> Result<reqwest::header::HeaderMap, LlmError> {
        let mut builder = HttpHeaderBuilder::new().with_json_content_type();
        if let Some(key) = self.ctx.api_key() {
            builder = builder.with_bearer_auth(key)?;
        }
        Ok(builder.build())
    }
}

#[async_trait]
impl ProviderAdapter for OpenAiCompatibleAdapter {
    fn provider_name(&self) -> &str {
        &self.ctx.provider_id
    }

    async fn complete(&self, request: &ChatRequest) -> Result<String, LlmError> {
        let body = build_request_body(request, false);
        debug!(provider = %self.ctx.provider_id, model = request.model(), "chat completion");
        let json = http::post_json(&self.ctx.http_client, &self.url(), self.headers()?, &body).await?;
        extract_content(&json)
    }

    async fn stream(&self, request: &ChatRequest) -> Result<ChatStream, LlmError> {
        let body = build_request_body(request, true);
        let response =
            http::send_json(&self.ctx.http_client, &self.url(), self.headers()?, &body).await?;
        Ok(StreamFactory::from_sse_response(response, OpenAiEventConverter))
    }
}
