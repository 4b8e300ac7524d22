//! Google Gemini (`generateContent`)
//!
//! Gemini rejects conversations that do not alternate `user` / `model`, so
//! this adapter asks for the strict message policy.

mod convert;
mod streaming;
pub mod types;

pub use convert::build_request_body;
pub use streaming::GeminiEventConverter;

use async_trait::async_trait;
use tracing::{debug, warn};

use super::{ProviderAdapter, ProviderContext};
use crate::error::LlmError;
use crate::normalize::MessagePolicy;
use crate::streaming::{ChatStream, StreamFactory};
use crate::types::ChatRequest;
use crate::utils::{HttpHeaderBuilder, http, join_url};
use types::GenerateContentResponse;

#[derive(Debug, Clone)]
pub struct GeminiAdapter {
    ctx: ProviderContext,
}

impl GeminiAdapter {
    pub fn new(ctx: ProviderContext) -> Result<Self, LlmError> {
        ctx.require_api_key()?;
        Ok(Self { ctx })
    }

    fn url(&self, model: &str, stream: bool) -> String {
        let action = if stream {
            format!("models/{model}:streamGenerateContent?alt=sse")
        } else {
            format!("models/{model}:generateContent")
        };
        join_url(&self.ctx.base_url, &action)
    }

    fn headers(&self) -> Result<reqwest::header::HeaderMap, LlmError> {
        Ok(HttpHeaderBuilder::new()
            .with_json_content_type()
            .with_custom_auth("x-goog-api-key", self.ctx.require_api_key()?)?
            .build())
    }
}

#[async_trait]
impl ProviderAdapter for GeminiAdapter {
    fn provider_name(&self) -> &str {
        &self.ctx.provider_id
    }

    fn message_policy(&self) -> MessagePolicy {
        MessagePolicy::strict()
    }

    async fn complete(&self, request: &ChatRequest) -> Result<String, LlmError> {
        let body = serde_json::to_value(build_request_body(request))?;
        debug!(model = request.model(), "gemini generateContent");
        let json = http::post_json(
            &self.ctx.http_client,
            &self.url(request.model(), false),
            self.headers()?,
            &body,
        )
        .await?;
        let response: GenerateContentResponse = serde_json::from_value(json)
            .map_err(|e| LlmError::ParseError(format!("Invalid Gemini response: {e}")))?;
        let finish_reason = response.finish_reason();
        if let Some(reason) = finish_reason.filter(|r| *r != "STOP") {
            warn!(model = request.model(), finish_reason = reason, "gemini stopped early");
        }
        response.first_text().ok_or_else(|| match finish_reason {
            Some(reason) => LlmError::ParseError(format!(
                "Gemini returned no content (finish reason: {reason})"
            )),
            None => LlmError::ParseError("Gemini response has no candidates".into()),
        })
    }

    async fn stream(&self, request: &ChatRequest) -> Result<ChatStream, LlmError> {
        let body = serde_json::to_value(build_request_body(request))?;
        let response = http::send_json(
            &self.ctx.http_client,
            &self.url(request.model(), true),
            self.headers()?,
            &body,
        )
        .await?;
        Ok(StreamFactory::from_sse_response(response, GeminiEventConverter))
    }
}
