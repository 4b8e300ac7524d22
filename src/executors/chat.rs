//! Chat executor
//!
//! One call runs: normalize → cache lookup → retry-wrapped adapter call →
//! response shaping → cache store. A cache hit returns before any retry or
//! network work; only non-empty successful responses are stored.

use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use crate::cache::{ResponseCache, cache_key};
use crate::config::ProviderConfig;
use crate::error::LlmError;
use crate::normalize::Normalizer;
use crate::providers::ProviderAdapter;
use crate::retry::{RetryExecutor, RetryPolicy};
use crate::streaming::ChatStream;
use crate::types::{
    CallOptions, ChatRequest, ChatResponse, InterfaceOptions, MessageInput, ResponseFormat,
};
use crate::utils::parse_json_soft;

/// Drives one adapter for one call.
#[derive(Debug, Clone)]
pub struct ChatExecutor<'a> {
    pub provider_id: &'a str,
    pub adapter: Arc<dyn ProviderAdapter>,
    pub config: &'a ProviderConfig,
    pub cache: &'a ResponseCache,
}

impl ChatExecutor<'_> {
    pub fn build_request(
        &self,
        input: MessageInput,
        options: &CallOptions,
    ) -> Result<ChatRequest, LlmError> {
        Normalizer::new(self.config, self.adapter.message_policy()).normalize(input, options)
    }

    pub async fn execute(
        &self,
        input: MessageInput,
        options: &CallOptions,
        interface_options: &InterfaceOptions,
    ) -> Result<ChatResponse, LlmError> {
        let request = self.build_request(input, options)?;

        let cache_slot = match interface_options.cache_timeout_seconds {
            Some(ttl) => Some((cache_key(self.provider_id, &request)?, Duration::from_secs(ttl))),
            None => None,
        };

        if let Some((key, _)) = &cache_slot {
            if let Some(hit) = self.cache.get(key).await {
                debug!(provider = self.provider_id, "response cache hit");
                return Ok(hit);
            }
            debug!(provider = self.provider_id, "response cache miss");
        }

        let retry = RetryExecutor::new(RetryPolicy::from(interface_options));
        let text = retry.execute(|| self.adapter.complete(&request)).await?;
        let response = shape_response(text, request.response_format());

        if let Some((key, ttl)) = cache_slot {
            if !response.is_empty() {
                self.cache.put(key, response.clone(), ttl).await;
            }
        }
        Ok(response)
    }

    /// Open a stream. Only establishing the connection is retried; streams
    /// are never cached.
    pub async fn execute_stream(
        &self,
        input: MessageInput,
        options: &CallOptions,
        interface_options: &InterfaceOptions,
    ) -> Result<ChatStream, LlmError> {
        let request = self.build_request(input, options)?;
        let retry = RetryExecutor::new(RetryPolicy::from(interface_options));
        retry.execute(|| self.adapter.stream(&request)).await
    }
}

/// Raw model text to the caller-facing shape. Unparseable JSON output
/// degrades to `Structured(None)`.
pub fn shape_response(text: String, format: ResponseFormat) -> ChatResponse {
    match format {
        ResponseFormat::Text => ChatResponse::Text(text),
        ResponseFormat::JsonObject => ChatResponse::Structured(parse_json_soft(&text)),
    }
}
