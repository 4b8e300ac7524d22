//! Provider adapters
//!
//! Every backend implements [`ProviderAdapter`]: one HTTP invocation per call
//! to [`ProviderAdapter::complete`], plus an optional streaming variant.
//! Normalization, caching, retries and response shaping live in
//! [`crate::executors::chat`], so adapters stay thin wire-format glue.
//!
//! Adapters hold only immutable connection settings and are shared across
//! concurrent calls behind an `Arc`.

pub mod gemini;
pub mod llamacpp;
pub mod openai_compatible;

pub use gemini::GeminiAdapter;
pub use llamacpp::LlamaCppAdapter;
pub use openai_compatible::OpenAiCompatibleAdapter;

use std::fmt::Debug;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};

use crate::config::ProviderConfig;
use crate::error::LlmError;
use crate::normalize::MessagePolicy;
use crate::streaming::ChatStream;
use crate::types::ChatRequest;

/// Contract shared by every provider backend.
#[async_trait]
pub trait ProviderAdapter: Send + Sync + Debug {
    fn provider_name(&self) -> &str;

    /// Message-shape rules this provider needs. Defaults to none.
    fn message_policy(&self) -> MessagePolicy {
        MessagePolicy::permissive()
    }

    /// Perform exactly one provider call and return the generated text.
    async fn complete(&self, request: &ChatRequest) -> Result<String, LlmError>;

    /// Open a streaming call. The returned stream yields text deltas.
    async fn stream(&self, _request: &ChatRequest) -> Result<ChatStream, LlmError> {
        Err(LlmError::UnsupportedOperation(format!(
            "{} does not support streaming",
            self.provider_name()
        )))
    }
}

/// Connection settings handed to a factory when an adapter is built.
#[derive(Debug, Clone)]
pub struct ProviderContext {
    pub provider_id: String,
    pub base_url: String,
    pub api_key: Option<SecretString>,
    pub config: ProviderConfig,
    pub http_client: reqwest::Client,
}

impl ProviderContext {
    pub fn new(provider_id: impl Into<String>, config: ProviderConfig) -> Self {
        Self {
            provider_id: provider_id.into(),
            base_url: config.base_url.clone(),
            api_key: None,
            config,
            http_client: reqwest::Client::new(),
        }
    }

    pub fn with_api_key(mut self, key: SecretString) -> Self {
        self.api_key = Some(key);
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_http_client(mut self, client: reqwest::Client) -> Self {
        self.http_client = client;
        self
    }

    /// The API key, or `MissingApiKey` for providers that need one.
    pub fn require_api_key(&self) -> Result<&str, LlmError> {
        self.api_key
            .as_ref()
            .map(|k| k.expose_secret())
            .filter(|k| !k.is_empty())
            .ok_or_else(|| LlmError::MissingApiKey(self.provider_id.clone()))
    }

    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_ref().map(|k| k.expose_secret())
    }
}
