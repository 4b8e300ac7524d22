//! Interface facade
//!
//! [`LlmInterface`] is the one entry point callers need: pick a provider by
//! name (optionally with an ad-hoc key), hand over a prompt or conversation,
//! and get back text or parsed JSON.
//!
//! ```rust,no_run
//! use unillm::{CallOptions, LlmInterface};
//!
//! # async fn run() -> Result<(), unillm::LlmError> {
//! let llm = LlmInterface::from_env();
//! let answer = llm
//!     .send_message("gemini", "Explain gravity", CallOptions::new().with_max_tokens(100), 60)
//!     .await?;
//! println!("{}", answer.text().unwrap_or_default());
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use tracing::{Instrument, info_span};
use uuid::Uuid;

use crate::cache::ResponseCache;
use crate::error::LlmError;
use crate::executors::ChatExecutor;
use crate::registry::AdapterRegistry;
use crate::streaming::ChatStream;
use crate::types::{CallOptions, ChatResponse, InterfaceOptions, MessageInput, ProviderSelector};

#[derive(Debug, Clone)]
pub struct LlmInterface {
    registry: Arc<AdapterRegistry>,
    cache: ResponseCache,
}

impl LlmInterface {
    pub fn new(registry: AdapterRegistry) -> Self {
        Self {
            registry: Arc::new(registry),
            cache: ResponseCache::new(),
        }
    }

    /// Built-in providers, keys from the environment.
    pub fn from_env() -> Self {
        Self::new(AdapterRegistry::from_env())
    }

    pub fn with_cache(mut self, cache: ResponseCache) -> Self {
        self.cache = cache;
        self
    }

    pub fn registry(&self) -> &AdapterRegistry {
        &self.registry
    }

    pub fn cache(&self) -> &ResponseCache {
        &self.cache
    }

    /// Send one message and wait for the complete response.
    ///
    /// `interface_options` accepts a bare `u64` as shorthand for a cache TTL
    /// in seconds.
    pub async fn send_message(
        &self,
        provider: impl Into<ProviderSelector>,
        message: impl Into<MessageInput>,
        options: CallOptions,
        interface_options: impl Into<InterfaceOptions>,
    ) -> Result<ChatResponse, LlmError> {
        let selector = provider.into();
        let message = message.into();
        let interface_options = interface_options.into();
        let span = info_span!(
            "send_message",
            provider = %selector.name,
            request_id = %Uuid::new_v4()
        );
        async move {
            let adapter = self.registry.resolve(&selector).await?;
            let executor = ChatExecutor {
                provider_id: &selector.name,
                adapter,
                config: self.registry.config(&selector.name)?,
                cache: &self.cache,
            };
            executor
                .execute(message, &options, &interface_options)
                .await
        }
        .instrument(span)
        .await
    }

    /// Open a streaming call. The stream yields text deltas and ends when the
    /// provider closes the connection.
    pub async fn stream_message(
        &self,
        provider: impl Into<ProviderSelector>,
        message: impl Into<MessageInput>,
        options: CallOptions,
        interface_options: impl Into<InterfaceOptions>,
    ) -> Result<ChatStream, LlmError> {
        let selector = provider.into();
        let message = message.into();
        let interface_options = interface_options.into();
        let span = info_span!(
            "stream_message",
            provider = %selector.name,
            request_id = %Uuid::new_v4()
        );
        async move {
            let adapter = self.registry.resolve(&selector).await?;
            let executor = ChatExecutor {
                provider_id: &selector.name,
                adapter,
                config: self.registry.config(&selector.name)?,
                cache: &self.cache,
            };
            executor
                .execute_stream(message, &options, &interface_options)
                .await
        }
        .instrument(span)
        .await
    }

    /// Canonical model id behind a provider's short name.
    pub fn model_by_alias(&self, provider: &str, alias: &str) -> Option<String> {
        self.registry.configs().model_by_alias(provider, alias)
    }

    /// Read a provider config value by dotted key, e.g. `"model.default"`.
    pub fn config_value(&self, provider: &str, key: &str) -> Option<serde_json::Value> {
        self.registry.configs().config_value(provider, key)
    }

    pub fn provider_names(&self) -> Vec<&str> {
        self.registry.provider_names()
    }
}
