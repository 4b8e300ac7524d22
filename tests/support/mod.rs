//! Shared test doubles for integration tests.
#![allow(dead_code)]

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use unillm::config::ModelAliases;
use unillm::registry::AdapterRegistry;
use unillm::{
    ChatRequest, ChatStream, LlmError, LlmInterface, MessagePolicy, ProviderAdapter,
    ProviderConfig, ProviderContext, ProviderFactory, StaticCredentials,
};

/// Adapter that counts calls, fails a configurable number of times and then
/// answers with a fixed reply.
#[derive(Debug)]
pub struct StubAdapter {
    reply: String,
    policy: MessagePolicy,
    fail_first: u32,
    failure: LlmError,
    calls: AtomicU32,
    requests: Mutex<Vec<ChatRequest>>,
}

impl StubAdapter {
    pub fn replying(reply: impl Into<String>) -> Self {
        Self {
            reply: reply.into(),
            policy: MessagePolicy::permissive(),
            fail_first: 0,
            failure: LlmError::api_error(500, "forced failure"),
            calls: AtomicU32::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn failing_first(mut self, times: u32, error: LlmError) -> Self {
        self.fail_first = times;
        self.failure = error;
        self
    }

    pub fn with_policy(mut self, policy: MessagePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_request(&self) -> Option<ChatRequest> {
        self.requests.lock().unwrap().last().cloned()
    }

    fn record(&self, request: &ChatRequest) -> Result<(), LlmError> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        self.requests.lock().unwrap().push(request.clone());
        if n <= self.fail_first {
            return Err(self.failure.clone());
        }
        Ok(())
    }
}

#[async_trait]
impl ProviderAdapter for StubAdapter {
    fn provider_name(&self) -> &str {
        "stub"
    }

    fn message_policy(&self) -> MessagePolicy {
        self.policy
    }

    async fn complete(&self, request: &ChatRequest) -> Result<String, LlmError> {
        self.record(request)?;
        Ok(self.reply.clone())
    }

    async fn stream(&self, request: &ChatRequest) -> Result<ChatStream, LlmError> {
        self.record(request)?;
        let chunks: Vec<Result<String, LlmError>> = self
            .reply
            .split_inclusive(' ')
            .map(|s| Ok(s.to_string()))
            .collect();
        Ok(Box::pin(futures_util::stream::iter(chunks)))
    }
}

/// Hands out the same stub every time so tests can inspect its counters.
pub struct StubFactory(pub Arc<StubAdapter>);

impl ProviderFactory for StubFactory {
    fn create(&self, _ctx: ProviderContext) -> Result<Arc<dyn ProviderAdapter>, LlmError> {
        Ok(self.0.clone())
    }
}

pub fn stub_config() -> ProviderConfig {
    ProviderConfig::new(
        "http://stub.invalid",
        ModelAliases::new("stub-default").with_large("stub-large"),
    )
    .without_api_key()
}

pub fn stub_registry(stub: Arc<StubAdapter>) -> AdapterRegistry {
    AdapterRegistry::builder()
        .register("stub", StubFactory(stub), stub_config())
        .with_credentials(Arc::new(StaticCredentials::new()))
        .build()
}

pub fn stub_interface(stub: Arc<StubAdapter>) -> LlmInterface {
    LlmInterface::new(stub_registry(stub))
}

/// Registry with the built-in adapters pointed at a mock server.
pub fn mock_interface(provider: &str, base_url: &str, api_key: Option<&str>) -> LlmInterface {
    let mut credentials = StaticCredentials::new().with_base_url(provider, base_url);
    if let Some(key) = api_key {
        credentials = credentials.with_api_key(provider, key);
    }
    LlmInterface::new(
        AdapterRegistry::builder()
            .with_builtin_providers()
            .with_credentials(Arc::new(credentials))
            .build(),
    )
}
