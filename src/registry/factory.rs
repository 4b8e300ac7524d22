//! Provider factories
//!
//! A factory turns a [`ProviderContext`] (config, resolved key, base URL,
//! HTTP client) into a ready adapter. Factories are registered once at
//! startup; the registry calls them lazily on first use.

use std::sync::Arc;

use crate::error::LlmError;
use crate::providers::{
    GeminiAdapter, LlamaCppAdapter, OpenAiCompatibleAdapter, ProviderAdapter, ProviderContext,
};

pub trait ProviderFactory: Send + Sync {
    fn create(&self, ctx: ProviderContext) -> Result<Arc<dyn ProviderAdapter>, LlmError>;
}

impl<F> ProviderFactory for F
where
    F: Fn(ProviderContext) -> Result<Arc<dyn ProviderAdapter>, LlmError> + Send + Sync,
{
    fn create(&self, ctx: ProviderContext) -> Result<Arc<dyn ProviderAdapter>, LlmError> {
        self(ctx)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct OpenAiCompatibleFactory;

impl ProviderFactory for OpenAiCompatibleFactory {
    fn create(&self, ctx: ProviderContext) -> Result<Arc<dyn ProviderAdapter>, LlmError> {
        Ok(Arc::new(OpenAiCompatibleAdapter::new(ctx)?))
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct GeminiFactory;

impl ProviderFactory for GeminiFactory {
    fn create(&self, ctx: ProviderContext) -> Result<Arc<dyn ProviderAdapter>, LlmError> {
        Ok(Arc::new(GeminiAdapter::new(ctx)?))
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LlamaCppFactory;

impl ProviderFactory for LlamaCppFactory {
    fn create(&self, ctx: ProviderContext) -> Result<Arc<dyn ProviderAdapter>, LlmError> {
        Ok(Arc::new(LlamaCppAdapter::new(ctx)?))
    }
}

/// Names served by the OpenAI-compatible adapter out of the box.
pub const OPENAI_COMPATIBLE_PROVIDERS: &[&str] = &["openai", "groq", "deepseek", "mistral", "writer"];
