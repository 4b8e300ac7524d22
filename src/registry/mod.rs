//! Adapter Registry
//!
//! Name-keyed table of provider factories and their configuration, built once
//! at startup and read-only afterwards. Adapter instances are constructed on
//! first use and memoized per `(provider, api key)` so an ad-hoc key never
//! replaces the default instance.

mod factory;

pub use factory::{
    GeminiFactory, LlamaCppFactory, OPENAI_COMPATIBLE_PROVIDERS, OpenAiCompatibleFactory,
    ProviderFactory,
};

use std::collections::HashMap;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};
use tokio::sync::Mutex as TokioMutex;
use tracing::debug;

use crate::config::{CredentialSource, EnvCredentials, ProviderConfig, ProviderConfigTable};
use crate::error::LlmError;
use crate::providers::{ProviderAdapter, ProviderContext};
use crate::types::ProviderSelector;

/// Instance cache key. The API key is only kept as a hash.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct InstanceKey {
    provider: String,
    key_fingerprint: Option<u64>,
}

impl InstanceKey {
    fn new(provider: &str, api_key: Option<&SecretString>) -> Self {
        let key_fingerprint = api_key.map(|k| {
            let mut hasher = DefaultHasher::new();
            k.expose_secret().hash(&mut hasher);
            hasher.finish()
        });
        Self {
            provider: provider.to_string(),
            key_fingerprint,
        }
    }
}

pub struct AdapterRegistry {
    factories: HashMap<String, Arc<dyn ProviderFactory>>,
    configs: ProviderConfigTable,
    credentials: Arc<dyn CredentialSource>,
    http_client: reqwest::Client,
    instances: TokioMutex<HashMap<InstanceKey, Arc<dyn ProviderAdapter>>>,
}

impl std::fmt::Debug for AdapterRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<_> = self.factories.keys().collect();
        names.sort();
        f.debug_struct("AdapterRegistry")
            .field("providers", &names)
            .field("credentials", &self.credentials)
            .finish_non_exhaustive()
    }
}

impl AdapterRegistry {
    pub fn builder() -> AdapterRegistryBuilder {
        AdapterRegistryBuilder::default()
    }

    /// Registry with every built-in provider and environment credentials.
    pub fn from_env() -> Self {
        Self::builder().with_builtin_providers().build()
    }

    pub fn configs(&self) -> &ProviderConfigTable {
        &self.configs
    }

    pub fn config(&self, provider: &str) -> Result<&ProviderConfig, LlmError> {
        self.configs.require(provider)
    }

    pub fn provider_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.factories.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn contains(&self, provider: &str) -> bool {
        self.factories.contains_key(provider)
    }

    fn factory(&self, provider: &str) -> Result<&Arc<dyn ProviderFactory>, LlmError> {
        self.factories.get(provider).ok_or_else(|| {
            LlmError::ConfigurationError(format!(
                "No such provider: {provider}. Available providers: {:?}",
                self.provider_names()
            ))
        })
    }

    /// Adapter for `selector`, building it on first use.
    pub async fn resolve(
        &self,
        selector: &ProviderSelector,
    ) -> Result<Arc<dyn ProviderAdapter>, LlmError> {
        let name = selector.name.as_str();
        let factory = self.factory(name)?;
        let config = self.configs.require(name)?;
        let key = InstanceKey::new(name, selector.api_key.as_ref());

        let mut instances = self.instances.lock().await;
        if let Some(adapter) = instances.get(&key) {
            return Ok(adapter.clone());
        }

        let mut ctx = ProviderContext::new(name, config.clone())
            .with_http_client(self.http_client.clone());
        if let Some(base_url) = self.credentials.base_url(name) {
            ctx = ctx.with_base_url(base_url);
        }
        if let Some(api_key) = selector
            .api_key
            .clone()
            .or_else(|| self.credentials.api_key(name))
        {
            ctx = ctx.with_api_key(api_key);
        }

        debug!(provider = name, ad_hoc_key = selector.api_key.is_some(), "constructing adapter");
        let adapter = factory.create(ctx)?;
        instances.insert(key, adapter.clone());
        Ok(adapter)
    }
}

#[derive(Default)]
pub struct AdapterRegistryBuilder {
    factories: HashMap<String, Arc<dyn ProviderFactory>>,
    configs: ProviderConfigTable,
    credentials: Option<Arc<dyn CredentialSource>>,
    http_client: Option<reqwest::Client>,
}

impl AdapterRegistryBuilder {
    /// Register every provider shipped with the crate with its default config.
    pub fn with_builtin_providers(mut self) -> Self {
        let builtin = ProviderConfigTable::builtin();
        let mut add = |name: &str, factory: Arc<dyn ProviderFactory>| {
            self.factories.entry(name.to_string()).or_insert(factory);
        };
        for name in OPENAI_COMPATIBLE_PROVIDERS {
            add(*name, Arc::new(OpenAiCompatibleFactory));
        }
        add("gemini", Arc::new(GeminiFactory));
        add("llamacpp", Arc::new(LlamaCppFactory));
        // anything registered explicitly before this call wins
        self.configs = builtin.merge(self.configs);
        self
    }

    pub fn register(
        mut self,
        name: impl Into<String>,
        factory: impl ProviderFactory + 'static,
        config: ProviderConfig,
    ) -> Self {
        let name = name.into();
        self.configs = self.configs.with_provider(name.clone(), config);
        self.factories.insert(name, Arc::new(factory));
        self
    }

    /// Overlay a configuration table (e.g. loaded from JSON) on top of what
    /// is already registered.
    pub fn with_config_table(mut self, table: ProviderConfigTable) -> Self {
        self.configs = self.configs.merge(table);
        self
    }

    pub fn with_credentials(mut self, credentials: Arc<dyn CredentialSource>) -> Self {
        self.credentials = Some(credentials);
        self
    }

    pub fn with_http_client(mut self, client: reqwest::Client) -> Self {
        self.http_client = Some(client);
        self
    }

    pub fn build(self) -> AdapterRegistry {
        let credentials = self
            .credentials
            .unwrap_or_else(|| Arc::new(EnvCredentials::from_table(&self.configs)));
        AdapterRegistry {
            factories: self.factories,
            configs: self.configs,
            credentials,
            http_client: self.http_client.unwrap_or_default(),
            instances: TokioMutex::new(HashMap::new()),
        }
    }
}
