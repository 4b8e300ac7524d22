//! Credential sources

use std::collections::HashMap;
use std::fmt::Debug;

use secrecy::SecretString;

use super::ProviderConfigTable;

/// Supplies default API keys and base URL overrides per provider.
pub trait CredentialSource: Send + Sync + Debug {
    fn api_key(&self, provider: &str) -> Option<SecretString>;

    fn base_url(&self, _provider: &str) -> Option<String> {
        None
    }
}

/// Reads credentials from the process environment.
///
/// Keys come from the provider's configured `api_key_env`, falling back to
/// `<PROVIDER>_API_KEY`. Base URLs come from `<PROVIDER>_BASE_URL`.
#[derive(Debug, Clone, Default)]
pub struct EnvCredentials {
    key_vars: HashMap<String, String>,
}

impl EnvCredentials {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_table(table: &ProviderConfigTable) -> Self {
        let key_vars = table
            .provider_names()
            .filter_map(|name| {
                let var = table.get(name)?.api_key_env.clone()?;
                Some((name.to_string(), var))
            })
            .collect();
        Self { key_vars }
    }

    fn env_prefix(provider: &str) -> String {
        provider
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() {
                    c.to_ascii_uppercase()
                } else {
                    '_'
                }
            })
            .collect()
    }

    fn read(var: &str) -> Option<String> {
        std::env::var(var).ok().filter(|v| !v.trim().is_empty())
    }
}

impl CredentialSource for EnvCredentials {
    fn api_key(&self, provider: &str) -> Option<SecretString> {
        let var = self
            .key_vars
            .get(provider)
            .cloned()
            .unwrap_or_else(|| format!("{}_API_KEY", Self::env_prefix(provider)));
        Self::read(&var).map(SecretString::from)
    }

    fn base_url(&self, provider: &str) -> Option<String> {
        Self::read(&format!("{}_BASE_URL", Self::env_prefix(provider)))
    }
}

/// In-memory credentials, handy for tests and for embedding the crate in an
/// application that manages its own secrets.
#[derive(Debug, Clone, Default)]
pub struct StaticCredentials {
    keys: HashMap<String, SecretString>,
    base_urls: HashMap<String, String>,
}

impl StaticCredentials {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_api_key(mut self, provider: impl Into<String>, key: impl Into<String>) -> Self {
        self.keys
            .insert(provider.into(), SecretString::from(key.into()));
        self
    }

    pub fn with_base_url(mut self, provider: impl Into<String>, url: impl Into<String>) -> Self {
        self.base_urls.insert(provider.into(), url.into());
        self
    }
}

impl CredentialSource for StaticCredentials {
    fn api_key(&self, provider: &str) -> Option<SecretString> {
        self.keys.get(provider).cloned()
    }

    fn base_url(&self, provider: &str) -> Option<String> {
        self.base_urls.get(provider).cloned()
    }
}
