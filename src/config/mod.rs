//! Provider configuration and credentials.
//!
//! Both collaborators are read-only once the interface is built: the table
//! answers "what is the default model / base URL / alias for provider X" and a
//! [`CredentialSource`] answers "which key do we use for provider X".

mod credentials;

pub use credentials::{CredentialSource, EnvCredentials, StaticCredentials};

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::error::LlmError;

/// Named model slots every provider exposes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelAliases {
    pub default: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub large: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub small: Option<String>,
}

impl ModelAliases {
    pub fn new(default: impl Into<String>) -> Self {
        Self {
            default: default.into(),
            large: None,
            small: None,
        }
    }

    pub fn with_large(mut self, model: impl Into<String>) -> Self {
        self.large = Some(model.into());
        self
    }

    pub fn with_small(mut self, model: impl Into<String>) -> Self {
        self.small = Some(model.into());
        self
    }
}

/// Static description of one provider endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderConfig {
    pub base_url: String,
    /// Path of the chat endpoint for OpenAI-shaped providers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chat_path: Option<String>,
    pub model: ModelAliases,
    /// Extra short names mapping to canonical model ids.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub aliases: BTreeMap<String, String>,
    /// Environment variable holding the default API key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key_env: Option<String>,
    #[serde(default = "default_requires_api_key")]
    pub requires_api_key: bool,
}

fn default_requires_api_key() -> bool {
    true
}

impl ProviderConfig {
    pub fn new(base_url: impl Into<String>, model: ModelAliases) -> Self {
        Self {
            base_url: base_url.into(),
            chat_path: None,
            model,
            aliases: BTreeMap::new(),
            api_key_env: None,
            requires_api_key: true,
        }
    }

    pub fn with_chat_path(mut self, path: impl Into<String>) -> Self {
        self.chat_path = Some(path.into());
        self
    }

    pub fn with_alias(mut self, alias: impl Into<String>, model: impl Into<String>) -> Self {
        self.aliases.insert(alias.into(), model.into());
        self
    }

    pub fn with_api_key_env(mut self, var: impl Into<String>) -> Self {
        self.api_key_env = Some(var.into());
        self
    }

    pub fn without_api_key(mut self) -> Self {
        self.requires_api_key = false;
        self
    }

    /// Look up a short model name. `default`, `large` and `small` address the
    /// model slots; anything else goes through the alias table.
    pub fn model_by_alias(&self, alias: &str) -> Option<&str> {
        match alias {
            "default" => Some(self.model.default.as_str()),
            "large" => self.model.large.as_deref(),
            "small" => self.model.small.as_deref(),
            other => self.aliases.get(other).map(String::as_str),
        }
    }

    /// Canonical model id for an optional requested name. Unknown names pass
    /// through untouched; nothing requested means the default slot.
    pub fn resolve_model(&self, requested: Option<&str>) -> String {
        match requested {
            Some(name) => self.model_by_alias(name).unwrap_or(name).to_string(),
            None => self.model.default.clone(),
        }
    }
}

/// Name-keyed table of [`ProviderConfig`]s.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProviderConfigTable {
    providers: HashMap<String, ProviderConfig>,
}

impl ProviderConfigTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults for every provider shipped with the crate.
    pub fn builtin() -> Self {
        Self::new()
            .with_provider(
                "openai",
                ProviderConfig::new(
                    "https://api.openai.com/v1",
                    ModelAliases::new("gpt-4o-mini")
                        .with_large("gpt-4o")
                        .with_small("gpt-4o-mini"),
                )
                .with_chat_path("/chat/completions")
                .with_api_key_env("OPENAI_API_KEY"),
            )
            .with_provider(
                "groq",
                ProviderConfig::new(
                    "https://api.groq.com/openai/v1",
                    ModelAliases::new("llama-3.1-8b-instant")
                        .with_large("llama-3.3-70b-versatile")
                        .with_small("llama-3.1-8b-instant"),
                )
                .with_chat_path("/chat/completions")
                .with_api_key_env("GROQ_API_KEY"),
            )
            .with_provider(
                "deepseek",
                ProviderConfig::new(
                    "https://api.deepseek.com",
                    ModelAliases::new("deepseek-chat").with_large("deepseek-reasoner"),
                )
                .with_chat_path("/chat/completions")
                .with_alias("r1", "deepseek-reasoner")
                .with_alias("v3", "deepseek-chat")
                .with_api_key_env("DEEPSEEK_API_KEY"),
            )
            .with_provider(
                "mistral",
                ProviderConfig::new(
                    "https://api.mistral.ai/v1",
                    ModelAliases::new("mistral-small-latest")
                        .with_large("mistral-large-latest")
                        .with_small("open-mistral-nemo"),
                )
                .with_chat_path("/chat/completions")
                .with_api_key_env("MISTRAL_API_KEY"),
            )
            .with_provider(
                "writer",
                ProviderConfig::new(
                    "https://api.writer.com/v1",
                    ModelAliases::new("palmyra-x-004")
                        .with_large("palmyra-x-004")
                        .with_small("palmyra-x-003-instruct"),
                )
                .with_chat_path("/chat")
                .with_api_key_env("WRITER_API_KEY"),
            )
            .with_provider(
                "gemini",
                ProviderConfig::new(
                    "https://generativelanguage.googleapis.com/v1beta",
                    ModelAliases::new("gemini-1.5-flash")
                        .with_large("gemini-1.5-pro")
                        .with_small("gemini-1.5-flash-8b"),
                )
                .with_api_key_env("GEMINI_API_KEY"),
            )
            .with_provider(
                "llamacpp",
                ProviderConfig::new("http://localhost:8080", ModelAliases::new("gguf"))
                    .without_api_key(),
            )
    }

    /// Parse a table from JSON (`{"<provider>": { ... }, ...}`).
    pub fn from_json_str(json: &str) -> Result<Self, LlmError> {
        serde_json::from_str(json)
            .map_err(|e| LlmError::ConfigurationError(format!("Invalid provider table: {e}")))
    }

    pub fn with_provider(mut self, name: impl Into<String>, config: ProviderConfig) -> Self {
        self.providers.insert(name.into(), config);
        self
    }

    /// Overlay `other` on top of `self`; entries in `other` win.
    pub fn merge(mut self, other: ProviderConfigTable) -> Self {
        self.providers.extend(other.providers);
        self
    }

    pub fn get(&self, provider: &str) -> Option<&ProviderConfig> {
        self.providers.get(provider)
    }

    pub fn require(&self, provider: &str) -> Result<&ProviderConfig, LlmError> {
        self.get(provider).ok_or_else(|| {
            let mut known: Vec<_> = self.providers.keys().collect();
            known.sort();
            LlmError::ConfigurationError(format!(
                "No configuration for provider: {provider}. Known providers: {known:?}"
            ))
        })
    }

    pub fn provider_names(&self) -> impl Iterator<Item = &str> {
        self.providers.keys().map(String::as_str)
    }

    pub fn model_by_alias(&self, provider: &str, alias: &str) -> Option<String> {
        self.get(provider)?.model_by_alias(alias).map(str::to_string)
    }

    /// Read a config value by dotted path, e.g. `config_value("gemini", "model.default")`.
    pub fn config_value(&self, provider: &str, key: &str) -> Option<serde_json::Value> {
        let value = serde_json::to_value(self.get(provider)?).ok()?;
        key.split('.')
            .try_fold(&value, |node, segment| node.get(segment))
            .cloned()
    }
}
