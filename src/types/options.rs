//! Per-call options: generation options, interface options and the provider selector.

use std::collections::BTreeMap;

use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::chat::ResponseFormat;

/// Generation options supplied by the caller. Anything left `None` falls back
/// to the documented defaults during normalization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct CallOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, alias = "maxTokens", skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 1))]
    pub max_tokens: Option<u32>,
    #[serde(default, alias = "responseFormat", skip_serializing_if = "Option::is_none")]
    pub response_format: Option<ResponseFormat>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 0.0, max = 2.0))]
    pub temperature: Option<f64>,
    #[serde(default, alias = "topP", skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 0.0, max = 1.0))]
    pub top_p: Option<f64>,
    #[serde(default, alias = "topK", skip_serializing_if = "Option::is_none")]
    pub top_k: Option<u32>,
    /// Provider-specific numeric knobs passed through verbatim.
    #[serde(flatten)]
    pub extra: BTreeMap<String, f64>,
}

impl CallOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    pub fn with_response_format(mut self, format: ResponseFormat) -> Self {
        self.response_format = Some(format);
        self
    }

    pub fn json_object(self) -> Self {
        self.with_response_format(ResponseFormat::JsonObject)
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_top_p(mut self, top_p: f64) -> Self {
        self.top_p = Some(top_p);
        self
    }

    pub fn with_top_k(mut self, top_k: u32) -> Self {
        self.top_k = Some(top_k);
        self
    }

    pub fn with_param(mut self, name: impl Into<String>, value: f64) -> Self {
        self.extra.insert(name.into(), value);
        self
    }
}

/// Cache and retry behaviour for one call.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterfaceOptions {
    /// Cache TTL in seconds; `None` disables caching for the call.
    #[serde(default)]
    pub cache_timeout_seconds: Option<u64>,
    /// Additional attempts after the first failure.
    #[serde(default)]
    pub retry_attempts: u32,
    #[serde(default = "default_retry_multiplier")]
    pub retry_multiplier: f64,
}

pub const DEFAULT_RETRY_MULTIPLIER: f64 = 0.3;

fn default_retry_multiplier() -> f64 {
    DEFAULT_RETRY_MULTIPLIER
}

impl Default for InterfaceOptions {
    fn default() -> Self {
        Self {
            cache_timeout_seconds: None,
            retry_attempts: 0,
            retry_multiplier: DEFAULT_RETRY_MULTIPLIER,
        }
    }
}

impl InterfaceOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cache_timeout(mut self, seconds: u64) -> Self {
        self.cache_timeout_seconds = Some(seconds);
        self
    }

    pub fn with_retry_attempts(mut self, attempts: u32) -> Self {
        self.retry_attempts = attempts;
        self
    }

    pub fn with_retry_multiplier(mut self, multiplier: f64) -> Self {
        self.retry_multiplier = multiplier;
        self
    }
}

/// A bare number is shorthand for a cache TTL.
impl From<u64> for InterfaceOptions {
    fn from(seconds: u64) -> Self {
        Self::default().with_cache_timeout(seconds)
    }
}

/// Which provider to talk to, optionally with an ad-hoc API key.
#[derive(Debug, Clone)]
pub struct ProviderSelector {
    pub name: String,
    pub api_key: Option<SecretString>,
}

impl ProviderSelector {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            api_key: None,
        }
    }

    pub fn with_api_key(name: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            api_key: Some(SecretString::from(api_key.into())),
        }
    }
}

impl From<&str> for ProviderSelector {
    fn from(name: &str) -> Self {
        Self::named(name)
    }
}

impl From<String> for ProviderSelector {
    fn from(name: String) -> Self {
        Self::named(name)
    }
}

impl From<(&str, &str)> for ProviderSelector {
    fn from((name, key): (&str, &str)) -> Self {
        Self::with_api_key(name, key)
    }
}

impl From<(String, String)> for ProviderSelector {
    fn from((name, key): (String, String)) -> Self {
        Self::with_api_key(name, key)
    }
}
