//! Canonical response shape returned to callers.

use serde::{Deserialize, Serialize};

/// What `send_message` resolves to.
///
/// `Text` for unstructured output. `Structured` when a `json_object` format was
/// requested; `None` inside means the model produced something that did not
/// parse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ChatResponse {
    Text(String),
    Structured(Option<serde_json::Value>),
}

impl ChatResponse {
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Structured(_) => None,
        }
    }

    pub fn structured(&self) -> Option<&serde_json::Value> {
        match self {
            Self::Structured(value) => value.as_ref(),
            Self::Text(_) => None,
        }
    }

    /// True for an empty text or an unparsed structured result.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Text(text) => text.is_empty(),
            Self::Structured(value) => value.as_ref().is_none_or(serde_json::Value::is_null),
        }
    }
}
