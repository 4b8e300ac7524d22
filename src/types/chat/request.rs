//! The canonical, provider-agnostic request.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::message::ChatMessage;

/// Requested output shape.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ResponseFormat {
    #[default]
    Text,
    JsonObject,
}

/// Named numeric generation knobs (`temperature`, `top_p`, `top_k`, ...).
///
/// Backed by a `BTreeMap` so two requests with the same knobs serialize
/// identically whatever order they were set in.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SamplingParams(BTreeMap<String, f64>);

impl SamplingParams {
    pub const TEMPERATURE: &'static str = "temperature";
    pub const TOP_P: &'static str = "top_p";
    pub const TOP_K: &'static str = "top_k";

    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, value: f64) -> Self {
        self.0.insert(name.into(), value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: f64) {
        self.0.insert(name.into(), value);
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.0.get(name).copied()
    }

    pub fn temperature(&self) -> Option<f64> {
        self.get(Self::TEMPERATURE)
    }

    pub fn top_p(&self) -> Option<f64> {
        self.get(Self::TOP_P)
    }

    pub fn top_k(&self) -> Option<u32> {
        // rounded; negative values clamp to 0
        self.get(Self::TOP_K).map(|k| k.round().max(0.0) as u32)
    }

    /// Knobs other than the three every adapter maps explicitly.
    pub fn extra(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0
            .iter()
            .filter(|(k, _)| !matches!(k.as_str(), Self::TEMPERATURE | Self::TOP_P | Self::TOP_K))
            .map(|(k, v)| (k.as_str(), *v))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

/// Normalized request handed to a provider adapter.
///
/// Built once per call by the normalizer and never mutated afterwards, so the
/// fields are only reachable through accessors.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
    response_format: ResponseFormat,
    sampling: SamplingParams,
}

impl ChatRequest {
    pub fn new(
        model: impl Into<String>,
        messages: Vec<ChatMessage>,
        max_tokens: u32,
        response_format: ResponseFormat,
        sampling: SamplingParams,
    ) -> Self {
        Self {
            model: model.into(),
            messages,
            max_tokens,
            response_format,
            sampling,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn max_tokens(&self) -> u32 {
        self.max_tokens
    }

    pub fn response_format(&self) -> ResponseFormat {
        self.response_format
    }

    pub fn sampling(&self) -> &SamplingParams {
        &self.sampling
    }

    pub fn wants_json(&self) -> bool {
        self.response_format == ResponseFormat::JsonObject
    }
}
