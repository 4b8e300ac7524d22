//! Error types shared by every layer of the crate.

use thiserror::Error;

/// Unified error type for every provider call.
#[derive(Error, Debug, Clone)]
pub enum LlmError {
    /// Network-level failure (connect, TLS, body read).
    #[error("HTTP error: {0}")]
    HttpError(String),

    /// The provider answered with a non-2xx status.
    #[error("API error {code}: {message}")]
    ApiError {
        code: u16,
        message: String,
        details: Option<serde_json::Value>,
    },

    /// The provider envelope could not be understood.
    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("JSON error: {0}")]
    JsonError(String),

    #[error("Stream error: {0}")]
    StreamError(String),

    /// Unknown provider, bad base URL, malformed config table.
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    #[error("Missing API key for provider '{0}'")]
    MissingApiKey(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Coarse classification used by the retry controller and for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Provider,
    Parsing,
    Configuration,
    Validation,
    Unsupported,
    Internal,
}

impl LlmError {
    /// Build an `ApiError` without a structured payload.
    pub fn api_error(code: u16, message: impl Into<String>) -> Self {
        Self::ApiError {
            code,
            message: message.into(),
            details: None,
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::HttpError(_) | Self::StreamError(_) => ErrorCategory::Network,
            Self::ApiError { .. } => ErrorCategory::Provider,
            Self::ParseError(_) | Self::JsonError(_) => ErrorCategory::Parsing,
            Self::ConfigurationError(_) | Self::MissingApiKey(_) => ErrorCategory::Configuration,
            Self::InvalidParameter(_) | Self::InvalidInput(_) => ErrorCategory::Validation,
            Self::UnsupportedOperation(_) => ErrorCategory::Unsupported,
            Self::InternalError(_) => ErrorCategory::Internal,
        }
    }

    /// Transport and provider failures are retried; anything caused by the
    /// caller's own setup is not.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self.category(),
            ErrorCategory::Network | ErrorCategory::Provider | ErrorCategory::Parsing
        )
    }

    /// HTTP status when the provider produced one.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::ApiError { code, .. } => Some(*code),
            _ => None,
        }
    }

    /// Structured diagnostic payload (usually the provider's error body).
    pub fn details(&self) -> Option<&serde_json::Value> {
        match self {
            Self::ApiError { details, .. } => details.as_ref(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn provider_failures_are_retryable() {
        assert!(LlmError::HttpError("connection reset".into()).is_retryable());
        assert!(LlmError::api_error(400, "bad").is_retryable());
        assert!(LlmError::api_error(503, "unavailable").is_retryable());
        assert!(LlmError::ParseError("missing choices".into()).is_retryable());
    }

    #[test]
    fn configuration_failures_are_terminal() {
        assert!(!LlmError::ConfigurationError("No such provider".into()).is_retryable());
        assert!(!LlmError::MissingApiKey("gemini".into()).is_retryable());
        assert!(!LlmError::InvalidParameter("max_tokens".into()).is_retryable());
    }

    #[test]
    fn details_only_on_api_errors() {
        let err = LlmError::ApiError {
            code: 429,
            message: "slow down".into(),
            details: Some(json!({"error": {"type": "rate_limit"}})),
        };
        assert_eq!(err.status_code(), Some(429));
        assert_eq!(err.details().unwrap()["error"]["type"], "rate_limit");
        assert!(LlmError::HttpError("x".into()).details().is_none());
    }
}
