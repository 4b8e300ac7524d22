//! Error Handling Module
//!
//! Core error types (`LlmError`, `ErrorCategory`) and conversions from the
//! error types of the crates we sit on top of.
//!
//! # Example
//!
//! ```rust
//! use unillm::error::{ErrorCategory, LlmError};
//!
//! let error = LlmError::ConfigurationError("No such provider: foo".into());
//! assert_eq!(error.category(), ErrorCategory::Configuration);
//! assert!(!error.is_retryable());
//! ```

mod conversions;
pub mod types;

pub use types::*;
