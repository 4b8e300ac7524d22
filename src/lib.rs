//! # unillm
//!
//! One request/response surface over several LLM HTTP APIs.
//!
#![deny(unsafe_code)]

//! A call flows through four stages:
//!
//! - **Normalization**: a prompt or conversation becomes a [`ChatRequest`]
//!   with the model resolved and provider message rules applied.
//! - **Caching**: successful non-empty responses are kept per
//!   `(provider, request)` for a caller-chosen TTL.
//! - **Retry**: failed provider calls are retried with linear backoff.
//! - **Adapters**: one [`ProviderAdapter`] per backend speaks its wire format.
//!
//! ```rust,no_run
//! use unillm::{CallOptions, ChatMessage, Conversation, InterfaceOptions, LlmInterface};
//!
//! # async fn run() -> Result<(), unillm::LlmError> {
//! let llm = LlmInterface::from_env();
//!
//! let conversation = Conversation::new(vec![
//!     ChatMessage::system("You are terse."),
//!     ChatMessage::user("Name three primes as a JSON array."),
//! ]);
//! let reply = llm
//!     .send_message(
//!         "openai",
//!         conversation,
//!         CallOptions::new().json_object(),
//!         InterfaceOptions::new().with_cache_timeout(60).with_retry_attempts(2),
//!     )
//!     .await?;
//! println!("{:?}", reply.structured());
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod config;
pub mod error;
pub mod executors;
pub mod interface;
pub mod normalize;
pub mod observability;
pub mod providers;
pub mod registry;
pub mod retry;
pub mod streaming;
pub mod types;
pub mod utils;

pub use cache::{ManualClock, ResponseCache, SystemClock};
pub use config::{CredentialSource, EnvCredentials, ProviderConfig, ProviderConfigTable, StaticCredentials};
pub use error::{ErrorCategory, LlmError};
pub use interface::LlmInterface;
pub use normalize::MessagePolicy;
pub use providers::{ProviderAdapter, ProviderContext};
pub use registry::{AdapterRegistry, ProviderFactory};
pub use streaming::{ChatStream, collect_text};
pub use types::*;

/// Crate-wide result alias.
pub type Result<T, E = LlmError> = std::result::Result<T, E>;
