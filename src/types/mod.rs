//! Core data types: messages, the canonical request, responses and call options.

pub mod chat;
pub mod options;

pub use chat::*;
pub use options::*;
