//! Executors: the per-call pipeline that drives a provider adapter.

pub mod chat;

pub use chat::{ChatExecutor, shape_response};
