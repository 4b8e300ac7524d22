//! Retry Controller
//! - policy.rs: attempt budget, linear backoff state machine
//! - executor.rs: runs one provider invocation under a policy

pub mod executor;
pub mod policy;

pub use executor::*;
pub use policy::*;
