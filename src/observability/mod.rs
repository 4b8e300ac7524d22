//! Tracing subscriber setup for binaries and tests that embed the crate.

use tracing_subscriber::EnvFilter;

pub const DEFAULT_DIRECTIVE: &str = "unillm=info";

/// Install a `fmt` subscriber filtered by `RUST_LOG`, falling back to
/// `default_directive` (or [`DEFAULT_DIRECTIVE`]).
///
/// Returns `false` when a global subscriber was already installed.
pub fn init_tracing(default_directive: Option<&str>) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_directive.unwrap_or(DEFAULT_DIRECTIVE)))
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .compact()
        .try_init()
        .is_ok()
}
