//! Retry executor

use std::future::Future;
use std::time::Duration;

use tracing::{error, warn};

use super::policy::{LinearBackoff, RetryPolicy};
use crate::error::LlmError;

/// Runs an operation under a [`RetryPolicy`].
///
/// Retryable errors are retried until the budget is spent; terminal errors
/// (configuration, validation) come back immediately. The final error is
/// returned unchanged after its diagnostic payload has been logged.
#[derive(Debug, Clone, Copy)]
pub struct RetryExecutor {
    policy: RetryPolicy,
}

impl RetryExecutor {
    pub const fn new(policy: RetryPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    pub async fn execute<F, Fut, T>(&self, mut operation: F) -> Result<T, LlmError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, LlmError>>,
    {
        let mut attempt: u32 = 0;
        let result = backoff::future::retry_notify(
            LinearBackoff::new(&self.policy),
            || {
                attempt += 1;
                let fut = operation();
                async move {
                    fut.await.map_err(|e| {
                        if e.is_retryable() {
                            backoff::Error::transient(e)
                        } else {
                            backoff::Error::permanent(e)
                        }
                    })
                }
            },
            |err: LlmError, delay: Duration| {
                warn!(error = %err, delay_ms = delay.as_millis() as u64, "attempt failed, retrying");
            },
        )
        .await;

        if let Err(err) = &result {
            match err.details() {
                Some(details) => error!(attempts = attempt, error = %err, details = %details, "request failed"),
                None => error!(attempts = attempt, error = %err, "request failed"),
            }
        }
        result
    }
}
