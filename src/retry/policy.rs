//! Retry policy and backoff schedule.
//!
//! The schedule is linear: the wait before retry `i` (0-indexed) is
//! `(i + 1) * multiplier` seconds. There is no jitter and no ceiling on the
//! delay.

use std::time::Duration;

use crate::types::{DEFAULT_RETRY_MULTIPLIER, InterfaceOptions};

/// How many times to retry and how fast the waits grow.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    /// Additional attempts after the first failure.
    pub retry_attempts: u32,
    /// Seconds added to the wait for every attempt made.
    pub multiplier: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            retry_attempts: 0,
            multiplier: DEFAULT_RETRY_MULTIPLIER,
        }
    }
}

impl RetryPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    pub const fn with_retry_attempts(mut self, attempts: u32) -> Self {
        self.retry_attempts = attempts;
        self
    }

    pub const fn with_multiplier(mut self, multiplier: f64) -> Self {
        self.multiplier = multiplier;
        self
    }

    /// First attempt plus the retries.
    pub fn total_attempts(&self) -> u32 {
        self.retry_attempts.saturating_add(1)
    }

    /// Wait before the retry following failed attempt `attempt_index`.
    pub fn delay_for(&self, attempt_index: u32) -> Duration {
        let multiplier = self.multiplier.max(0.0);
        let millis = f64::from(attempt_index + 1) * multiplier * 1000.0;
        Duration::from_millis(millis.round() as u64)
    }
}

impl From<&InterfaceOptions> for RetryPolicy {
    fn from(opts: &InterfaceOptions) -> Self {
        Self {
            retry_attempts: opts.retry_attempts,
            multiplier: opts.retry_multiplier,
        }
    }
}

/// Per-call retry bookkeeping, passed by value from one attempt to the next.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryState {
    pub attempts_remaining: u32,
    pub attempt_index: u32,
    pub multiplier: f64,
}

impl RetryState {
    pub fn start(policy: &RetryPolicy) -> Self {
        Self {
            attempts_remaining: policy.retry_attempts,
            attempt_index: 0,
            multiplier: policy.multiplier,
        }
    }

    /// After a failure: the wait before the next attempt and the state that
    /// attempt runs with, or `None` once the budget is spent.
    pub fn advance(self) -> Option<(Duration, RetryState)> {
        if self.attempts_remaining == 0 {
            return None;
        }
        let delay = RetryPolicy {
            retry_attempts: self.attempts_remaining,
            multiplier: self.multiplier,
        }
        .delay_for(self.attempt_index);
        let next = RetryState {
            attempts_remaining: self.attempts_remaining - 1,
            attempt_index: self.attempt_index + 1,
            multiplier: self.multiplier,
        };
        Some((delay, next))
    }
}

/// [`backoff::backoff::Backoff`] driven by a [`RetryState`].
#[derive(Debug, Clone)]
pub struct LinearBackoff {
    initial: RetryState,
    state: Option<RetryState>,
}

impl LinearBackoff {
    pub fn new(policy: &RetryPolicy) -> Self {
        let initial = RetryState::start(policy);
        Self {
            initial,
            state: Some(initial),
        }
    }
}

impl backoff::backoff::Backoff for LinearBackoff {
    fn reset(&mut self) {
        self.state = Some(self.initial);
    }

    fn next_backoff(&mut self) -> Option<Duration> {
        let (delay, next) = self.state.take()?.advance()?;
        self.state = Some(next);
        Some(delay)
    }
}
