use std::time::Duration;

use thiserror::Error;

/// Backoff and retry-budget settings for [`PollingClient`](super::PollingClient).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryConfig {
    /// Delay after the first `pending` answer.
    pub initial_delay: Duration,
    /// Upper bound for any single delay.
    pub max_delay: Duration,
    /// Number of pending answers tolerated before giving up.
    pub max_retries: u32,
    /// Multiplier applied to the delay after every pending answer.
    pub backoff_factor: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            initial_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(30),
            max_retries: 10,
            backoff_factor: 1.5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RetryConfigError {
    #[error("initial delay must be greater than zero")]
    ZeroInitialDelay,

    #[error("max delay ({max:?}) must not be shorter than initial delay ({initial:?})")]
    MaxBelowInitial { initial: Duration, max: Duration },

    #[error("backoff factor must be a finite number greater than 1.0, got {0}")]
    InvalidBackoffFactor(f64),
}

impl RetryConfig {
    /// Check the invariants the backoff sequence relies on.
    pub fn validate(&self) -> Result<(), RetryConfigError> {
        if self.initial_delay.is_zero() {
            return Err(RetryConfigError::ZeroInitialDelay);
        }
        if self.max_delay < self.initial_delay {
            return Err(RetryConfigError::MaxBelowInitial {
                initial: self.initial_delay,
                max: self.max_delay,
            });
        }
        if !self.backoff_factor.is_finite() || self.backoff_factor <= 1.0 {
            return Err(RetryConfigError::InvalidBackoffFactor(self.backoff_factor));
        }
        Ok(())
    }

    /// Delay that follows `current`: `min(current * backoff_factor, max_delay)`.
    pub fn next_delay(&self, current: Duration) -> Duration {
        Duration::try_from_secs_f64(current.as_secs_f64() * self.backoff_factor)
            .map_or(self.max_delay, |next| next.min(self.max_delay))
    }

    /// The sequence of sleeps a wait performs, starting at `initial_delay`.
    pub fn delays(&self) -> impl Iterator<Item = Duration> + '_ {
        std::iter::successors(Some(self.initial_delay.min(self.max_delay)), move |d| {
            Some(self.next_delay(*d))
        })
    }
}
