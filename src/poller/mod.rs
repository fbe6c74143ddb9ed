//! Polling loop that waits for a job to reach a terminal status.
//!
//! [`PollingClient::wait_for_completion`] repeatedly queries a
//! [`StatusSource`], sleeping with exponential backoff between `pending`
//! answers, until one of these happens:
//!
//! - a terminal status (`completed` or `error`) is returned as `Ok`;
//! - the caller's timeout passes before the next query ([`StatusError::Timeout`]);
//! - the retry budget is used up ([`StatusError::RetryExhausted`]);
//! - a query fails, and its error is returned without retrying.

mod observer;
mod retry;

use std::time::Duration;

use tokio::time::{Instant, sleep};
use tracing::{debug, warn};

use crate::status::{HttpStatusSource, StatusError, StatusResponse, StatusSource};

pub use observer::StatusObserver;
pub use retry::{RetryConfig, RetryConfigError};

/// Client that queries a job's status and waits for it to finish.
pub struct PollingClient<S = HttpStatusSource> {
    source: S,
    retry_config: RetryConfig,
    observer: Option<Box<dyn StatusObserver>>,
}

impl PollingClient<HttpStatusSource> {
    /// Client for the HTTP endpoint at `base_url` with default retry settings.
    pub fn new(base_url: impl Into<String>) -> Result<Self, StatusError> {
        Ok(Self::from_source(HttpStatusSource::new(base_url)?))
    }
}

impl<S: StatusSource> PollingClient<S> {
    pub fn from_source(source: S) -> Self {
        Self {
            source,
            retry_config: RetryConfig::default(),
            observer: None,
        }
    }

    /// Replace the retry settings. Rejects configs whose backoff would not be
    /// a bounded, non-decreasing sequence.
    pub fn with_retry_config(mut self, config: RetryConfig) -> Result<Self, RetryConfigError> {
        config.validate()?;
        self.retry_config = config;
        Ok(self)
    }

    /// Register the observer notified after every successful query.
    pub fn with_observer(mut self, observer: impl StatusObserver + 'static) -> Self {
        self.observer = Some(Box::new(observer));
        self
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Query the status once, without retrying or notifying the observer.
    pub async fn get_status(&self) -> Result<StatusResponse, StatusError> {
        self.source.fetch_status().await
    }

    /// Poll until the job reports a terminal status.
    ///
    /// A job-level `error` status is a normal return; inspect
    /// [`StatusResponse::status`] to tell it apart from `completed`.
    pub async fn wait_for_completion(
        &self,
        timeout: Option<Duration>,
    ) -> Result<StatusResponse, StatusError> {
        let mut state = PollState::new(&self.retry_config);

        loop {
            if let Some(limit) = timeout {
                let elapsed = state.started.elapsed();
                if elapsed >= limit {
                    warn!(?elapsed, ?limit, "timed out waiting for completion");
                    return Err(StatusError::Timeout { elapsed, limit });
                }
            }

            if state.attempts >= self.retry_config.max_retries {
                warn!(attempts = state.attempts, "max retry attempts exceeded");
                return Err(StatusError::RetryExhausted {
                    attempts: state.attempts,
                });
            }

            let response = self.source.fetch_status().await?;
            debug!(status = %response.status(), attempt = state.attempts, "status received");

            if let Some(observer) = &self.observer {
                observer.on_status(&response);
            }

            if response.is_terminal() {
                debug!(status = %response.status(), "status returned");
                return Ok(response);
            }

            debug!(delay = ?state.current_delay, "status still pending, waiting before retry");
            sleep(state.current_delay).await;
            state.advance(&self.retry_config);
        }
    }
}

/// Mutable bookkeeping for a single `wait_for_completion` call.
struct PollState {
    started: Instant,
    current_delay: Duration,
    attempts: u32,
}

impl PollState {
    fn new(config: &RetryConfig) -> Self {
        Self {
            started: Instant::now(),
            current_delay: config.initial_delay,
            attempts: 0,
        }
    }

    fn advance(&mut self, config: &RetryConfig) {
        self.current_delay = config.next_delay(self.current_delay);
        self.attempts += 1;
    }
}
