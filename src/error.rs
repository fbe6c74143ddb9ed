use thiserror::Error;

use crate::poller::RetryConfigError;

/// Errors surfaced by the `jobpoll` command-line front end.
#[derive(Debug, Error)]
pub enum JobpollError {
    #[error("Config error: {0}")]
    Config(String),

    #[error("Invalid retry settings: {0}")]
    Retry(#[from] RetryConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retry_errors_are_wrapped() {
        let err = JobpollError::from(RetryConfigError::ZeroInitialDelay);
        assert_eq!(
            err.to_string(),
            "Invalid retry settings: initial delay must be greater than zero"
        );
    }
}
