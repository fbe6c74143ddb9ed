//! Errors raised while querying a job's status or waiting for it to finish.
//!
//! [`StatusError`] keeps the underlying cause for diagnostics while
//! [`StatusError::kind`] collapses the variants into the four categories
//! callers branch on.

use std::fmt;
use std::time::Duration;

use thiserror::Error;

/// Coarse category of a [`StatusError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The request could not be completed or its body could not be decoded.
    Transport,
    /// The payload carried a status outside the known set.
    InvalidStatus,
    /// The caller's deadline passed before a terminal status was seen.
    Timeout,
    /// The retry budget ran out before a terminal status was seen.
    RetryExhausted,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::Transport => write!(f, "Transport"),
            ErrorKind::InvalidStatus => write!(f, "InvalidStatus"),
            ErrorKind::Timeout => write!(f, "Timeout"),
            ErrorKind::RetryExhausted => write!(f, "RetryExhausted"),
        }
    }
}

#[derive(Debug, Error)]
pub enum StatusError {
    /// Connection, DNS or read failure from the HTTP layer.
    #[error("failed to fetch status: {0}")]
    Network(#[from] reqwest::Error),

    /// The endpoint answered with a non-success HTTP status.
    #[error("status endpoint returned HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    /// The body was not a JSON object.
    #[error("malformed status payload: {0}")]
    MalformedBody(String),

    #[error("unrecognized job status: {value}")]
    InvalidStatus { value: String },

    #[error("timed out after {elapsed:?} waiting for completion (limit {limit:?})")]
    Timeout { elapsed: Duration, limit: Duration },

    #[error("max retry attempts exceeded ({attempts} attempts)")]
    RetryExhausted { attempts: u32 },
}

impl StatusError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            StatusError::Network(_)
            | StatusError::HttpStatus { .. }
            | StatusError::MalformedBody(_) => ErrorKind::Transport,
            StatusError::InvalidStatus { .. } => ErrorKind::InvalidStatus,
            StatusError::Timeout { .. } => ErrorKind::Timeout,
            StatusError::RetryExhausted { .. } => ErrorKind::RetryExhausted,
        }
    }
}
