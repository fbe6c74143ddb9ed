//! Job status values and the classified response of one status query.
//!
//! The wire format is `{"result": "<pending|completed|error>"}`. Anything
//! else in the `result` field is rejected by [`StatusResponse::from_payload`]
//! instead of being mapped to a default.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::error::StatusError;

/// Name of the payload field that carries the job status.
pub const RESULT_FIELD: &str = "result";

/// State of the remote job as reported by the status endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Pending,
    Completed,
    Error,
}

impl JobStatus {
    /// Wire name of the status.
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Pending => "pending",
            JobStatus::Completed => "completed",
            JobStatus::Error => "error",
        }
    }

    /// `Completed` and `Error` end polling; `Pending` does not.
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Error)
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JobStatus {
    type Err = StatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(JobStatus::Pending),
            "completed" => Ok(JobStatus::Completed),
            "error" => Ok(JobStatus::Error),
            other => Err(StatusError::InvalidStatus {
                value: other.to_string(),
            }),
        }
    }
}

/// Result of one successful status query.
///
/// Keeps the full decoded payload next to the classified status so observers
/// can look at fields the client does not interpret.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusResponse {
    status: JobStatus,
    raw_response: Map<String, Value>,
}

impl StatusResponse {
    /// Classify a decoded payload.
    ///
    /// Fails with [`StatusError::InvalidStatus`] when the `result` field is
    /// missing, not a string, or not one of the known status names.
    pub fn from_payload(payload: Map<String, Value>) -> Result<Self, StatusError> {
        let status = match payload.get(RESULT_FIELD) {
            Some(Value::String(s)) => s.parse::<JobStatus>()?,
            Some(other) => {
                return Err(StatusError::InvalidStatus {
                    value: other.to_string(),
                });
            }
            None => {
                return Err(StatusError::InvalidStatus {
                    value: format!("<missing `{RESULT_FIELD}` field>"),
                });
            }
        };

        Ok(Self {
            status,
            raw_response: payload,
        })
    }

    pub fn status(&self) -> JobStatus {
        self.status
    }

    /// The decoded JSON payload exactly as received.
    pub fn raw_response(&self) -> &Map<String, Value> {
        &self.raw_response
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }
}
