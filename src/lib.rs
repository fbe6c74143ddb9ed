//! Client that polls an asynchronous job's status endpoint until the job
//! reaches a terminal state, with exponential backoff, a retry budget and an
//! optional overall timeout.
//!
//! ```no_run
//! use std::time::Duration;
//! use jobpoll::{PollingClient, RetryConfig, StatusResponse};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let client = PollingClient::new("http://127.0.0.1:5000")?
//!     .with_retry_config(RetryConfig::default())?
//!     .with_observer(|resp: &StatusResponse| println!("status: {}", resp.status()));
//!
//! let done = client.wait_for_completion(Some(Duration::from_secs(10))).await?;
//! println!("finished with {}", done.status());
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod logging;
pub mod poller;
pub mod simulator;
pub mod status;
pub mod ui;

pub use error::JobpollError;
pub use poller::{PollingClient, RetryConfig, RetryConfigError, StatusObserver};
pub use status::{ErrorKind, HttpStatusSource, JobStatus, StatusError, StatusResponse, StatusSource};
