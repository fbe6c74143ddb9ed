//! Stand-in job endpoint used to exercise the polling client.
//!
//! The simulated job reports `pending` until `completion_after` has passed
//! since it was created, then `completed`. `GET /trigger_error` forces the
//! job into `error`, which takes precedence over time-based completion.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{info, warn};

use crate::status::{JobStatus, StatusError};

/// Default time until the simulated job completes.
pub const DEFAULT_COMPLETION_AFTER: Duration = Duration::from_secs(5);

const TRIGGER_ERROR_PATH: &str = "/trigger_error";

/// Clock and error flag of one simulated job.
#[derive(Debug)]
pub struct JobSimulator {
    started: Instant,
    completion_after: Duration,
    error_triggered: bool,
}

impl JobSimulator {
    pub fn new(completion_after: Duration) -> Self {
        Self {
            started: Instant::now(),
            completion_after,
            error_triggered: false,
        }
    }

    pub fn status(&self) -> JobStatus {
        if self.error_triggered {
            JobStatus::Error
        } else if self.started.elapsed() >= self.completion_after {
            JobStatus::Completed
        } else {
            JobStatus::Pending
        }
    }

    pub fn trigger_error(&mut self) {
        self.error_triggered = true;
    }

    /// Wrap a fresh simulator for use as router state.
    pub fn shared(completion_after: Duration) -> SharedSimulator {
        Arc::new(Mutex::new(Self::new(completion_after)))
    }
}

/// Shared handle to the simulator, handed to the route handlers.
pub type SharedSimulator = Arc<Mutex<JobSimulator>>;

/// Routes: `GET /status` and `GET /trigger_error`.
pub fn router(simulator: SharedSimulator) -> Router {
    Router::new()
        .route("/status", get(status_handler))
        .route(TRIGGER_ERROR_PATH, get(trigger_error_handler))
        .with_state(simulator)
}

async fn status_handler(State(simulator): State<SharedSimulator>) -> Json<Value> {
    let status = simulator.lock().await.status();
    Json(json!({ "result": status }))
}

async fn trigger_error_handler(State(simulator): State<SharedSimulator>) -> Json<Value> {
    simulator.lock().await.trigger_error();
    warn!("simulated job forced into error state");
    Json(json!({ "message": "Error triggered" }))
}

/// Serve the simulator on an already bound listener until the task is dropped.
pub async fn serve(listener: TcpListener, simulator: SharedSimulator) -> std::io::Result<()> {
    if let Ok(addr) = listener.local_addr() {
        info!(%addr, "job simulator listening");
    }
    axum::serve(listener, router(simulator)).await
}

/// A simulator running on a background task.
pub struct RunningSimulator {
    pub addr: SocketAddr,
    pub simulator: SharedSimulator,
    handle: JoinHandle<std::io::Result<()>>,
}

impl RunningSimulator {
    /// Bind `addr` (port 0 picks a free port) and start serving.
    pub async fn start(addr: SocketAddr, completion_after: Duration) -> std::io::Result<Self> {
        let listener = TcpListener::bind(addr).await?;
        let addr = listener.local_addr()?;
        let simulator = JobSimulator::shared(completion_after);
        let handle = tokio::spawn(serve(listener, Arc::clone(&simulator)));
        Ok(Self {
            addr,
            simulator,
            handle,
        })
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }
}

impl Drop for RunningSimulator {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Ask a remote simulator at `base_url` to force its job into `error`.
pub async fn request_error(client: &reqwest::Client, base_url: &str) -> Result<(), StatusError> {
    let url = format!("{}{TRIGGER_ERROR_PATH}", base_url.trim_end_matches('/'));
    let response = client.get(&url).send().await?;
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(StatusError::HttpStatus {
            status: status.as_u16(),
            body,
        });
    }
    Ok(())
}
