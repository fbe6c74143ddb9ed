pub mod client;
pub mod error;
pub mod types;

pub use client::{HttpStatusSource, StatusSource};
pub use error::{ErrorKind, StatusError};
pub use types::{JobStatus, StatusResponse};
