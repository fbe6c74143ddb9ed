use std::future::Future;
use std::time::Duration;

use reqwest::Client;
use serde_json::Value;
use tracing::debug;

use super::error::StatusError;
use super::types::StatusResponse;

/// Path of the status route, relative to the base URL.
const STATUS_PATH: &str = "/status";

/// Anything that can report the current status of a job.
///
/// The poller only talks to this trait, so tests can drive it with scripted
/// sources instead of a live endpoint.
pub trait StatusSource {
    /// Query the current status once.
    fn fetch_status(&self) -> impl Future<Output = Result<StatusResponse, StatusError>> + Send;
}

/// [`StatusSource`] backed by `GET {base_url}/status`.
#[derive(Debug, Clone)]
pub struct HttpStatusSource {
    client: Client,
    base_url: String,
}

impl HttpStatusSource {
    pub fn new(base_url: impl Into<String>) -> Result<Self, StatusError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .timeout(Duration::from_secs(30))
            .build()?;
        Ok(Self::with_client(base_url, client))
    }

    /// Build a source on top of an existing `reqwest::Client`, sharing its
    /// connection pool.
    pub fn with_client(base_url: impl Into<String>, client: Client) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn status_url(&self) -> String {
        format!("{}{STATUS_PATH}", self.base_url)
    }

    pub fn http_client(&self) -> &Client {
        &self.client
    }
}

impl StatusSource for HttpStatusSource {
    async fn fetch_status(&self) -> Result<StatusResponse, StatusError> {
        let url = self.status_url();
        debug!(%url, "querying job status");

        let response = self.client.get(&url).send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(StatusError::HttpStatus {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response.bytes().await?;
        let payload = match serde_json::from_slice::<Value>(&bytes) {
            Ok(Value::Object(map)) => map,
            Ok(other) => {
                return Err(StatusError::MalformedBody(format!(
                    "expected a JSON object, got {other}"
                )));
            }
            Err(e) => return Err(StatusError::MalformedBody(e.to_string())),
        };

        StatusResponse::from_payload(payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::{ErrorKind, JobStatus};
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn server_responding(template: ResponseTemplate) -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/status"))
            .respond_with(template)
            .mount(&server)
            .await;
        server
    }

    #[test]
    fn trailing_slashes_are_stripped() {
        let source = HttpStatusSource::new("http://localhost:5000//").unwrap();
        assert_eq!(source.base_url(), "http://localhost:5000");
        assert_eq!(source.status_url(), "http://localhost:5000/status");
    }

    #[tokio::test]
    async fn pending_status_keeps_raw_payload() {
        let body = json!({"result": "pending", "eta": 3});
        let server = server_responding(ResponseTemplate::new(200).set_body_json(&body)).await;

        let source = HttpStatusSource::new(format!("{}/", server.uri())).unwrap();
        let resp = source.fetch_status().await.unwrap();

        assert_eq!(resp.status(), JobStatus::Pending);
        assert_eq!(&Value::Object(resp.raw_response().clone()), &body);
    }

    #[tokio::test]
    async fn unknown_status_is_invalid() {
        let server =
            server_responding(ResponseTemplate::new(200).set_body_json(json!({"result": "queued"})))
                .await;

        let source = HttpStatusSource::new(server.uri()).unwrap();
        let err = source.fetch_status().await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidStatus);
    }

    #[tokio::test]
    async fn server_error_is_transport() {
        let server = server_responding(ResponseTemplate::new(500).set_body_string("boom")).await;

        let source = HttpStatusSource::new(server.uri()).unwrap();
        let err = source.fetch_status().await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Transport);
        assert!(matches!(err, StatusError::HttpStatus { status: 500, .. }));
    }

    #[tokio::test]
    async fn undecodable_body_is_transport() {
        let server =
            server_responding(ResponseTemplate::new(200).set_body_string("<html>ok</html>")).await;

        let source = HttpStatusSource::new(server.uri()).unwrap();
        let err = source.fetch_status().await.unwrap_err();
        assert!(matches!(err, StatusError::MalformedBody(_)));
        assert_eq!(err.kind(), ErrorKind::Transport);
    }

    #[tokio::test]
    async fn non_object_body_is_transport() {
        let server =
            server_responding(ResponseTemplate::new(200).set_body_json(json!(["pending"]))).await;

        let source = HttpStatusSource::new(server.uri()).unwrap();
        let err = source.fetch_status().await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Transport);
    }

    #[tokio::test]
    async fn connection_refused_is_transport() {
        let addr = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap()
        };

        let source = HttpStatusSource::new(format!("http://{addr}")).unwrap();
        let err = source.fetch_status().await.unwrap_err();
        assert!(matches!(err, StatusError::Network(_)));
        assert_eq!(err.kind(), ErrorKind::Transport);
    }
}
