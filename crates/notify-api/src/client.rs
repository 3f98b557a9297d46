use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response};
use tasks::{NotificationPayload, Notifier, NotifyError};
use thiserror::Error;
use tracing::debug;
use url::Url;

/// Longest response body kept on a [`NotifyError::Status`].
const MAX_ERROR_BODY: usize = 512;

/// Errors raised while constructing an [`HttpNotifier`].
#[derive(Debug, Error)]
pub enum NotifierBuildError {
    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Notifier that POSTs payloads to a fixed endpoint.
///
/// Cloning is cheap; clones share the underlying connection pool.
#[derive(Clone)]
pub struct HttpNotifier {
    http: Client,
    endpoint: Url,
    timeout: Duration,
}

impl HttpNotifier {
    /// Creates a notifier with its own client, bounding every request by
    /// `timeout`.
    pub fn new(endpoint: Url, timeout: Duration) -> Result<Self, NotifierBuildError> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(endpoint, http, timeout))
    }

    /// Creates a notifier around an existing client.
    ///
    /// `timeout` should match the client's configured request timeout; it is
    /// only used to describe timeout failures.
    pub fn with_client(endpoint: Url, http: Client, timeout: Duration) -> Self {
        Self {
            http,
            endpoint,
            timeout,
        }
    }

    fn map_transport_error(&self, error: reqwest::Error) -> NotifyError {
        if error.is_timeout() {
            NotifyError::Timeout {
                after: self.timeout,
            }
        } else {
            NotifyError::Transport(error.to_string())
        }
    }
}

#[async_trait]
impl Notifier for HttpNotifier {
    async fn notify(&self, payload: &NotificationPayload) -> Result<u16, NotifyError> {
        debug!(
            endpoint = %self.endpoint,
            task_id = %payload.task_doc_id,
            "posting notification"
        );

        let response = self
            .http
            .post(self.endpoint.clone())
            .json(payload)
            .send()
            .await
            .map_err(|error| self.map_transport_error(error))?;

        ensure_success(response).await
    }
}

async fn ensure_success(response: Response) -> Result<u16, NotifyError> {
    let status = response.status();
    if status.is_success() {
        return Ok(status.as_u16());
    }

    let mut body = response.text().await.unwrap_or_default();
    if body.len() > MAX_ERROR_BODY {
        let mut cut = MAX_ERROR_BODY;
        while !body.is_char_boundary(cut) {
            cut -= 1;
        }
        body.truncate(cut);
    }

    Err(NotifyError::Status {
        status: status.as_u16(),
        body,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;
    use tasks::{CompanyId, OrgId, TaskId};

    fn payload(company: Option<&str>) -> NotificationPayload {
        NotificationPayload::new(
            TaskId::new("T1").expect("task id"),
            company.and_then(|id| CompanyId::new(id)),
            OrgId::new("O1").expect("org id"),
        )
    }

    fn notifier(server: &MockServer, timeout: Duration) -> HttpNotifier {
        let endpoint = Url::parse(&server.url("/task_upload")).expect("url");
        HttpNotifier::new(endpoint, timeout).expect("client")
    }

    #[tokio::test]
    async fn posts_payload_as_json() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/task_upload")
                    .header("content-type", "application/json")
                    .json_body(json!({
                        "task_doc_id": "T1",
                        "company_doc_id": "C1",
                        "org_id": "O1"
                    }));
                then.status(200).body("ok");
            })
            .await;

        let status = notifier(&server, Duration::from_secs(5))
            .notify(&payload(Some("C1")))
            .await
            .expect("delivery");

        assert_eq!(status, 200);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn sends_null_company_id() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST).path("/task_upload").json_body(json!({
                    "task_doc_id": "T1",
                    "company_doc_id": null,
                    "org_id": "O1"
                }));
                then.status(202);
            })
            .await;

        let status = notifier(&server, Duration::from_secs(5))
            .notify(&payload(None))
            .await
            .expect("delivery");

        assert_eq!(status, 202);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn non_success_status_is_an_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/task_upload");
                then.status(500).body("boom");
            })
            .await;

        let err = notifier(&server, Duration::from_secs(5))
            .notify(&payload(Some("C1")))
            .await
            .expect_err("500 should fail");

        assert_eq!(
            err,
            NotifyError::Status {
                status: 500,
                body: "boom".to_string()
            }
        );
    }

    #[tokio::test]
    async fn slow_endpoint_times_out() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/task_upload");
                then.status(200).delay(Duration::from_millis(500));
            })
            .await;

        let err = notifier(&server, Duration::from_millis(50))
            .notify(&payload(Some("C1")))
            .await
            .expect_err("should time out");

        assert_eq!(
            err,
            NotifyError::Timeout {
                after: Duration::from_millis(50)
            }
        );
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_a_transport_error() {
        let endpoint = Url::parse("http://127.0.0.1:1/task_upload").expect("url");
        let notifier = HttpNotifier::new(endpoint, Duration::from_secs(5)).expect("client");

        let err = notifier
            .notify(&payload(Some("C1")))
            .await
            .expect_err("connection refused");

        assert!(matches!(err, NotifyError::Transport(_)));
    }
}
