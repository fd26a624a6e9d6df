//! Generic JSON-over-HTTP caller with a fixed per-call timeout.

use std::time::Duration;

use reply_core::{ReplyError, Schema, ServiceResult, Validation};
use reqwest::{Client, RequestBuilder};
use serde::Serialize;
use tracing::{debug, warn};

/// Per-call deadline for auxiliary services.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(3000);

/// Caller of one auxiliary service.
///
/// Each call is bounded by `timeout`; when it expires the request future is dropped, which
/// aborts the in-flight HTTP request. No retries.
#[derive(Debug, Clone)]
pub struct ServiceClient {
    http: Client,
    name: String,
    base_url: String,
    timeout: Duration,
}

impl ServiceClient {
    /// `name` labels log lines (e.g. "sentiment"); `base_url` has no trailing path.
    pub fn new(name: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            name: name.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Shares a connection pool between clients.
    pub fn with_http_client(mut self, http: Client) -> Self {
        self.http = http;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// `POST {base_url}{path}` with a JSON body.
    pub async fn post<B, T>(&self, path: &str, body: &B) -> ServiceResult<T>
    where
        B: Serialize + ?Sized,
        T: Schema,
    {
        let request = self.http.post(self.url(path)).json(body);
        self.execute(path, request).await
    }

    /// `GET {base_url}{path}`.
    pub async fn get<T: Schema>(&self, path: &str) -> ServiceResult<T> {
        let request = self.http.get(self.url(path));
        self.execute(path, request).await
    }

    async fn execute<T: Schema>(&self, path: &str, request: RequestBuilder) -> ServiceResult<T> {
        match tokio::time::timeout(self.timeout, self.send(path, request)).await {
            Ok(result) => result,
            Err(_) => {
                warn!(
                    service = %self.name,
                    path,
                    error = %ReplyError::Timeout(self.timeout),
                    "Service call timed out"
                );
                ServiceResult::Timeout
            }
        }
    }

    async fn send<T: Schema>(&self, path: &str, request: RequestBuilder) -> ServiceResult<T> {
        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                warn!(
                    service = %self.name,
                    path,
                    error = %ReplyError::Unavailable(e.to_string()),
                    "Service request failed"
                );
                return ServiceResult::Unavailable;
            }
        };

        let status = response.status();
        if !status.is_success() {
            warn!(service = %self.name, path, status = %status, "Service returned non-success status");
            return ServiceResult::Unavailable;
        }

        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                warn!(service = %self.name, path, error = %e, "Failed to read service response body");
                return ServiceResult::Unavailable;
            }
        };

        match T::parse_json(&body) {
            Validation::Valid(value) => {
                debug!(service = %self.name, path, body_len = body.len(), "Service call succeeded");
                ServiceResult::Success(value)
            }
            Validation::Invalid(reason) => {
                warn!(
                    service = %self.name,
                    path,
                    error = %ReplyError::MalformedPayload(reason),
                    "Service returned malformed payload"
                );
                ServiceResult::Unavailable
            }
        }
    }
}
