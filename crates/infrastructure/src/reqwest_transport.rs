use std::time::Duration;

use async_trait::async_trait;
use orgadmin_application::{HttpMethod, Transport, TransportRequest, TransportResponse};
use orgadmin_core::{ClientError, ClientResult};
use reqwest::header;
use tracing::warn;
use url::Url;

/// Backoff schedule for retrying server errors.
///
/// Connection failures are retried on the same schedule for `GET` and
/// `DELETE` only; a failed `POST` may already have been applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt.
    pub max_retries: u32,
    /// Delay before the first retry.
    pub initial_backoff: Duration,
    /// Upper bound for any single delay.
    pub max_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_backoff: Duration::from_secs(1),
            max_backoff: Duration::from_secs(5),
        }
    }
}

impl RetryPolicy {
    /// Returns the delay before retry number `retry` (1-based), doubling each time.
    #[must_use]
    pub fn delay_for(&self, retry: u32) -> Duration {
        let factor = 2_u32.saturating_pow(retry.saturating_sub(1));
        self.initial_backoff
            .saturating_mul(factor)
            .min(self.max_backoff)
    }
}

/// [`Transport`] over `reqwest` against one API base URL.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    http_client: reqwest::Client,
    base_url: String,
    retry_policy: RetryPolicy,
}

impl ReqwestTransport {
    /// Creates a transport for `base_url` with a per-request timeout.
    pub fn new(base_url: &str, timeout: Duration) -> ClientResult<Self> {
        Url::parse(base_url).map_err(|error| {
            ClientError::Validation(format!("invalid API base URL '{base_url}': {error}"))
        })?;
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|error| {
                ClientError::Internal(format!("failed to build HTTP client: {error}"))
            })?;

        Ok(Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_owned(),
            retry_policy: RetryPolicy::default(),
        })
    }

    /// Replaces the retry policy.
    #[must_use]
    pub fn with_retry_policy(mut self, retry_policy: RetryPolicy) -> Self {
        self.retry_policy = retry_policy;
        self
    }

    /// Resolves the absolute URL for `request`, including its query string.
    pub fn endpoint_url(&self, request: &TransportRequest) -> ClientResult<Url> {
        let path = request.path.trim_start_matches('/');
        let mut url = Url::parse(&format!("{}/{path}", self.base_url)).map_err(|error| {
            ClientError::Validation(format!("invalid request path '{}': {error}", request.path))
        })?;
        if !request.query.is_empty() {
            url.query_pairs_mut().extend_pairs(&request.query);
        }

        Ok(url)
    }

    fn build(&self, request: &TransportRequest, url: Url) -> reqwest::RequestBuilder {
        let method = match request.method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Delete => reqwest::Method::DELETE,
        };

        let mut builder = self
            .http_client
            .request(method, url)
            .header(header::ACCEPT, "application/json");
        if let Some(token) = &request.bearer_token {
            builder = builder.header(header::AUTHORIZATION, token.header_value());
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        builder
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: TransportRequest) -> ClientResult<TransportResponse> {
        let url = self.endpoint_url(&request)?;
        let mut retry = 0_u32;

        loop {
            let outcome = match self.build(&request, url.clone()).send().await {
                Ok(response) => {
                    let status = response.status();
                    let body = response.bytes().await.map_err(|error| {
                        ClientError::Transport(format!(
                            "failed to read response body from {} {}: {error}",
                            request.method.as_str(),
                            request.path
                        ))
                    });
                    body.map(|body| TransportResponse {
                        status: status.as_u16(),
                        body: body.to_vec(),
                    })
                }
                Err(error) => Err(ClientError::Transport(format!(
                    "{} {} failed: {error}",
                    request.method.as_str(),
                    request.path
                ))),
            };

            let retryable = match &outcome {
                Ok(response) => (500..600).contains(&response.status),
                Err(_) => request.method.is_idempotent(),
            };
            if !retryable || retry >= self.retry_policy.max_retries {
                return outcome;
            }

            retry = retry.saturating_add(1);
            let delay = self.retry_policy.delay_for(retry);
            match &outcome {
                Ok(response) => warn!(
                    method = request.method.as_str(),
                    path = %request.path,
                    status = response.status,
                    retry,
                    delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                    "server error from admin API, retrying"
                ),
                Err(error) => warn!(
                    method = request.method.as_str(),
                    path = %request.path,
                    error = %error,
                    retry,
                    delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                    "admin API request failed, retrying"
                ),
            }
            tokio::time::sleep(delay).await;
        }
    }
}
