use async_trait::async_trait;
use orgadmin_core::{BearerToken, ClientResult};
use serde_json::Value;

/// HTTP verbs used by the admin API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    /// Read request.
    Get,
    /// Create or mutate request.
    Post,
    /// Delete request.
    Delete,
}

impl HttpMethod {
    /// Returns the method name as sent on the wire.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Delete => "DELETE",
        }
    }

    /// Returns true when repeating the request cannot apply it twice.
    #[must_use]
    pub fn is_idempotent(&self) -> bool {
        matches!(self, Self::Get | Self::Delete)
    }
}

/// One outbound API request, relative to the transport's base URL.
#[derive(Debug, Clone, PartialEq)]
pub struct TransportRequest {
    /// HTTP verb.
    pub method: HttpMethod,
    /// Path below the base URL, starting with `/`.
    pub path: String,
    /// Query string pairs in order; keys may repeat.
    pub query: Vec<(String, String)>,
    /// JSON body for POST requests.
    pub body: Option<Value>,
    /// Credential supplied by the caller.
    pub bearer_token: Option<BearerToken>,
}

impl TransportRequest {
    /// Creates a request without query, body or credential.
    #[must_use]
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
            bearer_token: None,
        }
    }

    /// Returns the first query value for `key`.
    #[must_use]
    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(candidate, _)| candidate == key)
            .map(|(_, value)| value.as_str())
    }
}

/// Raw response as returned by the transport, whatever its status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    /// HTTP status code.
    pub status: u16,
    /// Raw body bytes.
    pub body: Vec<u8>,
}

impl TransportResponse {
    /// Returns true for 2xx statuses.
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Port for sending requests to the admin API.
///
/// Implementations own retries on 5xx responses and timeouts; a returned
/// error always means the exchange failed at the connection level.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Sends one request and returns the final response.
    async fn send(&self, request: TransportRequest) -> ClientResult<TransportResponse>;
}
