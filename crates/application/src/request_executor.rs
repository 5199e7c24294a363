use std::sync::Arc;

use orgadmin_core::{BearerToken, ClientError, ClientResult};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::transport_ports::{HttpMethod, Transport, TransportRequest};

/// Turns verb + path + query/body into a decoded value or a typed error.
#[derive(Clone)]
pub struct RequestExecutor {
    transport: Arc<dyn Transport>,
    bearer_token: Option<BearerToken>,
}

impl RequestExecutor {
    /// Creates an executor that attaches `bearer_token` to every request.
    #[must_use]
    pub fn new(transport: Arc<dyn Transport>, bearer_token: Option<BearerToken>) -> Self {
        Self {
            transport,
            bearer_token,
        }
    }

    /// Sends a GET request and decodes the JSON body.
    pub async fn get<T>(&self, path: &str, query: &[(String, String)]) -> ClientResult<T>
    where
        T: DeserializeOwned,
    {
        let mut request = TransportRequest::new(HttpMethod::Get, path);
        request.query = query.to_vec();
        let body = self.execute(request).await?;
        decode_body(path, &body)
    }

    /// Sends a POST request with a JSON body and decodes the JSON response.
    pub async fn post<B, T>(&self, path: &str, body: &B) -> ClientResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let body = serde_json::to_value(body).map_err(|error| {
            ClientError::Internal(format!("failed to encode request body for '{path}': {error}"))
        })?;
        let mut request = TransportRequest::new(HttpMethod::Post, path);
        request.body = Some(body);
        let response = self.execute(request).await?;
        decode_body(path, &response)
    }

    /// Sends a DELETE request and decodes the JSON body.
    pub async fn delete<T>(&self, path: &str) -> ClientResult<T>
    where
        T: DeserializeOwned,
    {
        let body = self
            .execute(TransportRequest::new(HttpMethod::Delete, path))
            .await?;
        decode_body(path, &body)
    }

    /// Sends a request and returns the body of a 2xx response.
    pub async fn execute(&self, mut request: TransportRequest) -> ClientResult<Vec<u8>> {
        request.bearer_token = self.bearer_token.clone();
        let response = self.transport.send(request).await?;

        if !response.is_success() {
            return Err(ClientError::Http {
                status: response.status,
                body: String::from_utf8_lossy(&response.body).into_owned(),
            });
        }

        Ok(response.body)
    }
}

fn decode_body<T>(path: &str, body: &[u8]) -> ClientResult<T>
where
    T: DeserializeOwned,
{
    serde_json::from_slice(body).map_err(|error| {
        ClientError::Decode(format!("failed to decode response from '{path}': {error}"))
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use orgadmin_core::{BearerToken, ClientError, ClientResult};
    use serde_json::{Value, json};
    use tokio::sync::Mutex;

    use super::RequestExecutor;
    use crate::transport_ports::{HttpMethod, Transport, TransportRequest, TransportResponse};

    struct FixedTransport {
        response: ClientResult<TransportResponse>,
        requests: Mutex<Vec<TransportRequest>>,
    }

    impl FixedTransport {
        fn answering(status: u16, body: &str) -> Arc<Self> {
            Arc::new(Self {
                response: Ok(TransportResponse {
                    status,
                    body: body.as_bytes().to_vec(),
                }),
                requests: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl Transport for FixedTransport {
        async fn send(&self, request: TransportRequest) -> ClientResult<TransportResponse> {
            self.requests.lock().await.push(request);
            match &self.response {
                Ok(response) => Ok(response.clone()),
                Err(error) => Err(ClientError::Transport(error.to_string())),
            }
        }
    }

    #[tokio::test]
    async fn attaches_token_and_decodes_success() {
        let transport = FixedTransport::answering(200, r#"{"id": "user_1"}"#);
        let token = BearerToken::new("sk-admin").ok();
        let executor = RequestExecutor::new(transport.clone(), token.clone());

        let value = executor
            .get::<Value>("/organization/users/user_1", &[("limit".to_owned(), "1".to_owned())])
            .await;
        assert!(value.is_ok());
        assert_eq!(value.unwrap_or_default(), json!({"id": "user_1"}));

        let requests = transport.requests.lock().await;
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].method, HttpMethod::Get);
        assert_eq!(requests[0].bearer_token, token);
        assert_eq!(requests[0].query_value("limit"), Some("1"));
    }

    #[tokio::test]
    async fn non_success_status_keeps_body() {
        let transport = FixedTransport::answering(404, r#"{"error": {"message": "missing"}}"#);
        let executor = RequestExecutor::new(transport, None);

        let result = executor.delete::<Value>("/organization/invites/inv_1").await;
        match result {
            Err(ClientError::Http { status, body }) => {
                assert_eq!(status, 404);
                assert!(body.contains("missing"));
            }
            other => panic!("expected HTTP error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn malformed_body_is_a_decode_error() {
        let transport = FixedTransport::answering(200, "<html>");
        let executor = RequestExecutor::new(transport, None);

        let result = executor
            .post::<_, Value>("/organization/projects", &json!({"name": "x"}))
            .await;
        assert!(matches!(result, Err(ClientError::Decode(_))));
    }

    #[tokio::test]
    async fn transport_failures_surface_unchanged() {
        let transport = Arc::new(FixedTransport {
            response: Err(ClientError::Transport("connection refused".to_owned())),
            requests: Mutex::new(Vec::new()),
        });
        let executor = RequestExecutor::new(transport, None);

        let result = executor.get::<Value>("/organization/users", &[]).await;
        assert!(matches!(result, Err(ClientError::Transport(_))));
    }
}
