//! Shared primitives for all orgadmin crates.

#![forbid(unsafe_code)]

/// Request credential primitives.
pub mod auth;
/// Normalizing timestamp codec.
pub mod timestamp;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use auth::BearerToken;
pub use timestamp::Timestamp;

/// Result type used across orgadmin crates.
pub type ClientResult<T> = Result<T, ClientError>;

/// A validated non-empty UTF-8 string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NonEmptyString(String);

impl NonEmptyString {
    /// Creates a validated non-empty string.
    pub fn new(value: impl Into<String>) -> ClientResult<Self> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(ClientError::Validation(
                "value must not be empty or whitespace".to_owned(),
            ));
        }

        Ok(Self(value))
    }

    /// Returns the underlying string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<NonEmptyString> for String {
    fn from(value: NonEmptyString) -> Self {
        value.0
    }
}

/// Error categories raised by the admin client.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Connection-level failure reported by the transport.
    #[error("transport error: {0}")]
    Transport(String),

    /// Server answered with a non-2xx status.
    #[error("HTTP status {status}: {body}")]
    Http {
        /// Response status code.
        status: u16,
        /// Raw response body for diagnostics.
        body: String,
    },

    /// Response body or envelope could not be decoded.
    #[error("decode error: {0}")]
    Decode(String),

    /// Payload of a known audit event type is malformed.
    #[error("failed to decode '{event_type}' payload: {cause}")]
    PayloadDecode {
        /// Event discriminator that selected the payload shape.
        event_type: String,
        /// Underlying decoder message.
        cause: String,
    },

    /// Resource URI does not start with the expected scheme.
    #[error("invalid resource URI scheme: {0}")]
    InvalidUriScheme(String),

    /// Resource URI names a resource type that is not known.
    #[error("unknown resource type: {0}")]
    UnknownResourceType(String),

    /// Resource URI has a known type but an unusable path.
    #[error("invalid resource path: {0}")]
    InvalidResourcePath(String),

    /// Timestamp is neither RFC3339 text nor integer epoch seconds.
    #[error("malformed timestamp: {0}")]
    MalformedTimestamp(String),

    /// Invalid input or configuration.
    #[error("validation error: {0}")]
    Validation(String),

    /// Internal unexpected error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ClientError {
    /// Returns the HTTP status when the error came from a non-2xx response.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Formats the error prefixed with the operation that raised it.
    #[must_use]
    pub fn context(&self, operation: &str) -> String {
        format!("{operation}: {self}")
    }
}

#[cfg(test)]
mod tests {
    use super::{ClientError, NonEmptyString};

    #[test]
    fn non_empty_string_rejects_whitespace() {
        let result = NonEmptyString::new("   ");
        assert!(result.is_err());
    }

    #[test]
    fn http_error_exposes_status_and_context() {
        let error = ClientError::Http {
            status: 404,
            body: "{\"error\":\"missing\"}".to_owned(),
        };
        assert_eq!(error.status(), Some(404));
        assert!(error.context("retrieve user").starts_with("retrieve user: HTTP status 404"));
        assert_eq!(ClientError::Decode("x".to_owned()).status(), None);
    }
}
