use std::fmt::{Debug, Formatter};

use crate::{ClientResult, NonEmptyString};

/// Opaque bearer credential attached to every outbound request.
///
/// The client never inspects the token; it only forwards it.
#[derive(Clone, PartialEq, Eq)]
pub struct BearerToken(NonEmptyString);

impl BearerToken {
    /// Creates a bearer token from a non-empty secret.
    pub fn new(secret: impl Into<String>) -> ClientResult<Self> {
        Ok(Self(NonEmptyString::new(secret)?))
    }

    /// Returns the raw secret for header construction.
    #[must_use]
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }

    /// Returns the `Authorization` header value.
    #[must_use]
    pub fn header_value(&self) -> String {
        format!("Bearer {}", self.0.as_str())
    }
}

impl Debug for BearerToken {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str("BearerToken(<redacted>)")
    }
}

#[cfg(test)]
mod tests {
    use super::BearerToken;

    #[test]
    fn debug_output_redacts_secret() {
        let token = BearerToken::new("sk-admin-secret");
        assert!(token.is_ok());
        let token = token.unwrap_or_else(|_| unreachable!());
        assert!(!format!("{token:?}").contains("sk-admin-secret"));
        assert_eq!(token.header_value(), "Bearer sk-admin-secret");
    }

    #[test]
    fn blank_token_is_rejected() {
        assert!(BearerToken::new("  ").is_err());
    }
}
