//! Organization-level resources: members, invites, admin keys, certificates.

use std::str::FromStr;

use orgadmin_core::{ClientError, ClientResult, Timestamp};
use serde::{Deserialize, Serialize};

/// Organization role assigned to a member or invitee.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrganizationRole {
    /// Full administrative access.
    Owner,
    /// Read-only access.
    Reader,
}

impl OrganizationRole {
    /// Returns the wire value for this role.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Owner => "owner",
            Self::Reader => "reader",
        }
    }
}

impl FromStr for OrganizationRole {
    type Err = ClientError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "owner" => Ok(Self::Owner),
            "reader" => Ok(Self::Reader),
            _ => Err(ClientError::Validation(format!(
                "unknown organization role '{value}'"
            ))),
        }
    }
}

/// Validated email address.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Creates a validated, lowercased email address.
    ///
    /// Requires exactly one `@`, a non-empty local part and a dotted domain.
    pub fn new(value: impl Into<String>) -> ClientResult<Self> {
        let trimmed = value.into().trim().to_lowercase();

        if trimmed.is_empty() {
            return Err(ClientError::Validation(
                "email address must not be empty".to_owned(),
            ));
        }

        let Some((local, domain)) = trimmed.split_once('@') else {
            return Err(ClientError::Validation(
                "email address must contain exactly one '@'".to_owned(),
            ));
        };

        if local.is_empty() || domain.contains('@') {
            return Err(ClientError::Validation(
                "email address must contain exactly one '@' with a local part".to_owned(),
            ));
        }

        if !domain.contains('.') || domain.starts_with('.') || domain.ends_with('.') {
            return Err(ClientError::Validation(
                "email domain must contain at least one inner '.'".to_owned(),
            ));
        }

        if trimmed.len() > 254 {
            return Err(ClientError::Validation(
                "email address must not exceed 254 characters".to_owned(),
            ));
        }

        Ok(Self(trimmed))
    }

    /// Returns the validated email string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl TryFrom<String> for EmailAddress {
    type Error = ClientError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<EmailAddress> for String {
    fn from(value: EmailAddress) -> Self {
        value.0
    }
}

/// Organization member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Object label, `organization.user`.
    pub object: String,
    /// User id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Email address.
    pub email: String,
    /// Organization role.
    pub role: String,
    /// When the user joined the organization.
    pub added_at: Timestamp,
}

/// Role change request for an organization member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserRoleUpdate {
    /// New organization role.
    pub role: OrganizationRole,
}

/// Project membership offered with an invite.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InviteProject {
    /// Project id.
    pub id: String,
    /// Project role, `owner` or `member`.
    pub role: String,
}

/// Pending or accepted organization invite.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invite {
    /// Object label, `organization.invite`.
    pub object: String,
    /// Invite id.
    pub id: String,
    /// Invitee email.
    pub email: String,
    /// Offered organization role.
    pub role: String,
    /// `pending`, `accepted` or `expired`.
    pub status: String,
    /// When the invite was sent.
    pub invited_at: Timestamp,
    /// When the invite expires.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<Timestamp>,
    /// When the invite was accepted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accepted_at: Option<Timestamp>,
    /// Project memberships granted on acceptance.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub projects: Vec<InviteProject>,
}

/// Invite creation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InviteRequest {
    /// Invitee email.
    pub email: EmailAddress,
    /// Offered organization role.
    pub role: OrganizationRole,
    /// Project memberships granted on acceptance.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub projects: Vec<InviteProject>,
}

/// Owner of an admin API key.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ApiKeyOwner {
    /// `user` or `service_account`.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub owner_type: Option<String>,
    /// Owner id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Owner name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Owner role.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

/// Organization admin API key; the secret is only ever shown redacted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminApiKey {
    /// Object label.
    pub object: String,
    /// Key id.
    pub id: String,
    /// Key name.
    #[serde(default)]
    pub name: Option<String>,
    /// Redacted secret.
    pub redacted_value: String,
    /// Creation time.
    pub created_at: Timestamp,
    /// Last use, if ever used.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_used_at: Option<Timestamp>,
    /// Key owner.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<ApiKeyOwner>,
}

/// Validity window of an uploaded certificate.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CertificateDetails {
    /// Start of validity.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub valid_at: Option<Timestamp>,
    /// End of validity.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<Timestamp>,
}

/// Organization mutual TLS certificate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Certificate {
    /// Object label.
    pub object: String,
    /// Certificate id.
    pub id: String,
    /// Certificate name.
    #[serde(default)]
    pub name: Option<String>,
    /// Upload time.
    pub created_at: Timestamp,
    /// Whether the certificate is active for the organization.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
    /// Validity window.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub certificate_details: Option<CertificateDetails>,
}

/// Acknowledgement returned by delete endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeletedResource {
    /// Object label of the deleted resource.
    pub object: String,
    /// Id of the deleted resource.
    pub id: String,
    /// Whether the deletion happened.
    pub deleted: bool,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{EmailAddress, Invite, InviteRequest, OrganizationRole, User};

    #[test]
    fn valid_email_is_normalized() {
        let email = EmailAddress::new("  New.Member@Example.COM ");
        assert!(email.is_ok());
        assert_eq!(
            email.unwrap_or_else(|_| unreachable!()).as_str(),
            "new.member@example.com"
        );
    }

    #[test]
    fn malformed_emails_are_rejected() {
        for value in [
            "",
            "noatsign",
            "a@b@example.com",
            "@example.com",
            "user@nodot",
            "user@.com",
        ] {
            assert!(EmailAddress::new(value).is_err(), "{value} should be rejected");
        }
    }

    #[test]
    fn user_accepts_epoch_added_at() {
        let user = serde_json::from_value::<User>(json!({
            "object": "organization.user",
            "id": "user_abc",
            "name": "First Last",
            "email": "user@example.com",
            "role": "owner",
            "added_at": 1_711_471_533
        }));
        assert!(user.is_ok());
        let user = user.unwrap_or_else(|_| unreachable!());
        assert_eq!(
            serde_json::to_value(&user).unwrap_or_default()["added_at"],
            json!("2024-03-26T16:45:33Z")
        );
    }

    #[test]
    fn invite_optional_fields_default() {
        let invite = serde_json::from_value::<Invite>(json!({
            "object": "organization.invite",
            "id": "invite-abc",
            "email": "user@example.com",
            "role": "owner",
            "status": "pending",
            "invited_at": 1_711_471_533,
            "expires_at": null
        }));
        assert!(invite.is_ok());
        let invite = invite.unwrap_or_else(|_| unreachable!());
        assert!(invite.expires_at.is_none());
        assert!(invite.projects.is_empty());
    }

    #[test]
    fn invite_request_serializes_wire_values() {
        let request = InviteRequest {
            email: EmailAddress::new("user@example.com").unwrap_or_else(|_| unreachable!()),
            role: OrganizationRole::Reader,
            projects: Vec::new(),
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap_or_default(),
            json!({"email": "user@example.com", "role": "reader"})
        );
    }
}
