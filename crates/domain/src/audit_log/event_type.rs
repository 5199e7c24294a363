use std::str::FromStr;

use orgadmin_core::ClientError;
use serde::{Deserialize, Serialize};

/// Audit event types with a registered payload shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AuditEventType {
    /// `api_key.created`
    #[serde(rename = "api_key.created")]
    ApiKeyCreated,
    /// `api_key.updated`
    #[serde(rename = "api_key.updated")]
    ApiKeyUpdated,
    /// `api_key.deleted`
    #[serde(rename = "api_key.deleted")]
    ApiKeyDeleted,
    /// `invite.sent`
    #[serde(rename = "invite.sent")]
    InviteSent,
    /// `invite.accepted`
    #[serde(rename = "invite.accepted")]
    InviteAccepted,
    /// `invite.deleted`
    #[serde(rename = "invite.deleted")]
    InviteDeleted,
    /// `login.failed`
    #[serde(rename = "login.failed")]
    LoginFailed,
    /// `login.succeeded`
    #[serde(rename = "login.succeeded")]
    LoginSucceeded,
    /// `logout.failed`
    #[serde(rename = "logout.failed")]
    LogoutFailed,
    /// `logout.succeeded`
    #[serde(rename = "logout.succeeded")]
    LogoutSucceeded,
    /// `organization.updated`
    #[serde(rename = "organization.updated")]
    OrganizationUpdated,
    /// `project.created`
    #[serde(rename = "project.created")]
    ProjectCreated,
    /// `project.updated`
    #[serde(rename = "project.updated")]
    ProjectUpdated,
    /// `project.archived`
    #[serde(rename = "project.archived")]
    ProjectArchived,
    /// `rate_limit.updated`
    #[serde(rename = "rate_limit.updated")]
    RateLimitUpdated,
    /// `rate_limit.deleted`
    #[serde(rename = "rate_limit.deleted")]
    RateLimitDeleted,
    /// `service_account.created`
    #[serde(rename = "service_account.created")]
    ServiceAccountCreated,
    /// `service_account.updated`
    #[serde(rename = "service_account.updated")]
    ServiceAccountUpdated,
    /// `service_account.deleted`
    #[serde(rename = "service_account.deleted")]
    ServiceAccountDeleted,
    /// `user.added`
    #[serde(rename = "user.added")]
    UserAdded,
    /// `user.updated`
    #[serde(rename = "user.updated")]
    UserUpdated,
    /// `user.deleted`
    #[serde(rename = "user.deleted")]
    UserDeleted,
}

impl AuditEventType {
    /// Returns the wire discriminator for this event type.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ApiKeyCreated => "api_key.created",
            Self::ApiKeyUpdated => "api_key.updated",
            Self::ApiKeyDeleted => "api_key.deleted",
            Self::InviteSent => "invite.sent",
            Self::InviteAccepted => "invite.accepted",
            Self::InviteDeleted => "invite.deleted",
            Self::LoginFailed => "login.failed",
            Self::LoginSucceeded => "login.succeeded",
            Self::LogoutFailed => "logout.failed",
            Self::LogoutSucceeded => "logout.succeeded",
            Self::OrganizationUpdated => "organization.updated",
            Self::ProjectCreated => "project.created",
            Self::ProjectUpdated => "project.updated",
            Self::ProjectArchived => "project.archived",
            Self::RateLimitUpdated => "rate_limit.updated",
            Self::RateLimitDeleted => "rate_limit.deleted",
            Self::ServiceAccountCreated => "service_account.created",
            Self::ServiceAccountUpdated => "service_account.updated",
            Self::ServiceAccountDeleted => "service_account.deleted",
            Self::UserAdded => "user.added",
            Self::UserUpdated => "user.updated",
            Self::UserDeleted => "user.deleted",
        }
    }

    /// Returns every registered event type.
    #[must_use]
    pub fn all() -> &'static [Self] {
        const ALL: &[AuditEventType] = &[
            AuditEventType::ApiKeyCreated,
            AuditEventType::ApiKeyUpdated,
            AuditEventType::ApiKeyDeleted,
            AuditEventType::InviteSent,
            AuditEventType::InviteAccepted,
            AuditEventType::InviteDeleted,
            AuditEventType::LoginFailed,
            AuditEventType::LoginSucceeded,
            AuditEventType::LogoutFailed,
            AuditEventType::LogoutSucceeded,
            AuditEventType::OrganizationUpdated,
            AuditEventType::ProjectCreated,
            AuditEventType::ProjectUpdated,
            AuditEventType::ProjectArchived,
            AuditEventType::RateLimitUpdated,
            AuditEventType::RateLimitDeleted,
            AuditEventType::ServiceAccountCreated,
            AuditEventType::ServiceAccountUpdated,
            AuditEventType::ServiceAccountDeleted,
            AuditEventType::UserAdded,
            AuditEventType::UserUpdated,
            AuditEventType::UserDeleted,
        ];

        ALL
    }
}

impl FromStr for AuditEventType {
    type Err = ClientError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|event_type| event_type.as_str() == value)
            .ok_or_else(|| ClientError::Validation(format!("unknown audit event type '{value}'")))
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::AuditEventType;

    #[test]
    fn event_type_roundtrip_wire_value() {
        for event_type in AuditEventType::all() {
            let restored = AuditEventType::from_str(event_type.as_str());
            assert!(restored.is_ok());
            assert_eq!(
                restored.unwrap_or(AuditEventType::UserDeleted),
                *event_type
            );
        }
    }

    #[test]
    fn serde_uses_dotted_names() {
        assert_eq!(
            serde_json::to_value(AuditEventType::RateLimitUpdated).unwrap_or_default(),
            serde_json::json!("rate_limit.updated")
        );
    }

    #[test]
    fn unknown_event_type_is_rejected() {
        assert!(AuditEventType::from_str("totally.unknown.event").is_err());
    }
}
