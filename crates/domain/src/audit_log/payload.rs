use std::collections::HashMap;
use std::sync::LazyLock;

use orgadmin_core::{ClientError, ClientResult};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::AuditActor;
use super::event_type::AuditEventType;

/// `api_key.created` details.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ApiKeyCreated {
    /// Tracking id of the key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Key configuration at creation time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<ApiKeyScopes>,
}

/// `api_key.updated` details.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ApiKeyUpdated {
    /// Tracking id of the key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Requested scope changes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub changes_requested: Option<ApiKeyScopes>,
}

/// Scope list attached to API key events.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ApiKeyScopes {
    /// Permission scopes, e.g. `api.model.read`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scopes: Option<Vec<String>>,
}

/// `api_key.deleted` details.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ApiKeyDeleted {
    /// Tracking id of the key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

/// `invite.sent` details.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct InviteSent {
    /// Invite id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Invitee and offered role.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<InviteSentData>,
}

/// Invitation target.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct InviteSentData {
    /// Invitee email.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Offered organization role.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

/// `invite.accepted` details.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct InviteAccepted {
    /// Invite id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

/// `invite.deleted` details.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct InviteDeleted {
    /// Invite id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

/// `login.failed` details.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LoginFailed {
    /// Machine readable failure code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,
    /// Human readable failure message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

/// `login.succeeded` details.
///
/// The server repeats `object`, `id`, `type` and `actor` here although the
/// envelope already carries them. They are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LoginSucceeded {
    /// Object label as sent by the server.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object: Option<String>,
    /// Event id as sent by the server.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Event type as sent by the server.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub event_type: Option<String>,
    /// Actor as sent by the server.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actor: Option<AuditActor>,
}

/// `logout.failed` details.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LogoutFailed {
    /// Machine readable failure code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,
    /// Human readable failure message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

/// `logout.succeeded` carries no details.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LogoutSucceeded {}

/// `organization.updated` details.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct OrganizationUpdated {
    /// Organization id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Requested changes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub changes_requested: Option<OrganizationChanges>,
}

/// Organization fields that may change.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct OrganizationChanges {
    /// Display title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Visibility settings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<OrganizationSettings>,
}

/// Organization visibility settings.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct OrganizationSettings {
    /// Who can see threads in the UI.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threads_ui_visibility: Option<String>,
    /// Who can see the usage dashboard.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage_dashboard_visibility: Option<String>,
}

/// `project.created` details.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ProjectCreated {
    /// Project id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Project attributes at creation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<ProjectCreatedData>,
}

/// Project attributes at creation.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ProjectCreatedData {
    /// Project name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Project title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

/// `project.updated` details.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ProjectUpdated {
    /// Project id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Requested changes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub changes_requested: Option<ProjectChanges>,
}

/// Project fields that may change.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ProjectChanges {
    /// Project title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

/// `project.archived` details.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ProjectArchived {
    /// Project id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

/// `rate_limit.updated` details.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RateLimitUpdated {
    /// Rate limit id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Requested limit changes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub changes_requested: Option<RateLimitChanges>,
}

/// Rate limit values that may change.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RateLimitChanges {
    /// Requests per minute.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_requests_per_1_minute: Option<u64>,
    /// Tokens per minute.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens_per_1_minute: Option<u64>,
    /// Images per minute.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_images_per_1_minute: Option<u64>,
    /// Audio megabytes per minute.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_audio_megabytes_per_1_minute: Option<u64>,
    /// Requests per day.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_requests_per_1_day: Option<u64>,
    /// Batch input tokens per day.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub batch_1_day_max_input_tokens: Option<u64>,
}

/// `rate_limit.deleted` details.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RateLimitDeleted {
    /// Rate limit id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

/// Role assignment shared by service-account and user events.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RoleAssignment {
    /// Assigned role.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

/// `service_account.created` details.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ServiceAccountCreated {
    /// Service account id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Role at creation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<RoleAssignment>,
}

/// `service_account.updated` details.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ServiceAccountUpdated {
    /// Service account id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Requested role change.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub changes_requested: Option<RoleAssignment>,
}

/// `service_account.deleted` details.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ServiceAccountDeleted {
    /// Service account id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

/// `user.added` details.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UserAdded {
    /// User id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Role at creation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<RoleAssignment>,
}

/// `user.updated` details.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UserUpdated {
    /// User id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Requested role change.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub changes_requested: Option<RoleAssignment>,
}

/// `user.deleted` details.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UserDeleted {
    /// User id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

/// Event details nested under the key named after the event type.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum EventPayload {
    /// `api_key.created`
    ApiKeyCreated(ApiKeyCreated),
    /// `api_key.updated`
    ApiKeyUpdated(ApiKeyUpdated),
    /// `api_key.deleted`
    ApiKeyDeleted(ApiKeyDeleted),
    /// `invite.sent`
    InviteSent(InviteSent),
    /// `invite.accepted`
    InviteAccepted(InviteAccepted),
    /// `invite.deleted`
    InviteDeleted(InviteDeleted),
    /// `login.failed`
    LoginFailed(LoginFailed),
    /// `login.succeeded`
    LoginSucceeded(LoginSucceeded),
    /// `logout.failed`
    LogoutFailed(LogoutFailed),
    /// `logout.succeeded`
    LogoutSucceeded(LogoutSucceeded),
    /// `organization.updated`
    OrganizationUpdated(OrganizationUpdated),
    /// `project.created`
    ProjectCreated(ProjectCreated),
    /// `project.updated`
    ProjectUpdated(ProjectUpdated),
    /// `project.archived`
    ProjectArchived(ProjectArchived),
    /// `rate_limit.updated`
    RateLimitUpdated(RateLimitUpdated),
    /// `rate_limit.deleted`
    RateLimitDeleted(RateLimitDeleted),
    /// `service_account.created`
    ServiceAccountCreated(ServiceAccountCreated),
    /// `service_account.updated`
    ServiceAccountUpdated(ServiceAccountUpdated),
    /// `service_account.deleted`
    ServiceAccountDeleted(ServiceAccountDeleted),
    /// `user.added`
    UserAdded(UserAdded),
    /// `user.updated`
    UserUpdated(UserUpdated),
    /// `user.deleted`
    UserDeleted(UserDeleted),
    /// Details of an event type this client does not know.
    Generic(Map<String, Value>),
}

type PayloadDecoder = fn(Value) -> Result<EventPayload, serde_json::Error>;

static PAYLOAD_DECODERS: LazyLock<HashMap<&'static str, PayloadDecoder>> = LazyLock::new(|| {
    AuditEventType::all()
        .iter()
        .map(|event_type| (event_type.as_str(), decoder_for(*event_type)))
        .collect()
});

fn decoder_for(event_type: AuditEventType) -> PayloadDecoder {
    match event_type {
        AuditEventType::ApiKeyCreated => {
            |value: Value| serde_json::from_value(value).map(EventPayload::ApiKeyCreated)
        }
        AuditEventType::ApiKeyUpdated => {
            |value: Value| serde_json::from_value(value).map(EventPayload::ApiKeyUpdated)
        }
        AuditEventType::ApiKeyDeleted => {
            |value: Value| serde_json::from_value(value).map(EventPayload::ApiKeyDeleted)
        }
        AuditEventType::InviteSent => {
            |value: Value| serde_json::from_value(value).map(EventPayload::InviteSent)
        }
        AuditEventType::InviteAccepted => {
            |value: Value| serde_json::from_value(value).map(EventPayload::InviteAccepted)
        }
        AuditEventType::InviteDeleted => {
            |value: Value| serde_json::from_value(value).map(EventPayload::InviteDeleted)
        }
        AuditEventType::LoginFailed => {
            |value: Value| serde_json::from_value(value).map(EventPayload::LoginFailed)
        }
        AuditEventType::LoginSucceeded => {
            |value: Value| serde_json::from_value(value).map(EventPayload::LoginSucceeded)
        }
        AuditEventType::LogoutFailed => {
            |value: Value| serde_json::from_value(value).map(EventPayload::LogoutFailed)
        }
        AuditEventType::LogoutSucceeded => {
            |value: Value| serde_json::from_value(value).map(EventPayload::LogoutSucceeded)
        }
        AuditEventType::OrganizationUpdated => {
            |value: Value| serde_json::from_value(value).map(EventPayload::OrganizationUpdated)
        }
        AuditEventType::ProjectCreated => {
            |value: Value| serde_json::from_value(value).map(EventPayload::ProjectCreated)
        }
        AuditEventType::ProjectUpdated => {
            |value: Value| serde_json::from_value(value).map(EventPayload::ProjectUpdated)
        }
        AuditEventType::ProjectArchived => {
            |value: Value| serde_json::from_value(value).map(EventPayload::ProjectArchived)
        }
        AuditEventType::RateLimitUpdated => {
            |value: Value| serde_json::from_value(value).map(EventPayload::RateLimitUpdated)
        }
        AuditEventType::RateLimitDeleted => {
            |value: Value| serde_json::from_value(value).map(EventPayload::RateLimitDeleted)
        }
        AuditEventType::ServiceAccountCreated => {
            |value: Value| serde_json::from_value(value).map(EventPayload::ServiceAccountCreated)
        }
        AuditEventType::ServiceAccountUpdated => {
            |value: Value| serde_json::from_value(value).map(EventPayload::ServiceAccountUpdated)
        }
        AuditEventType::ServiceAccountDeleted => {
            |value: Value| serde_json::from_value(value).map(EventPayload::ServiceAccountDeleted)
        }
        AuditEventType::UserAdded => {
            |value: Value| serde_json::from_value(value).map(EventPayload::UserAdded)
        }
        AuditEventType::UserUpdated => {
            |value: Value| serde_json::from_value(value).map(EventPayload::UserUpdated)
        }
        AuditEventType::UserDeleted => {
            |value: Value| serde_json::from_value(value).map(EventPayload::UserDeleted)
        }
    }
}

impl EventPayload {
    /// Resolves the details found under the event's own type key.
    ///
    /// Absent or null details decode to `None`. A malformed payload for a
    /// registered type is an error; unregistered types never fail and fall
    /// back to a generic map, or `None` when the value is not an object.
    pub fn decode(event_type: &str, raw: Option<&Value>) -> ClientResult<Option<Self>> {
        let Some(raw) = raw.filter(|value| !value.is_null()) else {
            return Ok(None);
        };

        match PAYLOAD_DECODERS.get(event_type) {
            Some(decoder) => decoder(raw.clone()).map(Some).map_err(|error| {
                ClientError::PayloadDecode {
                    event_type: event_type.to_owned(),
                    cause: error.to_string(),
                }
            }),
            None => Ok(match raw {
                Value::Object(fields) => Some(Self::Generic(fields.clone())),
                _ => None,
            }),
        }
    }

    /// Returns the registered event type this payload belongs to.
    #[must_use]
    pub fn event_type(&self) -> Option<AuditEventType> {
        let event_type = match self {
            Self::ApiKeyCreated(_) => AuditEventType::ApiKeyCreated,
            Self::ApiKeyUpdated(_) => AuditEventType::ApiKeyUpdated,
            Self::ApiKeyDeleted(_) => AuditEventType::ApiKeyDeleted,
            Self::InviteSent(_) => AuditEventType::InviteSent,
            Self::InviteAccepted(_) => AuditEventType::InviteAccepted,
            Self::InviteDeleted(_) => AuditEventType::InviteDeleted,
            Self::LoginFailed(_) => AuditEventType::LoginFailed,
            Self::LoginSucceeded(_) => AuditEventType::LoginSucceeded,
            Self::LogoutFailed(_) => AuditEventType::LogoutFailed,
            Self::LogoutSucceeded(_) => AuditEventType::LogoutSucceeded,
            Self::OrganizationUpdated(_) => AuditEventType::OrganizationUpdated,
            Self::ProjectCreated(_) => AuditEventType::ProjectCreated,
            Self::ProjectUpdated(_) => AuditEventType::ProjectUpdated,
            Self::ProjectArchived(_) => AuditEventType::ProjectArchived,
            Self::RateLimitUpdated(_) => AuditEventType::RateLimitUpdated,
            Self::RateLimitDeleted(_) => AuditEventType::RateLimitDeleted,
            Self::ServiceAccountCreated(_) => AuditEventType::ServiceAccountCreated,
            Self::ServiceAccountUpdated(_) => AuditEventType::ServiceAccountUpdated,
            Self::ServiceAccountDeleted(_) => AuditEventType::ServiceAccountDeleted,
            Self::UserAdded(_) => AuditEventType::UserAdded,
            Self::UserUpdated(_) => AuditEventType::UserUpdated,
            Self::UserDeleted(_) => AuditEventType::UserDeleted,
            Self::Generic(_) => return None,
        };

        Some(event_type)
    }
}
