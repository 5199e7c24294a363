//! Audit log events and their polymorphic details.
//!
//! The server nests event details under a JSON key equal to the event's own
//! `type` value, e.g. `{"type": "invite.deleted", "invite.deleted": {...}}`.
//! Decoding reads the fixed envelope first and then dispatches on `type`;
//! encoding puts the details back under that same dynamic key.

mod event_type;
mod payload;


use orgadmin_core::{ClientError, ClientResult, Timestamp};
use serde::de::Error as _;
use serde::ser::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

pub use event_type::AuditEventType;
pub use payload::{
    ApiKeyCreated, ApiKeyDeleted, ApiKeyScopes, ApiKeyUpdated, EventPayload, InviteAccepted,
    InviteDeleted, InviteSent, InviteSentData, LoginFailed, LoginSucceeded, LogoutFailed,
    LogoutSucceeded, OrganizationChanges, OrganizationSettings, OrganizationUpdated,
    ProjectArchived, ProjectChanges, ProjectCreated, ProjectCreatedData, ProjectUpdated,
    RateLimitChanges, RateLimitDeleted, RateLimitUpdated, RoleAssignment, ServiceAccountCreated,
    ServiceAccountDeleted, ServiceAccountUpdated, UserAdded, UserDeleted, UserUpdated,
};

/// Project an event is scoped to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectRef {
    /// Project id.
    pub id: String,
    /// Project name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// User reference carried by actors.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ActorUser {
    /// User id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// User email.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// Service account reference carried by API key actors.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ActorServiceAccount {
    /// Service account id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

/// Geolocation resolved from the session IP address.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct IpAddressDetails {
    /// Country.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    /// City.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    /// Region.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    /// Region code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region_code: Option<String>,
    /// Autonomous system number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asn: Option<String>,
    /// Latitude.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<String>,
    /// Longitude.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<String>,
}

/// Browser session that performed an action.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SessionActor {
    /// Signed-in user.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<ActorUser>,
    /// Client IP address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<String>,
    /// Client user agent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
    /// JA3 TLS fingerprint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ja3: Option<String>,
    /// JA4 TLS fingerprint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ja4: Option<String>,
    /// Geolocation of the client IP.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_address_details: Option<IpAddressDetails>,
}

/// API key that performed an action.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ApiKeyActor {
    /// Tracking id of the key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Owner kind, `user` or `service_account`.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub key_type: Option<String>,
    /// Owning user.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<ActorUser>,
    /// Owning service account.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_account: Option<ActorServiceAccount>,
}

/// Who performed an audited action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AuditActor {
    /// Interactive session.
    Session {
        /// Session details.
        session: SessionActor,
    },
    /// API key request.
    ApiKey {
        /// Key details.
        api_key: ApiKeyActor,
    },
}

/// One audit log entry.
#[derive(Debug, Clone, PartialEq)]
pub struct AuditLogEvent {
    /// Event id.
    pub id: String,
    /// Dotted discriminator, also the key holding `payload` on the wire.
    pub event_type: String,
    /// When the audited action took effect.
    pub effective_at: Timestamp,
    /// Project scope, absent for organization-level events.
    pub project: Option<ProjectRef>,
    /// Who performed the action.
    pub actor: AuditActor,
    /// Type-specific details.
    pub payload: Option<EventPayload>,
}

#[derive(Deserialize)]
struct EventEnvelope {
    id: String,
    #[serde(rename = "type")]
    event_type: String,
    effective_at: Timestamp,
    #[serde(default)]
    project: Option<ProjectRef>,
    actor: AuditActor,
}

#[derive(Serialize)]
struct EventEnvelopeRef<'a> {
    id: &'a str,
    #[serde(rename = "type")]
    event_type: &'a str,
    effective_at: &'a Timestamp,
    #[serde(skip_serializing_if = "Option::is_none")]
    project: Option<&'a ProjectRef>,
    actor: &'a AuditActor,
}

impl AuditLogEvent {
    /// Decodes one event from raw JSON bytes.
    pub fn from_slice(bytes: &[u8]) -> ClientResult<Self> {
        let value = serde_json::from_slice::<Value>(bytes)
            .map_err(|error| ClientError::Decode(format!("invalid audit log JSON: {error}")))?;
        Self::from_value(value)
    }

    /// Decodes one event from a parsed JSON value.
    pub fn from_value(value: Value) -> ClientResult<Self> {
        if !value.is_object() {
            return Err(ClientError::Decode(
                "audit log event must be a JSON object".to_owned(),
            ));
        }

        let envelope = EventEnvelope::deserialize(&value).map_err(|error| {
            ClientError::Decode(format!("invalid audit log envelope: {error}"))
        })?;
        let payload =
            EventPayload::decode(envelope.event_type.as_str(), value.get(&envelope.event_type))?;

        Ok(Self {
            id: envelope.id,
            event_type: envelope.event_type,
            effective_at: envelope.effective_at,
            project: envelope.project,
            actor: envelope.actor,
            payload,
        })
    }

    /// Encodes the event, nesting the payload under the `type` value.
    pub fn to_value(&self) -> ClientResult<Value> {
        let envelope = EventEnvelopeRef {
            id: self.id.as_str(),
            event_type: self.event_type.as_str(),
            effective_at: &self.effective_at,
            project: self.project.as_ref(),
            actor: &self.actor,
        };
        let encode_error = |error: serde_json::Error| {
            ClientError::Decode(format!("failed to encode event: {error}"))
        };

        let mut fields = match serde_json::to_value(envelope).map_err(encode_error)? {
            Value::Object(fields) => fields,
            _ => Map::new(),
        };
        if let Some(payload) = &self.payload {
            fields.insert(
                self.event_type.clone(),
                serde_json::to_value(payload).map_err(encode_error)?,
            );
        }

        Ok(Value::Object(fields))
    }

    /// Returns the registered type, or `None` for event types unknown to this client.
    #[must_use]
    pub fn known_type(&self) -> Option<AuditEventType> {
        self.event_type.parse().ok()
    }
}

impl Serialize for AuditLogEvent {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.to_value()
            .map_err(S::Error::custom)?
            .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for AuditLogEvent {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Self::from_value(value).map_err(D::Error::custom)
    }
}

/// Filters accepted by the audit log list endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuditLogQuery {
    /// Only events strictly after this instant.
    pub effective_at_gt: Option<Timestamp>,
    /// Only events at or after this instant.
    pub effective_at_gte: Option<Timestamp>,
    /// Only events strictly before this instant.
    pub effective_at_lt: Option<Timestamp>,
    /// Only events at or before this instant.
    pub effective_at_lte: Option<Timestamp>,
    /// Restrict to these projects.
    pub project_ids: Vec<String>,
    /// Restrict to these event types.
    pub event_types: Vec<AuditEventType>,
    /// Restrict to these actor ids.
    pub actor_ids: Vec<String>,
    /// Restrict to these actor emails.
    pub actor_emails: Vec<String>,
    /// Restrict to these target resource ids.
    pub resource_ids: Vec<String>,
}

impl AuditLogQuery {
    /// Returns the filters as query string pairs.
    #[must_use]
    pub fn to_query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        let bounds = [
            ("effective_at[gt]", self.effective_at_gt),
            ("effective_at[gte]", self.effective_at_gte),
            ("effective_at[lt]", self.effective_at_lt),
            ("effective_at[lte]", self.effective_at_lte),
        ];
        for (key, bound) in bounds {
            if let Some(bound) = bound {
                pairs.push((key.to_owned(), bound.as_unix_seconds().to_string()));
            }
        }

        let lists: [(&str, Vec<&str>); 5] = [
            ("project_ids[]", self.project_ids.iter().map(String::as_str).collect()),
            (
                "event_types[]",
                self.event_types.iter().map(AuditEventType::as_str).collect(),
            ),
            ("actor_ids[]", self.actor_ids.iter().map(String::as_str).collect()),
            ("actor_emails[]", self.actor_emails.iter().map(String::as_str).collect()),
            ("resource_ids[]", self.resource_ids.iter().map(String::as_str).collect()),
        ];
        for (key, values) in lists {
            pairs.extend(values.into_iter().map(|value| (key.to_owned(), value.to_owned())));
        }

        pairs
    }
}
