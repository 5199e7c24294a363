//! Wire types for the organization admin API.

#![forbid(unsafe_code)]

mod audit_log;
mod organization;
mod page;
mod project;
mod resource_uri;
mod usage;

pub use audit_log::{
    ActorServiceAccount, ActorUser, ApiKeyActor, ApiKeyCreated, ApiKeyDeleted, ApiKeyScopes,
    ApiKeyUpdated, AuditActor, AuditEventType, AuditLogEvent, AuditLogQuery, EventPayload,
    InviteAccepted, InviteDeleted, InviteSent, InviteSentData, IpAddressDetails, LoginFailed,
    LoginSucceeded, LogoutFailed, LogoutSucceeded, OrganizationChanges, OrganizationSettings,
    OrganizationUpdated, ProjectArchived, ProjectChanges, ProjectCreated, ProjectCreatedData,
    ProjectRef, ProjectUpdated, RateLimitChanges, RateLimitDeleted, RateLimitUpdated,
    RoleAssignment, ServiceAccountCreated, ServiceAccountDeleted, ServiceAccountUpdated,
    SessionActor, UserAdded, UserDeleted, UserUpdated,
};
pub use organization::{
    AdminApiKey, ApiKeyOwner, Certificate, CertificateDetails, DeletedResource, EmailAddress,
    Invite, InviteProject, InviteRequest, OrganizationRole, User, UserRoleUpdate,
};
pub use page::{LIST_OBJECT, Page};
pub use project::{Project, ProjectRequest, ProjectServiceAccount};
pub use resource_uri::{RESOURCE_URI_SCHEME, ResourceType, ResourceUri, SecondaryKind};
pub use usage::{UsageBucket, UsageQuery};
