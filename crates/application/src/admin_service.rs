//! Typed operations over the organization admin endpoints.
//!
//! Every call goes through the shared [`RequestExecutor`]; list endpoints are
//! exposed both as single pages and as lazy streams over all pages.

use futures::stream::BoxStream;
use orgadmin_core::ClientResult;
use orgadmin_domain::{
    AdminApiKey, AuditLogEvent, AuditLogQuery, Certificate, DeletedResource, Invite,
    InviteRequest, OrganizationRole, Page, Project, ProjectRequest, ProjectServiceAccount,
    UsageBucket, UsageQuery, User, UserRoleUpdate,
};

use crate::pagination::{PageQuery, decode_item, fetch_page, paginate_all};
use crate::request_executor::RequestExecutor;

mod audit;
mod members;
mod projects;


const USERS_PATH: &str = "/organization/users";
const INVITES_PATH: &str = "/organization/invites";
const PROJECTS_PATH: &str = "/organization/projects";
const ADMIN_API_KEYS_PATH: &str = "/organization/admin_api_keys";
const CERTIFICATES_PATH: &str = "/organization/certificates";
const AUDIT_LOGS_PATH: &str = "/organization/audit_logs";
const USAGE_COMPLETIONS_PATH: &str = "/organization/usage/completions";

/// Client-side service for organization administration.
#[derive(Clone)]
pub struct AdminService {
    executor: RequestExecutor,
}

impl AdminService {
    /// Creates a service sending requests through `executor`.
    #[must_use]
    pub fn new(executor: RequestExecutor) -> Self {
        Self { executor }
    }
}
