use orgadmin_core::{ClientResult, NonEmptyString, Timestamp};
use serde::{Deserialize, Serialize};

/// Organization project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    /// Object label, `organization.project`.
    pub object: String,
    /// Project id.
    pub id: String,
    /// Project name.
    pub name: String,
    /// Creation time.
    pub created_at: Timestamp,
    /// Archival time, absent while active.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub archived_at: Option<Timestamp>,
    /// `active` or `archived`.
    pub status: String,
}

impl Project {
    /// Returns true while the project has not been archived.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.archived_at.is_none() && self.status == "active"
    }
}

/// Project creation or rename request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectRequest {
    /// Project name.
    pub name: String,
}

impl ProjectRequest {
    /// Creates a request with a validated non-empty name.
    pub fn new(name: impl Into<String>) -> ClientResult<Self> {
        Ok(Self {
            name: NonEmptyString::new(name)?.into(),
        })
    }
}

/// Service account owned by a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectServiceAccount {
    /// Object label, `organization.project.service_account`.
    pub object: String,
    /// Service account id.
    pub id: String,
    /// Service account name.
    pub name: String,
    /// Project role, `owner` or `member`.
    pub role: String,
    /// Creation time.
    pub created_at: Timestamp,
}
