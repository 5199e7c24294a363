use std::time::Duration;

use async_trait::async_trait;
use futures::TryStreamExt;
use orgadmin_core::{ClientError, ClientResult, Timestamp};
use orgadmin_domain::{ResourceType, ResourceUri, SecondaryKind, UsageQuery};
use serde::Serialize;
use serde_json::Value;

use crate::admin_service::AdminService;
use crate::pagination::PageQuery;
use crate::resource_poller::ResourceFetcher;

/// Window summarized by `usage-dashboard` resources.
pub const USAGE_DASHBOARD_WINDOW: Duration = Duration::from_secs(7 * 24 * 60 * 60);

/// Resolves resource URIs against the admin API.
#[derive(Clone)]
pub struct AdminResourceFetcher {
    admin: AdminService,
}

impl AdminResourceFetcher {
    /// Creates a fetcher backed by `admin`.
    #[must_use]
    pub fn new(admin: AdminService) -> Self {
        Self { admin }
    }

    async fn fetch_project(&self, uri: &ResourceUri, project_id: &str) -> ClientResult<Value> {
        match (uri.secondary_kind(), uri.secondary_id()) {
            (None, _) => to_json(&self.admin.retrieve_project(project_id).await?),
            (Some(SecondaryKind::ServiceAccount), Some(service_account_id)) => to_json(
                &self
                    .admin
                    .retrieve_project_service_account(project_id, service_account_id)
                    .await?,
            ),
            (Some(SecondaryKind::ServiceAccount), None) => to_json(
                &self
                    .admin
                    .list_project_service_accounts(project_id, PageQuery::new())
                    .try_collect::<Vec<_>>()
                    .await?,
            ),
        }
    }

    async fn fetch_usage_dashboard(&self) -> ClientResult<Value> {
        let window = i64::try_from(USAGE_DASHBOARD_WINDOW.as_secs()).unwrap_or(i64::MAX);
        let start = Timestamp::from_unix_seconds(Timestamp::now().as_unix_seconds() - window)?;
        let mut usage = UsageQuery::since(start);
        usage.bucket_width = Some("1d".to_owned());

        to_json(&self.admin.usage_completions(&usage).await?)
    }
}

#[async_trait]
impl ResourceFetcher for AdminResourceFetcher {
    async fn fetch_resource(&self, uri: &ResourceUri) -> ClientResult<Value> {
        match (uri.resource_type(), uri.primary_id()) {
            (ResourceType::Project, Some(project_id)) => {
                self.fetch_project(uri, project_id).await
            }
            (ResourceType::Member, Some(user_id)) => {
                to_json(&self.admin.retrieve_user(user_id).await?)
            }
            (ResourceType::Project | ResourceType::Member, None) => {
                Err(ClientError::InvalidResourcePath(format!(
                    "'{uri}' does not name a single resource"
                )))
            }
            (ResourceType::ActiveProjects, _) => to_json(
                &self
                    .admin
                    .list_projects(PageQuery::new(), false)
                    .try_collect::<Vec<_>>()
                    .await?,
            ),
            (ResourceType::CurrentMembers, _) => to_json(
                &self
                    .admin
                    .list_users(PageQuery::new())
                    .try_collect::<Vec<_>>()
                    .await?,
            ),
            (ResourceType::UsageDashboard, _) => self.fetch_usage_dashboard().await,
        }
    }
}

fn to_json<T>(resource: &T) -> ClientResult<Value>
where
    T: Serialize + ?Sized,
{
    serde_json::to_value(resource)
        .map_err(|error| ClientError::Internal(format!("failed to encode resource: {error}")))
}
