use super::*;

impl AdminService {
    /// Streams projects; archived ones only when `include_archived` is set.
    pub fn list_projects(
        &self,
        query: PageQuery,
        include_archived: bool,
    ) -> BoxStream<'_, ClientResult<Project>> {
        let query = query.with_filters([(
            "include_archived".to_owned(),
            include_archived.to_string(),
        )]);
        paginate_all(&self.executor, PROJECTS_PATH, query, decode_item::<Project>)
    }

    /// Returns one project.
    pub async fn retrieve_project(&self, project_id: &str) -> ClientResult<Project> {
        self.executor
            .get(&format!("{PROJECTS_PATH}/{project_id}"), &[])
            .await
    }

    /// Creates a project.
    pub async fn create_project(&self, request: &ProjectRequest) -> ClientResult<Project> {
        self.executor.post(PROJECTS_PATH, request).await
    }

    /// Renames a project.
    pub async fn modify_project(
        &self,
        project_id: &str,
        request: &ProjectRequest,
    ) -> ClientResult<Project> {
        self.executor
            .post(&format!("{PROJECTS_PATH}/{project_id}"), request)
            .await
    }

    /// Archives a project. Archived projects cannot be used or restored.
    pub async fn archive_project(&self, project_id: &str) -> ClientResult<Project> {
        self.executor
            .post(
                &format!("{PROJECTS_PATH}/{project_id}/archive"),
                &serde_json::Map::new(),
            )
            .await
    }

    /// Streams the service accounts of a project.
    pub fn list_project_service_accounts(
        &self,
        project_id: &str,
        query: PageQuery,
    ) -> BoxStream<'_, ClientResult<ProjectServiceAccount>> {
        paginate_all(
            &self.executor,
            format!("{PROJECTS_PATH}/{project_id}/service_accounts"),
            query,
            decode_item::<ProjectServiceAccount>,
        )
    }

    /// Returns one service account of a project.
    pub async fn retrieve_project_service_account(
        &self,
        project_id: &str,
        service_account_id: &str,
    ) -> ClientResult<ProjectServiceAccount> {
        self.executor
            .get(
                &format!("{PROJECTS_PATH}/{project_id}/service_accounts/{service_account_id}"),
                &[],
            )
            .await
    }
}
