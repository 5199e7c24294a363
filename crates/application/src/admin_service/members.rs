use super::*;

impl AdminService {
    /// Streams every organization member.
    pub fn list_users(&self, query: PageQuery) -> BoxStream<'_, ClientResult<User>> {
        paginate_all(&self.executor, USERS_PATH, query, decode_item::<User>)
    }

    /// Fetches one page of organization members.
    pub async fn list_users_page(&self, query: &PageQuery) -> ClientResult<Page<User>> {
        fetch_page(&self.executor, USERS_PATH, query, decode_item::<User>).await
    }

    /// Returns one organization member.
    pub async fn retrieve_user(&self, user_id: &str) -> ClientResult<User> {
        self.executor
            .get(&format!("{USERS_PATH}/{user_id}"), &[])
            .await
    }

    /// Changes a member's organization role.
    pub async fn update_user_role(
        &self,
        user_id: &str,
        role: OrganizationRole,
    ) -> ClientResult<User> {
        self.executor
            .post(&format!("{USERS_PATH}/{user_id}"), &UserRoleUpdate { role })
            .await
    }

    /// Removes a member from the organization.
    pub async fn delete_user(&self, user_id: &str) -> ClientResult<DeletedResource> {
        self.executor
            .delete(&format!("{USERS_PATH}/{user_id}"))
            .await
    }

    /// Streams every invite, pending or not.
    pub fn list_invites(&self, query: PageQuery) -> BoxStream<'_, ClientResult<Invite>> {
        paginate_all(&self.executor, INVITES_PATH, query, decode_item::<Invite>)
    }

    /// Sends a new organization invite.
    pub async fn create_invite(&self, request: &InviteRequest) -> ClientResult<Invite> {
        self.executor.post(INVITES_PATH, request).await
    }

    /// Returns one invite.
    pub async fn retrieve_invite(&self, invite_id: &str) -> ClientResult<Invite> {
        self.executor
            .get(&format!("{INVITES_PATH}/{invite_id}"), &[])
            .await
    }

    /// Revokes a pending invite.
    pub async fn delete_invite(&self, invite_id: &str) -> ClientResult<DeletedResource> {
        self.executor
            .delete(&format!("{INVITES_PATH}/{invite_id}"))
            .await
    }

    /// Streams the organization's admin API keys.
    pub fn list_admin_api_keys(
        &self,
        query: PageQuery,
    ) -> BoxStream<'_, ClientResult<AdminApiKey>> {
        paginate_all(
            &self.executor,
            ADMIN_API_KEYS_PATH,
            query,
            decode_item::<AdminApiKey>,
        )
    }

    /// Streams the organization's uploaded certificates.
    pub fn list_certificates(&self, query: PageQuery) -> BoxStream<'_, ClientResult<Certificate>> {
        paginate_all(
            &self.executor,
            CERTIFICATES_PATH,
            query,
            decode_item::<Certificate>,
        )
    }
}
