use super::*;

impl AdminService {
    /// Streams audit log events matching `filters`, newest first.
    ///
    /// Each event is decoded through its type-keyed payload; an event whose
    /// registered payload fails to decode ends the stream with a
    /// `PayloadDecode` error.
    pub fn list_audit_logs(
        &self,
        query: PageQuery,
        filters: &AuditLogQuery,
    ) -> BoxStream<'_, ClientResult<AuditLogEvent>> {
        let query = query.with_filters(filters.to_query_pairs());
        paginate_all(
            &self.executor,
            AUDIT_LOGS_PATH,
            query,
            AuditLogEvent::from_value,
        )
    }

    /// Fetches one page of audit log events.
    pub async fn list_audit_logs_page(
        &self,
        query: &PageQuery,
        filters: &AuditLogQuery,
    ) -> ClientResult<Page<AuditLogEvent>> {
        let query = query.clone().with_filters(filters.to_query_pairs());
        fetch_page(
            &self.executor,
            AUDIT_LOGS_PATH,
            &query,
            AuditLogEvent::from_value,
        )
        .await
    }

    /// Returns completion usage buckets for the window in `usage`.
    pub async fn usage_completions(&self, usage: &UsageQuery) -> ClientResult<Page<UsageBucket>> {
        let query = PageQuery::new().with_filters(usage.to_query_pairs());
        fetch_page(
            &self.executor,
            USAGE_COMPLETIONS_PATH,
            &query,
            decode_item::<UsageBucket>,
        )
        .await
    }
}
