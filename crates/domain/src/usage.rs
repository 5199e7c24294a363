use orgadmin_core::Timestamp;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One time bucket of aggregated usage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageBucket {
    /// Object label, `bucket`.
    pub object: String,
    /// Bucket start.
    pub start_time: Timestamp,
    /// Bucket end.
    pub end_time: Timestamp,
    /// Aggregated results; their shape depends on the usage endpoint.
    #[serde(default)]
    pub results: Vec<Value>,
}

/// Filters for the usage endpoints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsageQuery {
    /// Inclusive start of the reporting window.
    pub start_time: Timestamp,
    /// Exclusive end of the reporting window.
    pub end_time: Option<Timestamp>,
    /// Bucket width, `1m`, `1h` or `1d`.
    pub bucket_width: Option<String>,
    /// Restrict to these projects.
    pub project_ids: Vec<String>,
    /// Group results by these fields.
    pub group_by: Vec<String>,
}

impl UsageQuery {
    /// Creates a query starting at `start_time` with server defaults otherwise.
    #[must_use]
    pub fn since(start_time: Timestamp) -> Self {
        Self {
            start_time,
            end_time: None,
            bucket_width: None,
            project_ids: Vec::new(),
            group_by: Vec::new(),
        }
    }

    /// Returns the filters as query string pairs. Times are sent as epoch seconds.
    #[must_use]
    pub fn to_query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = vec![(
            "start_time".to_owned(),
            self.start_time.as_unix_seconds().to_string(),
        )];
        if let Some(end_time) = self.end_time {
            pairs.push(("end_time".to_owned(), end_time.as_unix_seconds().to_string()));
        }
        if let Some(bucket_width) = &self.bucket_width {
            pairs.push(("bucket_width".to_owned(), bucket_width.clone()));
        }
        pairs.extend(
            self.project_ids
                .iter()
                .map(|project_id| ("project_ids[]".to_owned(), project_id.clone())),
        );
        pairs.extend(
            self.group_by
                .iter()
                .map(|field| ("group_by[]".to_owned(), field.clone())),
        );

        pairs
    }
}
