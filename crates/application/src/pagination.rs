//! Cursor pagination shared by every list endpoint.


use std::sync::Arc;

use futures::stream::{self, BoxStream, StreamExt, TryStreamExt};
use orgadmin_core::{ClientError, ClientResult};
use orgadmin_domain::Page;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::request_executor::RequestExecutor;

/// Cursor and filter parameters for one list request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageQuery {
    /// Maximum items per page; server default when absent.
    pub limit: Option<u32>,
    /// Return items after this cursor.
    pub after: Option<String>,
    /// Return items before this cursor.
    pub before: Option<String>,
    /// Endpoint-specific filters appended after the cursor parameters.
    pub filters: Vec<(String, String)>,
}

impl PageQuery {
    /// Creates an unfiltered query starting at the first page.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the page size.
    #[must_use]
    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Sets the `after` cursor.
    #[must_use]
    pub fn with_after(mut self, cursor: impl Into<String>) -> Self {
        self.after = Some(cursor.into());
        self
    }

    /// Appends endpoint-specific filters.
    #[must_use]
    pub fn with_filters(mut self, filters: impl IntoIterator<Item = (String, String)>) -> Self {
        self.filters.extend(filters);
        self
    }

    /// Returns all parameters as query string pairs.
    #[must_use]
    pub fn to_query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::with_capacity(self.filters.len() + 3);
        if let Some(limit) = self.limit {
            pairs.push(("limit".to_owned(), limit.to_string()));
        }
        if let Some(after) = &self.after {
            pairs.push(("after".to_owned(), after.clone()));
        }
        if let Some(before) = &self.before {
            pairs.push(("before".to_owned(), before.clone()));
        }
        pairs.extend(self.filters.iter().cloned());
        pairs
    }
}

/// Item decoder that deserializes straight into `T`.
pub fn decode_item<T>(value: Value) -> ClientResult<T>
where
    T: DeserializeOwned,
{
    serde_json::from_value(value)
        .map_err(|error| ClientError::Decode(format!("failed to decode list item: {error}")))
}

/// Fetches one page and decodes each item with `item_decoder`.
pub async fn fetch_page<T, F>(
    executor: &RequestExecutor,
    path: &str,
    query: &PageQuery,
    item_decoder: F,
) -> ClientResult<Page<T>>
where
    F: FnMut(Value) -> ClientResult<T>,
{
    fetch_raw_page(executor, path, query)
        .await?
        .try_map_items(item_decoder)
}

async fn fetch_raw_page(
    executor: &RequestExecutor,
    path: &str,
    query: &PageQuery,
) -> ClientResult<Page<Value>> {
    executor
        .get::<Page<Value>>(path, &query.to_query_pairs())
        .await
}

enum PaginationState {
    Fetch(PageQuery),
    Fail(ClientError),
    Done,
}

/// Lazily walks every page of a list endpoint, yielding items in server order.
///
/// Pages are fetched one at a time and only when the consumer pulls past the
/// end of the previous page. Items are decoded as they are yielded; an item
/// that fails to decode is yielded as `Err` and the walk continues with the
/// next item. A failed page request is yielded as `Err` and ends the stream.
/// Dropping the stream stops pagination without further requests.
pub fn paginate_all<'a, T, F>(
    executor: &'a RequestExecutor,
    path: impl Into<String>,
    query: PageQuery,
    item_decoder: F,
) -> BoxStream<'a, ClientResult<T>>
where
    T: Send + 'a,
    F: Fn(Value) -> ClientResult<T> + Send + Sync + 'a,
{
    let path: Arc<str> = Arc::from(path.into());
    let item_decoder = Arc::new(item_decoder);

    stream::try_unfold(PaginationState::Fetch(query), move |state| {
        let path = Arc::clone(&path);
        async move {
            let query = match state {
                PaginationState::Fetch(query) => query,
                PaginationState::Fail(error) => return Err(error),
                PaginationState::Done => return Ok(None),
            };

            let page = fetch_raw_page(executor, &path, &query).await?;
            let next_state = match (page.has_more, page.next_cursor()) {
                (false, _) => PaginationState::Done,
                (true, Some(cursor)) => PaginationState::Fetch(query.with_after(cursor)),
                (true, None) => PaginationState::Fail(ClientError::Decode(format!(
                    "list page from '{path}' reports more results without a cursor"
                ))),
            };

            Ok(Some((page.into_items(), next_state)))
        }
    })
    .map_ok(move |items| {
        let item_decoder = Arc::clone(&item_decoder);
        stream::iter(items.into_iter().map(move |item| (*item_decoder)(item)))
    })
    .try_flatten()
    .boxed()
}
