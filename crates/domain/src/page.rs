use serde::{Deserialize, Serialize};

/// Discriminator value carried by every list envelope.
pub const LIST_OBJECT: &str = "list";

fn default_list_object() -> String {
    LIST_OBJECT.to_owned()
}

/// One cursor-paginated slice of a server-side collection.
///
/// Items keep server order. `last_cursor` is the `after` value for the next
/// request whenever `has_more` is true.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    /// Envelope discriminator, normally `"list"`.
    #[serde(default = "default_list_object")]
    pub object: String,
    /// Items in server order.
    #[serde(rename = "data", alias = "items")]
    pub items: Vec<T>,
    /// Cursor of the first item, absent when the page is empty.
    #[serde(
        rename = "first_id",
        alias = "first_cursor",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub first_cursor: Option<String>,
    /// Cursor of the last item, absent when the page is empty.
    #[serde(
        rename = "last_id",
        alias = "last_cursor",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub last_cursor: Option<String>,
    /// Whether a subsequent page exists.
    #[serde(default)]
    pub has_more: bool,
}

impl<T> Page<T> {
    /// Creates a list page.
    #[must_use]
    pub fn new(
        items: Vec<T>,
        first_cursor: Option<String>,
        last_cursor: Option<String>,
        has_more: bool,
    ) -> Self {
        Self {
            object: default_list_object(),
            items,
            first_cursor,
            last_cursor,
            has_more,
        }
    }

    /// Returns the cursor for the following page, if the server reported one.
    #[must_use]
    pub fn next_cursor(&self) -> Option<&str> {
        if !self.has_more {
            return None;
        }

        self.last_cursor
            .as_deref()
            .filter(|cursor| !cursor.is_empty())
    }

    /// Returns the number of items on this page.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true when the page carries no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Consumes the page, returning its items.
    #[must_use]
    pub fn into_items(self) -> Vec<T> {
        self.items
    }

    /// Converts every item, stopping on the first failure.
    pub fn try_map_items<U, E, F>(self, mut convert: F) -> Result<Page<U>, E>
    where
        F: FnMut(T) -> Result<U, E>,
    {
        let items = self
            .items
            .into_iter()
            .map(&mut convert)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Page {
            object: self.object,
            items,
            first_cursor: self.first_cursor,
            last_cursor: self.last_cursor,
            has_more: self.has_more,
        })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{Value, json};

    use super::Page;

    #[test]
    fn decodes_wire_envelope() {
        let page = serde_json::from_value::<Page<Value>>(json!({
            "object": "list",
            "data": [{"id": "user_a"}, {"id": "user_b"}],
            "first_id": "user_a",
            "last_id": "user_b",
            "has_more": true
        }));
        assert!(page.is_ok());
        let page = page.unwrap_or_else(|_| unreachable!());
        assert_eq!(page.len(), 2);
        assert_eq!(page.next_cursor(), Some("user_b"));
    }

    #[test]
    fn accepts_abstract_field_names() {
        let page = serde_json::from_value::<Page<Value>>(json!({
            "items": [{"id": "a"}],
            "last_cursor": "a",
            "has_more": false
        }));
        assert!(page.is_ok());
        let page = page.unwrap_or_else(|_| unreachable!());
        assert_eq!(page.object, "list");
        assert_eq!(page.last_cursor.as_deref(), Some("a"));
        assert_eq!(page.next_cursor(), None);
    }

    #[test]
    fn empty_page_has_null_cursors() {
        let page = serde_json::from_value::<Page<Value>>(json!({
            "object": "list",
            "data": [],
            "first_id": null,
            "last_id": null,
            "has_more": false
        }));
        assert!(page.is_ok());
        let page = page.unwrap_or_else(|_| unreachable!());
        assert!(page.is_empty());
        assert_eq!(page.first_cursor, None);
    }

    #[test]
    fn missing_data_is_a_shape_error() {
        let page = serde_json::from_value::<Page<Value>>(json!({"object": "list"}));
        assert!(page.is_err());
    }

    #[test]
    fn more_without_cursor_yields_no_next_cursor() {
        let page: Page<u8> = Page::new(vec![1], Some(String::new()), Some(String::new()), true);
        assert_eq!(page.next_cursor(), None);
    }

    #[test]
    fn try_map_items_keeps_cursors_and_order() {
        let page = Page::new(vec!["1", "2", "3"], Some("1".to_owned()), Some("3".to_owned()), true);
        let mapped = page.try_map_items(|item| item.parse::<u32>());
        assert!(mapped.is_ok());
        let mapped = mapped.unwrap_or_else(|_| unreachable!());
        assert_eq!(mapped.items, vec![1, 2, 3]);
        assert_eq!(mapped.next_cursor(), Some("3"));

        let failed = Page::new(vec!["1", "x"], None, None, false)
            .try_map_items(|item| item.parse::<u32>());
        assert!(failed.is_err());
    }
}
