//! API Response types
//!
//! The backend wraps payloads inconsistently, so everything here unwraps
//! defensively:
//!
//! ```json
//! { "data": [{ "result": [...], "meta": { "current": 1, "pageSize": 10, "total": 34 } }] }
//! { "data": { "result": [...], "meta": { ... } } }
//! { "data": { "data": { "id": "d1", ... } } }
//! { "data": { "id": "d1", ... } }
//! ```

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Envelope decoding failure
#[derive(Debug, Error)]
pub enum EnvelopeError {
    #[error("missing field `{0}` in response envelope")]
    MissingField(&'static str),

    #[error("empty list envelope")]
    Empty,

    #[error("invalid payload: {0}")]
    Payload(#[from] serde_json::Error),
}

/// Pagination metadata of the last fetched page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationMeta {
    /// Current page number (1-based)
    pub current: u32,
    /// Items per page
    pub page_size: u32,
    /// Total number of items on the server
    pub total: u64,
}

impl Default for PaginationMeta {
    fn default() -> Self {
        Self {
            current: 1,
            page_size: crate::request::DEFAULT_PAGE_SIZE,
            total: 0,
        }
    }
}

impl PaginationMeta {
    /// Create metadata, clamping `current` and `page_size` to at least 1
    pub fn new(current: u32, page_size: u32, total: u64) -> Self {
        Self {
            current: current.max(1),
            page_size: page_size.max(1),
            total,
        }
    }

    /// Total number of pages
    pub fn total_pages(&self) -> u32 {
        if self.total == 0 {
            return 0;
        }
        self.total.div_ceil(self.page_size as u64) as u32
    }

    pub fn has_next(&self) -> bool {
        self.current < self.total_pages()
    }
}

/// One page of resources as returned by a list endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListPage<T> {
    pub result: Vec<T>,
    pub meta: PaginationMeta,
}

/// Error body returned by the backend on 4xx/5xx
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub code: Option<Value>,
    pub message: String,
    #[serde(default)]
    pub details: Option<Value>,
}

/// Decode a list response body.
///
/// `data` may hold the page directly or a one-element array of pages.
pub fn unwrap_list<T: DeserializeOwned>(body: Value) -> Result<ListPage<T>, EnvelopeError> {
    let data = match body {
        Value::Object(mut obj) if !obj.contains_key("result") => {
            obj.remove("data").ok_or(EnvelopeError::MissingField("data"))?
        }
        other => other,
    };

    let page = match data {
        Value::Array(items) => items.into_iter().next().ok_or(EnvelopeError::Empty)?,
        other => other,
    };

    let Value::Object(mut page) = page else {
        return Err(EnvelopeError::MissingField("result"));
    };
    let result = page
        .remove("result")
        .ok_or(EnvelopeError::MissingField("result"))?;
    let result: Vec<T> = serde_json::from_value(result)?;

    let meta = match page.remove("meta") {
        Some(meta) => normalize_meta(serde_json::from_value(meta)?),
        None => PaginationMeta::new(1, result.len().max(1) as u32, result.len() as u64),
    };

    Ok(ListPage { result, meta })
}

/// Strip `data` wrappers until the resource object itself is reached.
///
/// An object that carries an `id` is treated as the resource even if it also
/// has a `data` field.
pub fn unwrap_item_value(body: Value) -> Value {
    let mut current = body;
    loop {
        match current {
            Value::Object(mut obj) if !obj.contains_key("id") && obj.contains_key("data") => {
                current = obj.remove("data").unwrap_or(Value::Null);
            }
            other => return other,
        }
    }
}

/// Decode a single-item response body
pub fn unwrap_item<T: DeserializeOwned>(body: Value) -> Result<T, EnvelopeError> {
    Ok(serde_json::from_value(unwrap_item_value(body))?)
}

fn normalize_meta(meta: RawMeta) -> PaginationMeta {
    PaginationMeta::new(
        meta.current.unwrap_or(1),
        meta.page_size.unwrap_or(crate::request::DEFAULT_PAGE_SIZE),
        meta.total.unwrap_or(0),
    )
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawMeta {
    current: Option<u32>,
    page_size: Option<u32>,
    total: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Item {
        id: String,
        name: String,
    }

    #[test]
    fn test_list_in_array_envelope() {
        let body = json!({
            "data": [{
                "result": [{ "id": "1", "name": "HR" }],
                "meta": { "current": 1, "pageSize": 10, "total": 34 }
            }]
        });

        let page: ListPage<Item> = unwrap_list(body).unwrap();
        assert_eq!(page.result.len(), 1);
        assert_eq!(page.meta, PaginationMeta::new(1, 10, 34));
    }

    #[test]
    fn test_list_in_object_envelope() {
        let body = json!({
            "data": {
                "result": [],
                "meta": { "current": 2, "pageSize": 5, "total": 6 }
            }
        });

        let page: ListPage<Item> = unwrap_list(body).unwrap();
        assert!(page.result.is_empty());
        assert_eq!(page.meta.current, 2);
        assert_eq!(page.meta.total_pages(), 2);
    }

    #[test]
    fn test_list_empty_array_is_error() {
        let err = unwrap_list::<Item>(json!({ "data": [] })).unwrap_err();
        assert!(matches!(err, EnvelopeError::Empty));
    }

    #[test]
    fn test_list_invalid_meta_is_clamped() {
        let body = json!({
            "data": { "result": [], "meta": { "current": 0, "pageSize": 0 } }
        });
        let page: ListPage<Item> = unwrap_list(body).unwrap();
        assert_eq!(page.meta, PaginationMeta::new(1, 1, 0));
    }

    #[test]
    fn test_item_double_wrapped() {
        let body = json!({ "data": { "data": { "id": "7", "name": "Payroll" } } });
        let item: Item = unwrap_item(body).unwrap();
        assert_eq!(item.id, "7");
    }

    #[test]
    fn test_item_single_wrapped_and_bare() {
        let wrapped: Item = unwrap_item(json!({ "data": { "id": "1", "name": "a" } })).unwrap();
        let bare: Item = unwrap_item(json!({ "id": "1", "name": "a" })).unwrap();
        assert_eq!(wrapped, bare);
    }

    #[test]
    fn test_total_pages() {
        assert_eq!(PaginationMeta::new(1, 10, 34).total_pages(), 4);
        assert_eq!(PaginationMeta::new(1, 10, 0).total_pages(), 0);
        assert!(PaginationMeta::new(3, 10, 34).has_next());
        assert!(!PaginationMeta::new(4, 10, 34).has_next());
    }
}
