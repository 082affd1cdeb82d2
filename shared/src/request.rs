//! List query
//!
//! The durable representation of a list screen's state: page position, free
//! text search and screen-specific filters (`status`, `courseId`, `unread`, ...).
//! It serializes flat so it can be sent as query string parameters.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Default page number (1-based)
pub const DEFAULT_CURRENT: u32 = 1;

/// Default page size
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Paginated list query (`?current=&pageSize=&q=&...filters`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    /// Page number (1-based, default: 1)
    #[serde(default = "default_current")]
    pub current: u32,

    /// Items per page (default: 10)
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// Free text search
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub q: Option<String>,

    /// Screen-specific filters
    #[serde(flatten)]
    pub filters: BTreeMap<String, String>,
}

fn default_current() -> u32 {
    DEFAULT_CURRENT
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

impl Default for ListQuery {
    fn default() -> Self {
        Self::new(DEFAULT_CURRENT, DEFAULT_PAGE_SIZE)
    }
}

impl ListQuery {
    /// Create a query for page `current` of size `page_size`.
    ///
    /// Zero values are clamped to 1 so the query always describes a valid page.
    pub fn new(current: u32, page_size: u32) -> Self {
        Self {
            current: current.max(1),
            page_size: page_size.max(1),
            q: None,
            filters: BTreeMap::new(),
        }
    }

    /// Set the free text search (blank strings clear it)
    pub fn with_search(mut self, q: impl Into<String>) -> Self {
        self.set_search(q);
        self
    }

    /// Add a screen filter
    pub fn with_filter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.filters.insert(key.into(), value.into());
        self
    }

    pub fn set_search(&mut self, q: impl Into<String>) {
        let q = q.into();
        let trimmed = q.trim();
        self.q = if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        };
    }

    pub fn filter(&self, key: &str) -> Option<&str> {
        self.filters.get(key).map(String::as_str)
    }

    /// Flat `(key, value)` pairs in a stable order: `current`, `pageSize`, `q`, then filters.
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = vec![
            ("current".to_string(), self.current.to_string()),
            ("pageSize".to_string(), self.page_size.to_string()),
        ];
        if let Some(q) = &self.q {
            pairs.push(("q".to_string(), q.clone()));
        }
        for (key, value) in &self.filters {
            pairs.push((key.clone(), value.clone()));
        }
        pairs
    }

    /// Rebuild a query from decoded `(key, value)` pairs.
    ///
    /// Unparseable page numbers fall back to the defaults; every key other
    /// than `current`, `pageSize` and `q` becomes a filter.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut query = Self::default();
        for (key, value) in pairs {
            let value = value.as_ref();
            match key.as_ref() {
                "current" => {
                    query.current = value.parse().ok().filter(|v| *v > 0).unwrap_or(DEFAULT_CURRENT)
                }
                "pageSize" => {
                    query.page_size = value
                        .parse()
                        .ok()
                        .filter(|v| *v > 0)
                        .unwrap_or(DEFAULT_PAGE_SIZE)
                }
                "q" => query.set_search(value),
                other if !value.is_empty() => {
                    query.filters.insert(other.to_string(), value.to_string());
                }
                _ => {}
            }
        }
        query
    }
}
