//! Generic resource store
//!
//! One [`ResourceStore`] per entity kind owns that entity's current page of
//! records, the pagination metadata of the last fetch and the "create modal
//! open" flag. It is the only writer of that state: pages and the realtime hub
//! go through its methods.
//!
//! # Sequencing
//!
//! Every `fetch` takes a token from a monotonically increasing counter. When a
//! response arrives, it is applied only if no newer fetch has been issued in
//! the meantime, so a slow response can never overwrite a newer one.
//!
//! # Failures
//!
//! A failed request never mutates local state. Write errors always propagate;
//! read errors follow the store's [`ReadErrorPolicy`].

use async_trait::async_trait;
use serde_json::Value;
use shared::message::{ChangeAction, SyncPayload};
use shared::request::ListQuery;
use shared::resource::{Resource, SelectOption};
use shared::response::{PaginationMeta, unwrap_item, unwrap_item_value, unwrap_list};
use std::str::FromStr;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use tokio::sync::RwLock;

use crate::config::{ClientConfig, ConfigError};
use crate::diff::{self, Patch};
use crate::http::HttpClient;
use crate::{ClientError, ClientResult};

/// What a store does when a list fetch fails
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReadErrorPolicy {
    /// Log and keep showing the previous page
    Silent,
    /// Return the error so the page can show a non-blocking warning
    #[default]
    Notify,
}

impl FromStr for ReadErrorPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "silent" => Ok(Self::Silent),
            "notify" => Ok(Self::Notify),
            _ => Err(ConfigError::InvalidValue {
                key: "HRM_READ_ERRORS",
                value: s.to_string(),
            }),
        }
    }
}

/// Where a created record lands in the held page
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum InsertPosition {
    #[default]
    Append,
    Prepend,
}

impl FromStr for InsertPosition {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "append" => Ok(Self::Append),
            "prepend" => Ok(Self::Prepend),
            _ => Err(ConfigError::InvalidValue {
                key: "HRM_INSERT",
                value: s.to_string(),
            }),
        }
    }
}

/// Result of a [`ResourceStore::fetch`] that did not fail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The page replaced the held records and meta
    Applied,
    /// A newer fetch was issued; this response was dropped
    Superseded,
    /// The request failed under [`ReadErrorPolicy::Silent`]; stale data kept
    Degraded,
}

/// Point-in-time copy of a store's state
#[derive(Debug, Clone)]
pub struct StoreSnapshot<R> {
    pub records: Vec<R>,
    pub meta: PaginationMeta,
    pub modal_open: bool,
}

#[derive(Debug)]
struct StoreState<R> {
    records: Vec<R>,
    meta: PaginationMeta,
    modal_open: bool,
}

/// Decrements the in-flight counter when the request finishes or is dropped
struct LoadingGuard<'a>(&'a AtomicUsize);

impl<'a> LoadingGuard<'a> {
    fn new(counter: &'a AtomicUsize) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(counter)
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Store for one resource kind
pub struct ResourceStore<R: Resource, C: HttpClient> {
    http: Arc<C>,
    state: RwLock<StoreState<R>>,
    latest_token: AtomicU64,
    in_flight: AtomicUsize,
    read_error_policy: ReadErrorPolicy,
    insert_position: InsertPosition,
}

impl<R: Resource, C: HttpClient> std::fmt::Debug for ResourceStore<R, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceStore")
            .field("resource", &R::NAME)
            .field("read_error_policy", &self.read_error_policy)
            .field("insert_position", &self.insert_position)
            .finish_non_exhaustive()
    }
}

impl<R: Resource, C: HttpClient> ResourceStore<R, C> {
    pub fn new(http: Arc<C>) -> Self {
        Self {
            http,
            state: RwLock::new(StoreState {
                records: Vec::new(),
                meta: PaginationMeta::default(),
                modal_open: false,
            }),
            latest_token: AtomicU64::new(0),
            in_flight: AtomicUsize::new(0),
            read_error_policy: ReadErrorPolicy::default(),
            insert_position: InsertPosition::default(),
        }
    }

    /// Store using the policies and page size from `config`
    pub fn from_config(http: Arc<C>, config: &ClientConfig) -> Self {
        let mut store = Self::new(http)
            .with_read_error_policy(config.read_error_policy)
            .with_insert_position(config.insert_position);
        store.state.get_mut().meta = PaginationMeta::new(1, config.default_page_size, 0);
        store
    }

    pub fn with_read_error_policy(mut self, policy: ReadErrorPolicy) -> Self {
        self.read_error_policy = policy;
        self
    }

    pub fn with_insert_position(mut self, position: InsertPosition) -> Self {
        self.insert_position = position;
        self
    }

    pub fn read_error_policy(&self) -> ReadErrorPolicy {
        self.read_error_policy
    }

    fn collection_path() -> String {
        format!("/api/{}", R::NAME)
    }

    fn item_path(id: &str) -> String {
        format!("/api/{}/{}", R::NAME, id)
    }

    // ========== Reads ==========

    /// Fetch one page and replace the held records and meta wholesale
    pub async fn fetch(&self, query: &ListQuery) -> ClientResult<FetchOutcome> {
        let token = self.latest_token.fetch_add(1, Ordering::SeqCst) + 1;
        let _loading = LoadingGuard::new(&self.in_flight);

        tracing::debug!(
            resource = R::NAME,
            current = query.current,
            page_size = query.page_size,
            token,
            "Fetching page"
        );

        let result = match self
            .http
            .get::<Value>(&Self::collection_path(), &query.to_pairs())
            .await
        {
            Ok(body) => unwrap_list::<R>(body).map_err(ClientError::from),
            Err(e) => Err(e),
        };

        let page = match result {
            Ok(page) => page,
            Err(e) => {
                if self.latest_token.load(Ordering::SeqCst) != token {
                    tracing::debug!(resource = R::NAME, token, error = %e, "Ignoring failure of superseded fetch");
                    return Ok(FetchOutcome::Superseded);
                }
                return match self.read_error_policy {
                    ReadErrorPolicy::Silent => {
                        tracing::warn!(resource = R::NAME, error = %e, "Fetch failed, keeping previous page");
                        Ok(FetchOutcome::Degraded)
                    }
                    ReadErrorPolicy::Notify => Err(e),
                };
            }
        };

        let mut state = self.state.write().await;
        if self.latest_token.load(Ordering::SeqCst) != token {
            tracing::debug!(resource = R::NAME, token, "Discarding stale response");
            return Ok(FetchOutcome::Superseded);
        }
        tracing::debug!(
            resource = R::NAME,
            count = page.result.len(),
            total = page.meta.total,
            "Page applied"
        );
        state.records = page.result;
        state.meta = page.meta;
        Ok(FetchOutcome::Applied)
    }

    /// Shorthand for `fetch(&ListQuery::new(current, page_size).with_search(q))`
    pub async fn fetch_page(
        &self,
        current: u32,
        page_size: u32,
        q: Option<&str>,
    ) -> ClientResult<FetchOutcome> {
        let mut query = ListQuery::new(current, page_size);
        if let Some(q) = q {
            query.set_search(q);
        }
        self.fetch(&query).await
    }

    // ========== Writes ==========

    /// Create a record and insert the server's copy into the held page
    pub async fn add(&self, payload: &R::Create) -> ClientResult<R> {
        let _loading = LoadingGuard::new(&self.in_flight);
        let body: Value = self.http.post(&Self::collection_path(), payload).await?;
        let item: R = unwrap_item(body)?;

        self.upsert(item.clone(), self.insert_position).await;
        tracing::info!(resource = R::NAME, id = item.id(), "Record created");
        Ok(item)
    }

    /// Send `patch` and merge it, then the server's returned fields, into
    /// the held record.
    ///
    /// Returns the merged record, or `None` when the record is not on the
    /// held page and the server did not return a complete one. A merge that
    /// does not form a valid record is an error and leaves the page as is.
    pub async fn update(&self, id: &str, patch: &Patch) -> ClientResult<Option<R>> {
        let _loading = LoadingGuard::new(&self.in_flight);
        let body: Value = self.http.put(&Self::item_path(id), patch).await?;

        let returned = match unwrap_item_value(body) {
            Value::Object(map) => map,
            _ => serde_json::Map::new(),
        };

        let mut state = self.state.write().await;
        let merged = match state.records.iter_mut().find(|r| r.id() == id) {
            Some(record) => {
                let mut changes = patch.clone();
                diff::merge(&mut changes, &returned);
                match diff::apply(record, &changes) {
                    Ok(merged) => {
                        *record = merged.clone();
                        Some(merged)
                    }
                    Err(e) => {
                        tracing::warn!(resource = R::NAME, id, error = %e, "Could not merge update response");
                        return Err(e.into());
                    }
                }
            }
            None => serde_json::from_value(Value::Object(returned)).ok(),
        };

        tracing::info!(resource = R::NAME, id, fields = patch.len(), "Record updated");
        Ok(merged)
    }

    /// Delete a record and drop it from the held page
    pub async fn delete(&self, id: &str) -> ClientResult<()> {
        let _loading = LoadingGuard::new(&self.in_flight);
        let _: Value = self.http.delete(&Self::item_path(id)).await?;

        self.state.write().await.records.retain(|r| r.id() != id);
        tracing::info!(resource = R::NAME, id, "Record deleted");
        Ok(())
    }

    // ========== UI flag ==========

    pub async fn set_modal_open(&self, open: bool) {
        self.state.write().await.modal_open = open;
    }

    pub async fn is_modal_open(&self) -> bool {
        self.state.read().await.modal_open
    }

    // ========== Snapshots ==========

    pub async fn snapshot(&self) -> StoreSnapshot<R> {
        let state = self.state.read().await;
        StoreSnapshot {
            records: state.records.clone(),
            meta: state.meta,
            modal_open: state.modal_open,
        }
    }

    pub async fn records(&self) -> Vec<R> {
        self.state.read().await.records.clone()
    }

    pub async fn meta(&self) -> PaginationMeta {
        self.state.read().await.meta
    }

    pub async fn get(&self, id: &str) -> Option<R> {
        self.state
            .read()
            .await
            .records
            .iter()
            .find(|r| r.id() == id)
            .cloned()
    }

    /// Records matching `predicate`, in page order
    pub async fn filtered(&self, predicate: impl Fn(&R) -> bool) -> Vec<R> {
        self.state
            .read()
            .await
            .records
            .iter()
            .filter(|r| predicate(r))
            .cloned()
            .collect()
    }

    /// Dropdown options for another screen
    pub async fn options(&self, label: impl Fn(&R) -> String) -> Vec<SelectOption> {
        self.state
            .read()
            .await
            .records
            .iter()
            .map(|r| SelectOption::new(r.id(), label(r)))
            .collect()
    }

    /// Whether any request issued through this store is still pending
    pub fn is_loading(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst) > 0
    }

    // ========== Realtime ==========

    /// Apply a push event with the same rules as local mutations.
    ///
    /// Returns `false` when the event changed nothing (unknown id on
    /// update or delete).
    pub async fn apply_change(&self, change: &SyncPayload) -> ClientResult<bool> {
        match change.action {
            ChangeAction::Create => {
                let data = change.data.clone().ok_or_else(|| {
                    ClientError::InvalidResponse(format!("{} create without data", R::EVENT))
                })?;
                let item: R = serde_json::from_value(unwrap_item_value(data))?;
                Ok(self.upsert(item, InsertPosition::Append).await)
            }
            ChangeAction::Update => {
                let id = change.entity_id().ok_or_else(|| {
                    ClientError::InvalidResponse(format!("{} update without id", R::EVENT))
                })?;
                let data = match change.data.clone().map(unwrap_item_value) {
                    Some(Value::Object(map)) => map,
                    _ => {
                        return Err(ClientError::InvalidResponse(format!(
                            "{} update without data",
                            R::EVENT
                        )));
                    }
                };

                let mut state = self.state.write().await;
                let Some(record) = state.records.iter_mut().find(|r| r.id() == id) else {
                    return Ok(false);
                };
                *record = diff::apply(record, &data)?;
                Ok(true)
            }
            ChangeAction::Delete => {
                let id = change.entity_id().ok_or_else(|| {
                    ClientError::InvalidResponse(format!("{} delete without id", R::EVENT))
                })?;
                let mut state = self.state.write().await;
                let before = state.records.len();
                state.records.retain(|r| r.id() != id);
                Ok(state.records.len() != before)
            }
        }
    }

    /// Insert or replace by id; the page never grows past `page_size`.
    /// Returns `true` if the record is held afterwards.
    async fn upsert(&self, item: R, position: InsertPosition) -> bool {
        let mut state = self.state.write().await;
        if let Some(existing) = state.records.iter_mut().find(|r| r.id() == item.id()) {
            *existing = item;
            return true;
        }

        let id = item.id().to_string();
        match position {
            InsertPosition::Append => state.records.push(item),
            InsertPosition::Prepend => state.records.insert(0, item),
        }
        let page_size = state.meta.page_size as usize;
        state.records.truncate(page_size);
        state.records.iter().any(|r| r.id() == id)
    }
}

/// Receiver of push events for one event name
#[async_trait]
pub trait ChangeSink: Send + Sync {
    /// Event name this sink consumes (`{entity}Changed`)
    fn event(&self) -> &'static str;

    async fn apply(&self, change: &SyncPayload) -> ClientResult<bool>;
}

#[async_trait]
impl<R: Resource, C: HttpClient> ChangeSink for ResourceStore<R, C> {
    fn event(&self) -> &'static str {
        R::EVENT
    }

    async fn apply(&self, change: &SyncPayload) -> ClientResult<bool> {
        self.apply_change(change).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_parsing() {
        assert_eq!("Silent".parse::<ReadErrorPolicy>().unwrap(), ReadErrorPolicy::Silent);
        assert_eq!("notify".parse::<ReadErrorPolicy>().unwrap(), ReadErrorPolicy::Notify);
        assert!("loud".parse::<ReadErrorPolicy>().is_err());
        assert_eq!("prepend".parse::<InsertPosition>().unwrap(), InsertPosition::Prepend);
    }

    #[test]
    fn test_loading_guard_counts() {
        let counter = AtomicUsize::new(0);
        {
            let _a = LoadingGuard::new(&counter);
            let _b = LoadingGuard::new(&counter);
            assert_eq!(counter.load(Ordering::SeqCst), 2);
        }
        assert_eq!(counter.load(Ordering::SeqCst), 0);
    }
}
