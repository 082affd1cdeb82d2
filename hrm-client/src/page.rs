//! Resource page state machine
//!
//! A [`ResourcePage`] is the UI-local half of a list/detail screen. It holds
//! only a pointer to the selected record, the edit draft and the list query;
//! the records themselves stay in the [`ResourceStore`].
//!
//! ```text
//!            select                begin_edit
//!   Idle ─────────────▶ Selected ─────────────▶ Editing ──┐ set_field
//!     ▲                   │  ▲                    │ ▲ ◀───┘
//!     │ delete_selected   │  └── save / cancel ───┘ │
//!     └───────────────────┘                         └── save: no changes / error
//! ```
//!
//! The view mode is orthogonal to all of the above.

use serde_json::Value;
use shared::message::NotificationLevel;
use shared::request::ListQuery;
use shared::resource::Resource;
use shared::response::PaginationMeta;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use crate::diff::{self, EditDraft};
use crate::header::{HeaderContent, HeaderOutlet, HeaderSlot};
use crate::http::HttpClient;
use crate::store::{FetchOutcome, ResourceStore};
use crate::{ClientError, ClientResult};

/// How the collection is rendered
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ViewMode {
    /// Card grid
    Dashboard,
    /// Flat table
    #[default]
    List,
    /// List with the detail panel
    Detail,
}

/// User-facing notification raised by a page action
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub level: NotificationLevel,
    pub message: String,
}

impl Toast {
    fn new(level: NotificationLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }
}

/// Result of [`ResourcePage::save`]
#[derive(Debug, Clone, PartialEq)]
pub enum SaveOutcome<R> {
    /// The draft matched the selection; nothing was sent
    NoChanges,
    /// The patch was accepted; carries the new selection
    Saved(R),
}

pub const MSG_NO_CHANGES: &str = "No changes to save";
pub const MSG_UPDATED: &str = "Updated successfully";
pub const MSG_UPDATE_FAILED: &str = "Update failed";
pub const MSG_CREATED: &str = "Created successfully";
pub const MSG_CREATE_FAILED: &str = "Create failed";
pub const MSG_DELETED: &str = "Deleted successfully";
pub const MSG_DELETE_FAILED: &str = "Delete failed";
pub const MSG_LOAD_FAILED: &str = "Could not load the latest data";

/// List/detail/dashboard screen bound to one store
pub struct ResourcePage<R: Resource, C: HttpClient> {
    store: Arc<ResourceStore<R, C>>,
    view_mode: ViewMode,
    selected: Option<R>,
    editing: Option<EditDraft>,
    query: ListQuery,
    toasts: Vec<Toast>,
    lifecycle: CancellationToken,
    header: Option<HeaderSlot>,
    title: Option<String>,
}

impl<R: Resource, C: HttpClient> ResourcePage<R, C> {
    pub fn new(store: Arc<ResourceStore<R, C>>) -> Self {
        Self::with_query(store, ListQuery::default())
    }

    pub fn with_query(store: Arc<ResourceStore<R, C>>, query: ListQuery) -> Self {
        Self {
            store,
            view_mode: ViewMode::default(),
            selected: None,
            editing: None,
            query,
            toasts: Vec::new(),
            lifecycle: CancellationToken::new(),
            header: None,
            title: None,
        }
    }

    /// Restore the list state from a URL query string (`current=2&pageSize=20&q=an`)
    pub fn from_query_string(store: Arc<ResourceStore<R, C>>, query_string: &str) -> Self {
        Self::with_query(store, parse_query_string(query_string))
    }

    /// URL query string reproducing the current list state
    pub fn query_string(&self) -> String {
        encode_query_string(&self.query.to_pairs())
    }

    pub fn query(&self) -> &ListQuery {
        &self.query
    }

    pub fn store(&self) -> &Arc<ResourceStore<R, C>> {
        &self.store
    }

    // ========== Header ==========

    /// Claim the layout header; it shows the record total after each refresh
    pub fn attach_header(&mut self, outlet: &HeaderOutlet, title: impl Into<String>) {
        let title = title.into();
        let slot = outlet.mount();
        slot.set(HeaderContent::new().with_title(title.clone()));
        self.header = Some(slot);
        self.title = Some(title);
    }

    async fn publish_header(&self) {
        let Some(slot) = &self.header else {
            return;
        };
        let mut content = HeaderContent::total_records(self.store.meta().await.total);
        content.title = self.title.clone();
        slot.set(content);
    }

    // ========== View ==========

    pub fn view_mode(&self) -> ViewMode {
        self.view_mode
    }

    /// Switch rendering; never touches data and never issues a request
    pub fn set_view_mode(&mut self, mode: ViewMode) {
        self.view_mode = mode;
    }

    pub async fn records(&self) -> Vec<R> {
        self.store.records().await
    }

    pub async fn meta(&self) -> PaginationMeta {
        self.store.meta().await
    }

    pub fn is_loading(&self) -> bool {
        self.store.is_loading()
    }

    // ========== Selection and editing ==========

    pub fn selected(&self) -> Option<&R> {
        self.selected.as_ref()
    }

    pub fn is_editing(&self) -> bool {
        self.editing.is_some()
    }

    pub fn draft(&self) -> Option<&EditDraft> {
        self.editing.as_ref()
    }

    /// Select a record of the held page by id. Returns `false` if it is not held.
    pub async fn select(&mut self, id: &str) -> bool {
        match self.store.get(id).await {
            Some(record) => {
                self.select_record(record);
                true
            }
            None => false,
        }
    }

    pub fn select_record(&mut self, record: R) {
        self.selected = Some(record);
        self.editing = None;
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
        self.editing = None;
    }

    /// Snapshot the selection into an edit draft
    pub fn begin_edit(&mut self) -> ClientResult<()> {
        let selected = self
            .selected
            .as_ref()
            .ok_or_else(|| ClientError::InvalidState("nothing selected".into()))?;
        self.editing = Some(diff::to_object(selected)?);
        Ok(())
    }

    /// Change one field of the draft; the store is not called
    pub fn set_field(&mut self, field: &str, value: impl Into<Value>) -> ClientResult<()> {
        if diff::EXCLUDED_FIELDS.contains(&field) {
            return Err(ClientError::InvalidState(format!("{field} is read-only")));
        }
        let draft = self
            .editing
            .as_mut()
            .ok_or_else(|| ClientError::InvalidState("not editing".into()))?;
        draft.insert(field.to_string(), value.into());
        Ok(())
    }

    /// Drop a field from the draft so it is left out of the patch
    pub fn unset_field(&mut self, field: &str) -> ClientResult<()> {
        let draft = self
            .editing
            .as_mut()
            .ok_or_else(|| ClientError::InvalidState("not editing".into()))?;
        draft.remove(field);
        Ok(())
    }

    /// Discard the draft without calling the store
    pub fn cancel_edit(&mut self) {
        self.editing = None;
    }

    /// Send the changed fields of the draft.
    ///
    /// An empty diff raises an info toast and stays in edit mode. A draft
    /// that no longer forms a valid record is rejected before any request.
    /// A failure raises an error toast and keeps the draft for a retry.
    pub async fn save(&mut self) -> ClientResult<SaveOutcome<R>> {
        let (Some(selected), Some(draft)) = (&self.selected, &self.editing) else {
            return Err(ClientError::InvalidState("not editing".into()));
        };

        let original = diff::to_object(selected)?;
        let patch = diff::compute_patch(&original, draft);
        if patch.is_empty() {
            self.toast(NotificationLevel::Info, MSG_NO_CHANGES);
            return Ok(SaveOutcome::NoChanges);
        }

        let candidate: R = match diff::apply(selected, &patch) {
            Ok(candidate) => candidate,
            Err(e) => {
                let err = ClientError::Validation(e.to_string());
                tracing::debug!(resource = R::NAME, id = selected.id(), error = %e, "Draft rejected");
                self.toast(NotificationLevel::Error, err.user_message(MSG_UPDATE_FAILED));
                return Err(err);
            }
        };

        let id = selected.id().to_string();
        let result = self.store.update(&id, &patch).await;
        let merged = match result {
            Ok(merged) => merged,
            Err(e) => {
                tracing::warn!(resource = R::NAME, id = %id, error = %e, "Save failed");
                self.toast(NotificationLevel::Error, e.user_message(MSG_UPDATE_FAILED));
                return Err(e);
            }
        };

        let updated = merged.unwrap_or(candidate);
        self.selected = Some(updated.clone());
        self.editing = None;
        self.toast(NotificationLevel::Success, MSG_UPDATED);
        Ok(SaveOutcome::Saved(updated))
    }

    /// Delete the selected record, clear the selection and refetch
    pub async fn delete_selected(&mut self) -> ClientResult<()> {
        let id = self
            .selected
            .as_ref()
            .map(|r| r.id().to_string())
            .ok_or_else(|| ClientError::InvalidState("nothing selected".into()))?;

        let result = self.store.delete(&id).await;
        if let Err(e) = result {
            self.toast(NotificationLevel::Error, e.user_message(MSG_DELETE_FAILED));
            return Err(e);
        }

        self.clear_selection();
        self.toast(NotificationLevel::Success, MSG_DELETED);
        if let Err(e) = self.refresh().await {
            tracing::debug!(resource = R::NAME, error = %e, "Refresh after delete failed");
        }
        Ok(())
    }

    // ========== Create modal ==========

    pub async fn open_create_modal(&self) {
        self.store.set_modal_open(true).await;
    }

    pub async fn close_create_modal(&self) {
        self.store.set_modal_open(false).await;
    }

    /// Submit the create modal; on failure the modal stays open
    pub async fn create(&mut self, payload: &R::Create) -> ClientResult<R> {
        let result = self.store.add(payload).await;
        match result {
            Ok(record) => {
                self.store.set_modal_open(false).await;
                self.toast(NotificationLevel::Success, MSG_CREATED);
                if let Err(e) = self.refresh().await {
                    tracing::debug!(resource = R::NAME, error = %e, "Refresh after create failed");
                }
                Ok(record)
            }
            Err(e) => {
                self.toast(NotificationLevel::Error, e.user_message(MSG_CREATE_FAILED));
                Err(e)
            }
        }
    }

    // ========== List query ==========

    pub async fn set_pagination(&mut self, current: u32, page_size: u32) -> ClientResult<FetchOutcome> {
        self.query.current = current.max(1);
        self.query.page_size = page_size.max(1);
        self.refresh().await
    }

    /// Change the search text and go back to the first page
    pub async fn set_search(&mut self, q: &str) -> ClientResult<FetchOutcome> {
        self.query.set_search(q);
        self.query.current = 1;
        self.refresh().await
    }

    /// Set (or with `None`, remove) a screen filter and go back to the first page
    pub async fn set_filter(&mut self, key: &str, value: Option<&str>) -> ClientResult<FetchOutcome> {
        match value.filter(|v| !v.is_empty()) {
            Some(value) => {
                self.query.filters.insert(key.to_string(), value.to_string());
            }
            None => {
                self.query.filters.remove(key);
            }
        }
        self.query.current = 1;
        self.refresh().await
    }

    /// Fetch the page described by the query.
    ///
    /// Abandoned, without touching the store, when the page unmounts first.
    pub async fn refresh(&mut self) -> ClientResult<FetchOutcome> {
        if self.lifecycle.is_cancelled() {
            return Err(ClientError::Cancelled);
        }

        let result = tokio::select! {
            biased;
            _ = self.lifecycle.cancelled() => Err(ClientError::Cancelled),
            result = self.store.fetch(&self.query) => result,
        };

        match &result {
            Ok(FetchOutcome::Applied) => self.publish_header().await,
            Ok(_) => {}
            Err(ClientError::Cancelled) => {
                tracing::debug!(resource = R::NAME, "Refresh cancelled by unmount");
            }
            Err(e) => {
                tracing::warn!(resource = R::NAME, error = %e, "Refresh failed");
                self.toast(NotificationLevel::Warning, e.user_message(MSG_LOAD_FAILED));
            }
        }
        result
    }

    // ========== Lifecycle ==========

    /// Token cancelled when the page unmounts
    pub fn lifecycle(&self) -> CancellationToken {
        self.lifecycle.clone()
    }

    pub fn is_mounted(&self) -> bool {
        !self.lifecycle.is_cancelled()
    }

    /// Cancel pending refreshes and release the header
    pub fn unmount(&mut self) {
        self.lifecycle.cancel();
        self.header = None;
        self.editing = None;
    }

    // ========== Toasts ==========

    fn toast(&mut self, level: NotificationLevel, message: impl Into<String>) {
        self.toasts.push(Toast::new(level, message));
    }

    pub fn toasts(&self) -> &[Toast] {
        &self.toasts
    }

    /// Take every toast raised since the last drain
    pub fn drain_toasts(&mut self) -> Vec<Toast> {
        std::mem::take(&mut self.toasts)
    }
}

impl<R: Resource, C: HttpClient> Drop for ResourcePage<R, C> {
    fn drop(&mut self) {
        self.lifecycle.cancel();
    }
}

fn parse_query_string(query_string: &str) -> ListQuery {
    let query_string = query_string.trim_start_matches('?');
    let pairs = query_string
        .split('&')
        .filter(|part| !part.is_empty())
        .map(|part| {
            let (key, value) = part.split_once('=').unwrap_or((part, ""));
            (decode_component(key), decode_component(value))
        });
    ListQuery::from_pairs(pairs)
}

fn encode_query_string(pairs: &[(String, String)]) -> String {
    pairs
        .iter()
        .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&")
}

/// Decode one query component; `+` is a space in form-encoded strings
fn decode_component(input: &str) -> String {
    let spaced = input.replace('+', " ");
    String::from_utf8_lossy(&urlencoding::decode_binary(spaced.as_bytes())).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_string_roundtrip() {
        let query = parse_query_string("?current=2&pageSize=20&q=nguyen+van&status=1");
        assert_eq!(query.current, 2);
        assert_eq!(query.page_size, 20);
        assert_eq!(query.q.as_deref(), Some("nguyen van"));
        assert_eq!(query.filter("status"), Some("1"));

        let encoded = encode_query_string(&query.to_pairs());
        assert_eq!(encoded, "current=2&pageSize=20&q=nguyen%20van&status=1");
        assert_eq!(parse_query_string(&encoded), query);
    }

    #[test]
    fn test_component_decoding() {
        assert_eq!(decode_component("L%C3%AA+Anh+%26+co"), "Lê Anh & co");
        assert_eq!(decode_component("L%C3%AA%20Anh"), "Lê Anh");
        assert_eq!(decode_component("100%"), "100%");
        assert_eq!(decode_component("%zz"), "%zz");
    }

    #[test]
    fn test_reserved_characters_survive_roundtrip() {
        let query = ListQuery::new(1, 10)
            .with_search("Lê & co = 100%")
            .with_filter("courseId", "k1/2");
        let encoded = encode_query_string(&query.to_pairs());
        assert!(encoded.contains("q=L%C3%AA%20%26%20co%20%3D%20100%25"));
        assert_eq!(parse_query_string(&encoded), query);
    }

    #[test]
    fn test_bad_numbers_fall_back() {
        let query = parse_query_string("current=abc&pageSize=0");
        assert_eq!(query.current, 1);
        assert!(query.page_size >= 1);
    }
}
