//! HRM Client - client core for the HR administration console
//!
//! Every entity screen of the console follows the same pattern: a
//! [`ResourceStore`] owns the current page of one entity kind, a
//! [`ResourcePage`] drives the list/detail/edit state of the screen, and the
//! layout header is fed through a [`HeaderOutlet`]. Out-of-band changes
//! arrive on the push channel and are applied by the [`RealtimeHub`].
//!
//! # Example
//!
//! ```ignore
//! use hrm_client::{ClientConfig, NetworkHttpClient, ResourcePage, SessionContext};
//! use hrm_client::stores::DepartmentStore;
//!
//! let config = ClientConfig::from_env()?;
//! let session = SessionContext::new();
//! let http = Arc::new(NetworkHttpClient::new(&config, session.clone())?);
//! let store = Arc::new(DepartmentStore::from_config(http, &config));
//!
//! let mut page = ResourcePage::from_query_string(store, "current=1&pageSize=10");
//! page.refresh().await?;
//! ```

pub mod config;
pub mod diff;
pub mod error;
pub mod format;
pub mod header;
pub mod http;
pub mod logging;
#[cfg(feature = "in-memory")]
pub mod memory;
pub mod page;
pub mod realtime;
pub mod session;
pub mod store;
pub mod stores;

pub use config::{ClientConfig, ConfigError};
pub use diff::{EditDraft, Patch};
pub use error::{ClientError, ClientResult};
pub use header::{HeaderContent, HeaderItem, HeaderOutlet, HeaderSlot};
pub use http::{HttpClient, NetworkHttpClient};
#[cfg(feature = "in-memory")]
pub use memory::InMemoryHttpClient;
pub use page::{ResourcePage, SaveOutcome, Toast, ViewMode};
pub use realtime::{MessageError, PushClient, RealtimeHub};
pub use session::SessionContext;
pub use store::{
    ChangeSink, FetchOutcome, InsertPosition, ReadErrorPolicy, ResourceStore, StoreSnapshot,
};

// Re-export shared types for convenience
pub use shared::client::Session;
pub use shared::message::{BusMessage, ChangeAction, NotificationLevel, SyncPayload};
pub use shared::request::ListQuery;
pub use shared::resource::{Resource, SelectOption};
pub use shared::response::PaginationMeta;
