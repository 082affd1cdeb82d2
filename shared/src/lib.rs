//! Shared types for the HR console
//!
//! Wire types used by the client core and any other consumer of the HR
//! backend: resource models, integer-coded enumerations, the list query,
//! response envelopes, push channel messages and session values.

pub mod client;
pub mod enums;
pub mod message;
pub mod models;
pub mod request;
pub mod resource;
pub mod response;

// Re-exports
pub use serde::{Deserialize, Serialize};

pub use client::Session;
pub use enums::EnumLabel;
pub use message::{BusMessage, ChangeAction, EventType, NotificationLevel, SyncPayload};
pub use request::ListQuery;
pub use resource::{Resource, SelectOption};
pub use response::{ListPage, PaginationMeta};
