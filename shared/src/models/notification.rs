//! Notification Model

use serde::{Deserialize, Serialize};

/// Announcement or personal notification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: String,
    pub title: String,
    pub content: String,
    /// Recipient, `None` for broadcast announcements
    pub recipient_id: Option<String>,
    #[serde(default)]
    pub is_read: bool,
    /// ISO-8601 timestamp set by the server
    pub created_at: Option<String>,
}

/// Create notification payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationCreate {
    pub title: String,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recipient_id: Option<String>,
}

crate::impl_resource!(
    Notification,
    NotificationCreate,
    "Notification",
    "notificationChanged"
);
