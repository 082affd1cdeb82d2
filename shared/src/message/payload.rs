use serde::{Deserialize, Serialize};
use std::fmt;

// ==================== Notification Level ====================

/// User-facing message severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationLevel {
    /// Informational
    Info,
    /// Operation succeeded
    Success,
    /// Non-blocking problem
    Warning,
    /// Operation failed
    Error,
}

impl fmt::Display for NotificationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Info => write!(f, "info"),
            Self::Success => write!(f, "success"),
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
        }
    }
}

// ==================== Change Action ====================

/// Kind of change announced on the push channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeAction {
    #[serde(alias = "created")]
    Create,
    #[serde(alias = "updated")]
    Update,
    #[serde(alias = "deleted")]
    Delete,
}

impl fmt::Display for ChangeAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Create => write!(f, "create"),
            Self::Update => write!(f, "update"),
            Self::Delete => write!(f, "delete"),
        }
    }
}

// ==================== Payloads ====================

/// Handshake payload (client -> push hub)
///
/// Carries the protocol version and the session's access token so the hub
/// can authorize the subscription.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HandshakePayload {
    /// Protocol version
    pub version: u16,
    /// Client name
    pub client_name: Option<String>,
    /// Client version
    pub client_version: Option<String>,
    /// Bearer token of the current session
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
}

/// Entity change broadcast (push hub -> all clients)
///
/// # Example
/// - `resource`: "employeeChanged"
/// - `action`: "update"
/// - `id`: "e42"
/// - `data`: the changed employee (full or partial)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncPayload {
    /// Event name (`{entity}Changed`)
    pub resource: String,
    /// Monotonic version assigned by the hub
    #[serde(default)]
    pub version: u64,
    /// Change type
    pub action: ChangeAction,
    /// Entity id; falls back to `data.id` when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Entity data (absent for deletes)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl SyncPayload {
    /// The affected entity id, from `id` or `data.id`
    pub fn entity_id(&self) -> Option<&str> {
        self.id
            .as_deref()
            .or_else(|| self.data.as_ref()?.get("id")?.as_str())
    }
}

/// Generic reply payload (push hub -> client)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponsePayload {
    /// Whether the request succeeded
    pub success: bool,
    /// Message or error description
    pub message: String,
    /// Error code (failures only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,
}

impl ResponsePayload {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            error_code: None,
        }
    }

    pub fn error(message: impl Into<String>, code: Option<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            error_code: code,
        }
    }
}
