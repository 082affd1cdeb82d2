//! User Account Model

use serde::{Deserialize, Serialize};

/// Login account (without password)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub username: String,
    /// Role reference (String ID)
    pub role_id: String,
    pub employee_id: Option<String>,
    #[serde(default = "default_active")]
    pub is_active: bool,
    /// Joined server-side, display only
    #[serde(default)]
    pub role_name: Option<String>,
}

fn default_active() -> bool {
    true
}

/// Create user payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserCreate {
    pub username: String,
    pub password: String,
    /// Role reference (String ID)
    pub role_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub employee_id: Option<String>,
}

crate::impl_resource!(User, UserCreate, "User", "userChanged");
