//! Session types shared between the backend and clients
//!
//! The login flow itself lives outside this workspace; these are the values
//! it hands over once a user is authenticated.

use serde::{Deserialize, Serialize};

/// Role name with full administrative access
pub const ADMIN_ROLE: &str = "admin";

/// Authenticated session values
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub access_token: String,
    pub role: String,
    pub username: String,
    pub user_id: String,
    /// Whether the user has replaced the initial password
    #[serde(default)]
    pub has_changed_password: bool,
}

impl Session {
    pub fn is_admin(&self) -> bool {
        self.role.eq_ignore_ascii_case(ADMIN_ROLE)
    }
}

/// Login response data
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub access_token: String,
    pub user: UserInfo,
}

/// User information
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    pub id: String,
    pub username: String,
    pub role: String,
    #[serde(default)]
    pub has_changed_password: bool,
}

impl From<LoginResponse> for Session {
    fn from(resp: LoginResponse) -> Self {
        Self {
            access_token: resp.access_token,
            role: resp.user.role,
            username: resp.user.username,
            user_id: resp.user.id,
            has_changed_password: resp.user.has_changed_password,
        }
    }
}
