//! Role Model

use serde::{Deserialize, Serialize};

/// Access role
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Role {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    /// Permission strings (e.g. ["*"], ["employee:read", "payroll:write"])
    #[serde(default)]
    pub permissions: Vec<String>,
}

/// Create role payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleCreate {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub permissions: Vec<String>,
}

crate::impl_resource!(Role, RoleCreate, "Role", "roleChanged");
