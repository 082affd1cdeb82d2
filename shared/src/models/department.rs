//! Department Model

use serde::{Deserialize, Serialize};

/// Department record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Department {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub manager_id: Option<String>,
    /// Joined server-side, display only
    #[serde(default)]
    pub manager_name: Option<String>,
    /// Computed server-side
    #[serde(default)]
    pub employee_count: Option<u32>,
}

/// Create department payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentCreate {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manager_id: Option<String>,
}

crate::impl_resource!(Department, DepartmentCreate, "Department", "departmentChanged");
