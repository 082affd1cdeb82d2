//! Employee Model

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::enums::{EmployeeStatus, WorkType};

/// Employee record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub id: String,
    /// Staff code (e.g. "EMP-001")
    pub code: String,
    pub full_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub gender: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub address: Option<String>,
    pub department_id: Option<String>,
    pub position_id: Option<String>,
    pub work_type: WorkType,
    pub status: EmployeeStatus,
    pub hire_date: Option<NaiveDate>,
    pub avatar_url: Option<String>,
    /// Joined server-side, display only
    #[serde(default)]
    pub department_name: Option<String>,
    /// Joined server-side, display only
    #[serde(default)]
    pub position_name: Option<String>,
}

/// Create employee payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeCreate {
    pub code: String,
    pub full_name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position_id: Option<String>,
    pub work_type: WorkType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hire_date: Option<NaiveDate>,
}

crate::impl_resource!(Employee, EmployeeCreate, "Employee", "employeeChanged");
