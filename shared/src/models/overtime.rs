//! Overtime Request Model

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::enums::RequestStatus;

/// Overtime request submitted by an employee
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Overtime {
    pub id: String,
    pub employee_id: String,
    pub date: NaiveDate,
    pub hours: f64,
    pub reason: Option<String>,
    pub status: RequestStatus,
    /// Joined server-side, display only
    #[serde(default)]
    pub employee_name: Option<String>,
}

/// Create overtime request payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OvertimeCreate {
    pub employee_id: String,
    pub date: NaiveDate,
    pub hours: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

crate::impl_resource!(Overtime, OvertimeCreate, "Overtime", "overtimeChanged");
