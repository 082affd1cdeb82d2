//! Shift Template Model

use serde::{Deserialize, Serialize};

/// Reusable shift definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShiftTemplate {
    pub id: String,
    pub name: String,
    /// `HH:MM`
    pub start_time: String,
    /// `HH:MM`
    pub end_time: String,
    #[serde(default)]
    pub break_minutes: u32,
}

/// Create shift template payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShiftTemplateCreate {
    pub name: String,
    pub start_time: String,
    pub end_time: String,
    #[serde(default)]
    pub break_minutes: u32,
}

crate::impl_resource!(
    ShiftTemplate,
    ShiftTemplateCreate,
    "ShiftTemplate",
    "shiftTemplateChanged"
);
