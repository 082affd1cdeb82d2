//! Position Model

use serde::{Deserialize, Serialize};

/// Job position
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Position {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    /// Salary coefficient applied server-side
    pub coefficient: Option<f64>,
}

/// Create position payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionCreate {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coefficient: Option<f64>,
}

crate::impl_resource!(Position, PositionCreate, "Position", "positionChanged");
