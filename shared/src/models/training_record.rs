//! Training Record Model

use serde::{Deserialize, Serialize};

/// Enrollment of one employee in one course
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainingRecord {
    pub id: String,
    pub course_id: String,
    pub employee_id: String,
    pub completed: bool,
    pub score: Option<f64>,
    pub feedback: Option<String>,
    /// Joined server-side, display only
    #[serde(default)]
    pub employee_name: Option<String>,
    /// Joined server-side, display only
    #[serde(default)]
    pub course_title: Option<String>,
}

/// Create training record payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainingRecordCreate {
    pub course_id: String,
    pub employee_id: String,
}

crate::impl_resource!(
    TrainingRecord,
    TrainingRecordCreate,
    "TrainingRecord",
    "trainingRecordChanged"
);
