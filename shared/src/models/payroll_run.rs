//! Payroll Run Model
//!
//! Amounts are computed by the backend; the client only displays them.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::enums::PayrollStatus;

/// Monthly payroll run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayrollRun {
    pub id: String,
    /// Period in `YYYY-MM` form
    pub period: String,
    pub status: PayrollStatus,
    #[serde(default)]
    pub employee_count: u32,
    #[serde(default, with = "rust_decimal::serde::float")]
    pub total_gross: Decimal,
    #[serde(default, with = "rust_decimal::serde::float")]
    pub total_net: Decimal,
    pub note: Option<String>,
}

/// Create payroll run payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayrollRunCreate {
    pub period: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

crate::impl_resource!(PayrollRun, PayrollRunCreate, "PayrollRun", "payrollRunChanged");
