//! Salary Configuration Model

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Salary parameters used by the backend payroll computation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalaryConfig {
    pub id: String,
    pub name: String,
    /// Statutory base salary (raw amount)
    #[serde(with = "rust_decimal::serde::float")]
    pub base_amount: Decimal,
    /// Overtime pay multiplier
    pub overtime_rate: f64,
    /// Insurance contribution rate, 0..1
    pub insurance_rate: f64,
    pub effective_from: NaiveDate,
}

/// Create salary configuration payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalaryConfigCreate {
    pub name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub base_amount: Decimal,
    pub overtime_rate: f64,
    pub insurance_rate: f64,
    pub effective_from: NaiveDate,
}

crate::impl_resource!(
    SalaryConfig,
    SalaryConfigCreate,
    "SalaryConfig",
    "salaryConfigChanged"
);
