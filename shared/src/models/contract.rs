//! Contract Model

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::enums::{ContractStatus, ContractType};

/// Employment contract
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contract {
    pub id: String,
    pub employee_id: String,
    pub contract_type: ContractType,
    pub status: ContractStatus,
    pub start_date: NaiveDate,
    /// Open-ended contracts have no end date
    pub end_date: Option<NaiveDate>,
    /// Monthly base salary (raw amount)
    #[serde(with = "rust_decimal::serde::float")]
    pub base_salary: Decimal,
    pub note: Option<String>,
    /// Joined server-side, display only
    #[serde(default)]
    pub employee_name: Option<String>,
}

impl Contract {
    /// Days until the contract ends, negative once it has ended
    pub fn days_remaining(&self, today: NaiveDate) -> Option<i64> {
        self.end_date.map(|end| (end - today).num_days())
    }
}

/// Create contract payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractCreate {
    pub employee_id: String,
    pub contract_type: ContractType,
    pub start_date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    #[serde(with = "rust_decimal::serde::float")]
    pub base_salary: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

crate::impl_resource!(Contract, ContractCreate, "Contract", "contractChanged");
