//! Reward / Penalty Model

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::enums::{RewardPenaltyForm, RewardPenaltyKind, RewardPenaltyLevel};

/// Disciplinary or reward decision
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RewardPenalty {
    pub id: String,
    pub employee_id: String,
    pub kind: RewardPenaltyKind,
    pub level: RewardPenaltyLevel,
    pub form: RewardPenaltyForm,
    pub reason: String,
    /// Monetary amount for cash forms (raw amount)
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub amount: Option<Decimal>,
    pub decision_date: NaiveDate,
    /// Joined server-side, display only
    #[serde(default)]
    pub employee_name: Option<String>,
}

/// Create reward/penalty payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RewardPenaltyCreate {
    pub employee_id: String,
    pub kind: RewardPenaltyKind,
    pub level: RewardPenaltyLevel,
    pub form: RewardPenaltyForm,
    pub reason: String,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "rust_decimal::serde::float_option"
    )]
    pub amount: Option<Decimal>,
    pub decision_date: NaiveDate,
}

crate::impl_resource!(
    RewardPenalty,
    RewardPenaltyCreate,
    "RewardPenalty",
    "rewardPenaltyChanged"
);
