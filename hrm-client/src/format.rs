//! Display formatting
//!
//! Amounts are exact `Decimal`s in memory and raw numbers on the wire; these
//! helpers only produce what the screens show. Dates always travel as
//! `YYYY-MM-DD`.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use rust_decimal::prelude::*;

pub const API_DATE_FORMAT: &str = "%Y-%m-%d";

/// Default currency suffix
pub const DEFAULT_CURRENCY: &str = "VND";

/// Thousands-grouped amount with a currency suffix, e.g. `12,500,000 VND`.
///
/// Fractions are rounded half away from zero to whole units; negative
/// amounts keep a leading `-`.
pub fn format_money(amount: Decimal, currency: &str) -> String {
    let rounded = amount.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    let negative = rounded.is_sign_negative() && !rounded.is_zero();
    let digits = rounded.abs().trunc().to_string();

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if negative { "-" } else { "" };
    if currency.is_empty() {
        format!("{sign}{grouped}")
    } else {
        format!("{sign}{grouped} {currency}")
    }
}

/// `YYYY-MM-DD` form sent to the backend
pub fn format_api_date(date: NaiveDate) -> String {
    date.format(API_DATE_FORMAT).to_string()
}

/// Date part of `YYYY-MM-DD` or a full ISO-8601 date-time
pub fn parse_api_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if let Ok(date) = NaiveDate::parse_from_str(value, API_DATE_FORMAT) {
        return Some(date);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.date_naive());
    }
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|dt| dt.date())
}
