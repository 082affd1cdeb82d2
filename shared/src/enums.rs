//! Integer-coded enumerations and their display labels
//!
//! The backend transmits small enumerations as their ordinal. These tables
//! are the only place the ordinal/label mapping is written down; views call
//! [`EnumLabel::label`] and dropdowns call [`EnumLabel::options`].

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Ordinal not present in an enum table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("unknown {kind} ordinal: {value}")]
pub struct UnknownOrdinal {
    pub kind: &'static str,
    pub value: u8,
}

/// Label table access shared by every coded enum
pub trait EnumLabel: Sized + Copy + 'static {
    /// Every variant in ordinal order
    const ALL: &'static [Self];

    fn ordinal(self) -> u8;

    fn label(self) -> &'static str;

    /// `(ordinal, label)` pairs for dropdowns
    fn options() -> Vec<(u8, &'static str)> {
        Self::ALL.iter().map(|v| (v.ordinal(), v.label())).collect()
    }
}

macro_rules! coded_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $kind:literal {
            $($variant:ident = $value:literal => $label:literal,)+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(into = "u8", try_from = "u8")]
        #[repr(u8)]
        pub enum $name {
            $($variant = $value,)+
        }

        impl EnumLabel for $name {
            const ALL: &'static [Self] = &[$(Self::$variant,)+];

            fn ordinal(self) -> u8 {
                self as u8
            }

            fn label(self) -> &'static str {
                match self {
                    $(Self::$variant => $label,)+
                }
            }
        }

        impl From<$name> for u8 {
            fn from(value: $name) -> u8 {
                value as u8
            }
        }

        impl TryFrom<u8> for $name {
            type Error = UnknownOrdinal;

            fn try_from(value: u8) -> Result<Self, Self::Error> {
                match value {
                    $($value => Ok(Self::$variant),)+
                    _ => Err(UnknownOrdinal { kind: $kind, value }),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        }
    };
}

coded_enum! {
    /// Employment contract type
    ContractType, "contract type" {
        Probation = 0 => "Probation",
        FixedTerm = 1 => "Fixed term",
        Indefinite = 2 => "Indefinite",
        Seasonal = 3 => "Seasonal",
    }
}

coded_enum! {
    /// Working arrangement
    WorkType, "work type" {
        FullTime = 0 => "Full-time",
        PartTime = 1 => "Part-time",
        Remote = 2 => "Remote",
        Internship = 3 => "Internship",
    }
}

coded_enum! {
    /// Employee lifecycle status
    EmployeeStatus, "employee status" {
        Active = 0 => "Active",
        OnLeave = 1 => "On leave",
        Resigned = 2 => "Resigned",
        Terminated = 3 => "Terminated",
    }
}

coded_enum! {
    /// Contract lifecycle status
    ContractStatus, "contract status" {
        Draft = 0 => "Draft",
        Active = 1 => "Active",
        Expired = 2 => "Expired",
        Terminated = 3 => "Terminated",
    }
}

coded_enum! {
    /// Reward or penalty
    RewardPenaltyKind, "reward/penalty kind" {
        Reward = 0 => "Reward",
        Penalty = 1 => "Penalty",
    }
}

coded_enum! {
    /// Organisational level a reward/penalty was decided at
    RewardPenaltyLevel, "reward/penalty level" {
        Company = 0 => "Company",
        Department = 1 => "Department",
        Team = 2 => "Team",
    }
}

coded_enum! {
    /// Form a reward/penalty takes
    RewardPenaltyForm, "reward/penalty form" {
        Commendation = 0 => "Commendation",
        Cash = 1 => "Cash",
        Warning = 2 => "Warning",
        SalaryDeduction = 3 => "Salary deduction",
        Dismissal = 4 => "Dismissal",
    }
}

coded_enum! {
    /// Approval state of a request (overtime, leave)
    RequestStatus, "request status" {
        Pending = 0 => "Pending",
        Approved = 1 => "Approved",
        Rejected = 2 => "Rejected",
    }
}

coded_enum! {
    /// Payroll run state
    PayrollStatus, "payroll status" {
        Draft = 0 => "Draft",
        Calculated = 1 => "Calculated",
        Finalized = 2 => "Finalized",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_as_ordinal() {
        assert_eq!(serde_json::to_value(ContractType::Indefinite).unwrap(), 2);
        let form: RewardPenaltyForm = serde_json::from_value(serde_json::json!(3)).unwrap();
        assert_eq!(form, RewardPenaltyForm::SalaryDeduction);
    }

    #[test]
    fn test_unknown_ordinal_is_rejected() {
        let err = WorkType::try_from(9).unwrap_err();
        assert_eq!(err.kind, "work type");
        assert!(serde_json::from_value::<WorkType>(serde_json::json!(9)).is_err());
    }

    #[test]
    fn test_options_follow_ordinal_order() {
        let options = RewardPenaltyKind::options();
        assert_eq!(options, vec![(0, "Reward"), (1, "Penalty")]);
    }

    #[test]
    fn test_tables_are_dense() {
        fn check<E: EnumLabel>() {
            for (index, variant) in E::ALL.iter().enumerate() {
                assert_eq!(variant.ordinal() as usize, index);
            }
        }
        check::<ContractType>();
        check::<WorkType>();
        check::<EmployeeStatus>();
        check::<ContractStatus>();
        check::<RewardPenaltyKind>();
        check::<RewardPenaltyLevel>();
        check::<RewardPenaltyForm>();
        check::<RequestStatus>();
        check::<PayrollStatus>();
    }

    #[test]
    fn test_display_uses_label() {
        assert_eq!(EmployeeStatus::OnLeave.to_string(), "On leave");
    }
}
