//! HR resource models
//!
//! Wire shapes of every entity the console manages. Field names follow the
//! backend's camelCase JSON; ids are opaque backend-assigned strings.
//! Fields documented as "display only" are joined server-side and are never
//! the source of truth.

pub mod contract;
pub mod course;
pub mod department;
pub mod employee;
pub mod notification;
pub mod overtime;
pub mod payroll_run;
pub mod position;
pub mod reward_penalty;
pub mod role;
pub mod salary_config;
pub mod shift_template;
pub mod training_record;
pub mod user;

// Re-exports
pub use contract::*;
pub use course::*;
pub use department::*;
pub use employee::*;
pub use notification::*;
pub use overtime::*;
pub use payroll_run::*;
pub use position::*;
pub use reward_penalty::*;
pub use role::*;
pub use salary_config::*;
pub use shift_template::*;
pub use training_record::*;
pub use user::*;
