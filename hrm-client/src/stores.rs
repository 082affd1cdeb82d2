//! Concrete stores
//!
//! Every entity store is a [`ResourceStore`] instantiation. Entity-specific
//! helpers live in inherent impls on the instantiation that needs them.

use chrono::NaiveDate;
use serde_json::{Map, Value};
use shared::enums::{EnumLabel, RequestStatus, RewardPenaltyKind};
use shared::models::{
    Contract, Course, Department, Employee, Notification, Overtime, PayrollRun, Position,
    RewardPenalty, Role, SalaryConfig, ShiftTemplate, TrainingRecord, User,
};
use shared::request::ListQuery;

use crate::ClientResult;
use crate::http::HttpClient;
use crate::store::{FetchOutcome, ResourceStore};

pub type EmployeeStore<C> = ResourceStore<Employee, C>;
pub type DepartmentStore<C> = ResourceStore<Department, C>;
pub type ContractStore<C> = ResourceStore<Contract, C>;
pub type CourseStore<C> = ResourceStore<Course, C>;
pub type NotificationStore<C> = ResourceStore<Notification, C>;
pub type RewardPenaltyStore<C> = ResourceStore<RewardPenalty, C>;
pub type PositionStore<C> = ResourceStore<Position, C>;
pub type RoleStore<C> = ResourceStore<Role, C>;
pub type OvertimeStore<C> = ResourceStore<Overtime, C>;
pub type PayrollRunStore<C> = ResourceStore<PayrollRun, C>;
pub type ShiftTemplateStore<C> = ResourceStore<ShiftTemplate, C>;
pub type TrainingRecordStore<C> = ResourceStore<TrainingRecord, C>;
pub type SalaryConfigStore<C> = ResourceStore<SalaryConfig, C>;
pub type UserStore<C> = ResourceStore<User, C>;

impl<C: HttpClient> ResourceStore<Employee, C> {
    /// Held employees of one department
    pub async fn by_department(&self, department_id: &str) -> Vec<Employee> {
        self.filtered(|e| e.department_id.as_deref() == Some(department_id))
            .await
    }
}

impl<C: HttpClient> ResourceStore<Contract, C> {
    /// Held contracts ending within `days` of `today` (already ended excluded)
    pub async fn expiring_within(&self, days: i64, today: NaiveDate) -> Vec<Contract> {
        self.filtered(|c| {
            c.days_remaining(today)
                .is_some_and(|left| (0..=days).contains(&left))
        })
        .await
    }
}

impl<C: HttpClient> ResourceStore<RewardPenalty, C> {
    /// Held decisions of one kind
    pub async fn filter_by_kind(&self, kind: RewardPenaltyKind) -> Vec<RewardPenalty> {
        self.filtered(|r| r.kind == kind).await
    }

    /// Fetch with the server-side `kind` filter
    pub async fn fetch_kind(
        &self,
        kind: RewardPenaltyKind,
        query: &ListQuery,
    ) -> ClientResult<FetchOutcome> {
        let query = query.clone().with_filter("kind", kind.ordinal().to_string());
        self.fetch(&query).await
    }
}

impl<C: HttpClient> ResourceStore<Notification, C> {
    /// Unread notifications on the held page
    pub async fn unread_count(&self) -> usize {
        self.filtered(|n| !n.is_read).await.len()
    }

    pub async fn fetch_unread(&self, query: &ListQuery) -> ClientResult<FetchOutcome> {
        let query = query.clone().with_filter("unread", "true");
        self.fetch(&query).await
    }

    /// Mark one notification read
    pub async fn mark_read(&self, id: &str) -> ClientResult<Option<Notification>> {
        let mut patch = Map::new();
        patch.insert("isRead".to_string(), Value::Bool(true));
        self.update(id, &patch).await
    }
}

impl<C: HttpClient> ResourceStore<TrainingRecord, C> {
    /// Fetch the participants of one course
    pub async fn fetch_for_course(
        &self,
        course_id: &str,
        query: &ListQuery,
    ) -> ClientResult<FetchOutcome> {
        let query = query.clone().with_filter("courseId", course_id);
        self.fetch(&query).await
    }
}

impl<C: HttpClient> ResourceStore<Overtime, C> {
    pub async fn fetch_by_status(
        &self,
        status: RequestStatus,
        query: &ListQuery,
    ) -> ClientResult<FetchOutcome> {
        let query = query.clone().with_filter("status", status.ordinal().to_string());
        self.fetch(&query).await
    }
}
