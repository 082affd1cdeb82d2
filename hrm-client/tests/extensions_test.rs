// hrm-client/tests/extensions_test.rs
// Entity-specific store helpers

use chrono::NaiveDate;
use hrm_client::memory::Operation;
use hrm_client::stores::{
    ContractStore, EmployeeStore, NotificationStore, OvertimeStore, RewardPenaltyStore,
    TrainingRecordStore,
};
use hrm_client::{InMemoryHttpClient, ListQuery};
use rust_decimal::Decimal;
use shared::enums::{
    ContractStatus, ContractType, EmployeeStatus, RequestStatus, RewardPenaltyForm,
    RewardPenaltyKind, RewardPenaltyLevel, WorkType,
};
use shared::models::{Contract, Employee, Notification, Overtime, RewardPenalty, TrainingRecord};
use std::sync::Arc;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn employee(id: &str, department_id: Option<&str>) -> Employee {
    Employee {
        id: id.into(),
        code: id.to_uppercase(),
        full_name: format!("Employee {id}"),
        email: format!("{id}@example.com"),
        phone: None,
        gender: None,
        date_of_birth: None,
        address: None,
        department_id: department_id.map(Into::into),
        position_id: None,
        work_type: WorkType::FullTime,
        status: EmployeeStatus::Active,
        hire_date: Some(date(2024, 3, 1)),
        avatar_url: None,
        department_name: None,
        position_name: None,
    }
}

fn contract(id: &str, end_date: Option<NaiveDate>) -> Contract {
    Contract {
        id: id.into(),
        employee_id: "e1".into(),
        contract_type: ContractType::FixedTerm,
        status: ContractStatus::Active,
        start_date: date(2025, 1, 1),
        end_date,
        base_salary: Decimal::from(15_000_000),
        note: None,
        employee_name: None,
    }
}

fn decision(id: &str, kind: RewardPenaltyKind) -> RewardPenalty {
    RewardPenalty {
        id: id.into(),
        employee_id: "e1".into(),
        kind,
        level: RewardPenaltyLevel::Company,
        form: RewardPenaltyForm::Cash,
        reason: "Quarterly review".into(),
        amount: Some(Decimal::from(500_000)),
        decision_date: date(2026, 6, 30),
        employee_name: None,
    }
}

fn notification(id: &str, is_read: bool) -> Notification {
    Notification {
        id: id.into(),
        title: format!("Notice {id}"),
        content: "Payroll is ready".into(),
        recipient_id: Some("u1".into()),
        is_read,
        created_at: Some("2026-10-01T08:00:00Z".into()),
    }
}

#[tokio::test]
async fn test_employees_by_department() {
    let http = Arc::new(InMemoryHttpClient::new());
    http.seed(&[
        employee("e1", Some("d1")),
        employee("e2", Some("d2")),
        employee("e3", Some("d1")),
        employee("e4", None),
    ])
    .await
    .unwrap();
    let store = EmployeeStore::new(http.clone());
    store.fetch(&ListQuery::default()).await.unwrap();

    let ids: Vec<String> = store
        .by_department("d1")
        .await
        .into_iter()
        .map(|e| e.id)
        .collect();
    assert_eq!(ids, vec!["e1", "e3"]);
}

#[tokio::test]
async fn test_contracts_expiring_within() {
    let http = Arc::new(InMemoryHttpClient::new());
    http.seed(&[
        contract("c1", Some(date(2026, 10, 20))),
        contract("c2", Some(date(2026, 12, 31))),
        contract("c3", Some(date(2026, 10, 1))),
        contract("c4", None),
        contract("c5", Some(date(2026, 10, 17))),
    ])
    .await
    .unwrap();
    let store = ContractStore::new(http.clone());
    store.fetch(&ListQuery::default()).await.unwrap();

    let ids: Vec<String> = store
        .expiring_within(30, date(2026, 10, 17))
        .await
        .into_iter()
        .map(|c| c.id)
        .collect();
    // ended contracts and open-ended ones are excluded
    assert_eq!(ids, vec!["c1", "c5"]);
}

#[tokio::test]
async fn test_reward_penalty_kind_filters() {
    let http = Arc::new(InMemoryHttpClient::new());
    http.seed(&[
        decision("r1", RewardPenaltyKind::Reward),
        decision("r2", RewardPenaltyKind::Penalty),
        decision("r3", RewardPenaltyKind::Reward),
    ])
    .await
    .unwrap();
    let store = RewardPenaltyStore::new(http.clone());

    store.fetch(&ListQuery::default()).await.unwrap();
    assert_eq!(store.filter_by_kind(RewardPenaltyKind::Reward).await.len(), 2);

    store
        .fetch_kind(RewardPenaltyKind::Penalty, &ListQuery::default())
        .await
        .unwrap();
    let request = http.requests_of(Operation::List).await.pop().unwrap();
    assert_eq!(request.param("kind"), Some("1"));
    assert_eq!(store.meta().await.total, 1);
    assert_eq!(store.records().await[0].id, "r2");
}

#[tokio::test]
async fn test_notifications_unread_and_mark_read() {
    let http = Arc::new(InMemoryHttpClient::new());
    http.seed(&[
        notification("n1", false),
        notification("n2", true),
        notification("n3", false),
    ])
    .await
    .unwrap();
    let store = NotificationStore::new(http.clone());
    store.fetch(&ListQuery::default()).await.unwrap();
    assert_eq!(store.unread_count().await, 2);

    let read = store.mark_read("n1").await.unwrap().unwrap();
    assert!(read.is_read);
    assert_eq!(store.unread_count().await, 1);

    let update = http.requests_of(Operation::Update).await.pop().unwrap();
    assert_eq!(update.body, Some(serde_json::json!({ "isRead": true })));

    store.fetch_unread(&ListQuery::default()).await.unwrap();
    let request = http.requests_of(Operation::List).await.pop().unwrap();
    assert_eq!(request.param("unread"), Some("true"));
}

#[tokio::test]
async fn test_training_records_for_course() {
    let http = Arc::new(InMemoryHttpClient::new());
    let record = |id: &str, course_id: &str| TrainingRecord {
        id: id.into(),
        course_id: course_id.into(),
        employee_id: "e1".into(),
        completed: false,
        score: None,
        feedback: None,
        employee_name: None,
        course_title: None,
    };
    http.seed(&[record("t1", "k1"), record("t2", "k2"), record("t3", "k1")])
        .await
        .unwrap();
    let store = TrainingRecordStore::new(http.clone());

    store
        .fetch_for_course("k1", &ListQuery::new(1, 10))
        .await
        .unwrap();

    let request = http.requests_of(Operation::List).await.pop().unwrap();
    assert_eq!(request.param("courseId"), Some("k1"));
    assert_eq!(store.meta().await.total, 2);
}

#[tokio::test]
async fn test_overtime_by_status() {
    let http = Arc::new(InMemoryHttpClient::new());
    let request = |id: &str, status: RequestStatus| Overtime {
        id: id.into(),
        employee_id: "e1".into(),
        date: date(2026, 9, 12),
        hours: 2.5,
        reason: None,
        status,
        employee_name: None,
    };
    http.seed(&[
        request("o1", RequestStatus::Pending),
        request("o2", RequestStatus::Approved),
        request("o3", RequestStatus::Pending),
    ])
    .await
    .unwrap();
    let store = OvertimeStore::new(http.clone());

    store
        .fetch_by_status(RequestStatus::Pending, &ListQuery::default())
        .await
        .unwrap();

    let sent = http.requests_of(Operation::List).await.pop().unwrap();
    assert_eq!(sent.param("status"), Some("0"));
    let ids: Vec<String> = store.records().await.into_iter().map(|o| o.id).collect();
    assert_eq!(ids, vec!["o1", "o3"]);
}
