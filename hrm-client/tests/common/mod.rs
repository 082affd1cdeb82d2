// hrm-client/tests/common/mod.rs
// Fixtures shared by the integration tests

#![allow(dead_code)]

use hrm_client::{InMemoryHttpClient, ResourceStore};
use shared::models::Department;
use std::sync::Arc;

pub type Backend = Arc<InMemoryHttpClient>;
pub type Departments = Arc<ResourceStore<Department, InMemoryHttpClient>>;

pub fn department(i: usize) -> Department {
    Department {
        id: format!("d{i:02}"),
        name: format!("Department {i:02}"),
        description: Some(format!("Description of department {i:02}")),
        manager_id: None,
        manager_name: None,
        employee_count: Some(i as u32),
    }
}

/// Backend holding `count` departments d01..
pub async fn department_backend(count: usize) -> Backend {
    let http = Arc::new(InMemoryHttpClient::new());
    let rows: Vec<Department> = (1..=count).map(department).collect();
    http.seed(&rows).await.unwrap();
    http
}

pub fn department_store(http: &Backend) -> Departments {
    Arc::new(ResourceStore::new(http.clone()))
}
