//! Offline walk through one console screen
//!
//! Seeds the in-memory backend with departments, then lists, edits and
//! deletes through a `ResourcePage` while printing the layout header.
//!
//! Run: cargo run -p hrm-client --example console_demo

use hrm_client::stores::DepartmentStore;
use hrm_client::{ClientConfig, HeaderOutlet, InMemoryHttpClient, ResourcePage, logging};
use shared::models::Department;
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init("info,hrm_client=debug");

    let config = ClientConfig::from_env()?;
    let http = Arc::new(InMemoryHttpClient::new());
    let rows: Vec<Department> = (1..=34)
        .map(|i| Department {
            id: format!("d{i:02}"),
            name: format!("Department {i:02}"),
            description: None,
            manager_id: None,
            manager_name: None,
            employee_count: Some(i),
        })
        .collect();
    http.seed(&rows).await?;

    let store = Arc::new(DepartmentStore::from_config(http.clone(), &config));
    let outlet = HeaderOutlet::new();
    let mut header = outlet.subscribe();

    let mut page = ResourcePage::from_query_string(store.clone(), "current=1&pageSize=10");
    page.attach_header(&outlet, "Departments");
    page.refresh().await?;

    header.changed().await?;
    println!("header: {:?}", *header.borrow_and_update());
    for department in page.records().await {
        println!("  {} {}", department.id, department.name);
    }

    if page.select("d05").await {
        page.begin_edit()?;
        page.set_field("description", "Handles audits")?;
        page.save().await?;
        page.delete_selected().await?;
    }

    for toast in page.drain_toasts() {
        println!("[{}] {}", toast.level, toast.message);
    }
    println!("total after delete: {}", page.meta().await.total);
    println!("query: {}", page.query_string());

    page.unmount();
    Ok(())
}
