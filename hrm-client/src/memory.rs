//! In-memory REST backend
//!
//! Requires the `in-memory` feature (on by default).
//!
//! [`InMemoryHttpClient`] answers the same paths and envelopes as the HR
//! backend from a process-local table per resource, so stores and pages can
//! be driven without a server. Tests use it to inject failures and latency
//! and to inspect which requests were issued.

#![cfg(feature = "in-memory")]

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value, json};
use shared::resource::Resource;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::http::{HttpClient, QueryPairs};
use crate::{ClientError, ClientResult};

/// Kind of request received
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    List,
    Create,
    Update,
    Delete,
}

/// A request as the backend saw it
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    pub operation: Operation,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl RecordedRequest {
    /// Value of a query parameter
    pub fn param(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Debug)]
struct InjectedFailure {
    operation: Operation,
    status: u16,
    message: String,
}

#[derive(Debug, Default)]
struct Backend {
    collections: HashMap<String, Vec<Map<String, Value>>>,
    failures: Vec<InjectedFailure>,
    delays: VecDeque<Duration>,
    latency: Duration,
    requests: Vec<RecordedRequest>,
}

/// HTTP client answering from memory
#[derive(Debug, Clone, Default)]
pub struct InMemoryHttpClient {
    backend: Arc<Mutex<Backend>>,
}

impl InMemoryHttpClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the table of `R` with `records`
    pub async fn seed<R: Resource>(&self, records: &[R]) -> ClientResult<()> {
        let rows = records
            .iter()
            .map(crate::diff::to_object)
            .collect::<Result<Vec<_>, _>>()?;
        self.backend
            .lock()
            .await
            .collections
            .insert(R::NAME.to_string(), rows);
        Ok(())
    }

    /// Current server-side rows of `R`
    pub async fn rows<R: Resource>(&self) -> Vec<Value> {
        self.backend
            .lock()
            .await
            .collections
            .get(R::NAME)
            .map(|rows| rows.iter().cloned().map(Value::Object).collect())
            .unwrap_or_default()
    }

    /// The next request of kind `operation` fails with `status`
    pub async fn fail_next(&self, operation: Operation, status: u16, message: impl Into<String>) {
        self.backend.lock().await.failures.push(InjectedFailure {
            operation,
            status,
            message: message.into(),
        });
    }

    /// Delay applied to every request
    pub async fn set_latency(&self, latency: Duration) {
        self.backend.lock().await.latency = latency;
    }

    /// Extra delay for the next request received, whatever its kind
    pub async fn delay_next(&self, delay: Duration) {
        self.backend.lock().await.delays.push_back(delay);
    }

    pub async fn requests(&self) -> Vec<RecordedRequest> {
        self.backend.lock().await.requests.clone()
    }

    pub async fn request_count(&self) -> usize {
        self.backend.lock().await.requests.len()
    }

    /// Requests of one kind, oldest first
    pub async fn requests_of(&self, operation: Operation) -> Vec<RecordedRequest> {
        self.backend
            .lock()
            .await
            .requests
            .iter()
            .filter(|r| r.operation == operation)
            .cloned()
            .collect()
    }

    async fn handle(
        &self,
        operation: Operation,
        path: &str,
        query: &QueryPairs,
        body: Option<Value>,
    ) -> ClientResult<Value> {
        let (result, delay) = {
            let mut backend = self.backend.lock().await;
            backend.requests.push(RecordedRequest {
                operation,
                path: path.to_string(),
                query: query.to_vec(),
                body: body.clone(),
            });
            let delay = backend.latency + backend.delays.pop_front().unwrap_or_default();

            let failure = backend
                .failures
                .iter()
                .position(|f| f.operation == operation)
                .map(|idx| backend.failures.remove(idx));

            let result = match failure {
                Some(f) => Err(ClientError::Api {
                    status: f.status,
                    code: None,
                    message: f.message,
                    details: None,
                }),
                None => backend.respond(operation, path, query, body),
            };
            (result, delay)
        };

        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        result
    }
}

impl Backend {
    fn respond(
        &mut self,
        operation: Operation,
        path: &str,
        query: &QueryPairs,
        body: Option<Value>,
    ) -> ClientResult<Value> {
        let (resource, id) = parse_path(path)?;
        let rows = self.collections.entry(resource.to_string()).or_default();

        match (operation, id) {
            (Operation::List, None) => Ok(list_page(rows, query)),
            (Operation::Create, None) => {
                let mut row = match body {
                    Some(Value::Object(map)) => map,
                    _ => return Err(ClientError::Validation("expected JSON object".into())),
                };
                row.retain(|_, v| !v.is_null());
                row.insert("id".into(), Value::String(Uuid::new_v4().to_string()));
                rows.push(row.clone());
                Ok(json!({ "data": { "data": row } }))
            }
            (Operation::Update, Some(id)) => {
                let patch = match body {
                    Some(Value::Object(map)) => map,
                    _ => return Err(ClientError::Validation("expected JSON object".into())),
                };
                let row = rows
                    .iter_mut()
                    .find(|row| row_id(row) == Some(id))
                    .ok_or_else(|| ClientError::NotFound(format!("{resource} {id}")))?;
                for (key, value) in patch {
                    if key != "id" {
                        row.insert(key, value);
                    }
                }
                Ok(json!({ "data": row.clone() }))
            }
            (Operation::Delete, Some(id)) => {
                let before = rows.len();
                rows.retain(|row| row_id(row) != Some(id));
                if rows.len() == before {
                    return Err(ClientError::NotFound(format!("{resource} {id}")));
                }
                Ok(json!({ "data": null }))
            }
            _ => Err(ClientError::NotFound(path.to_string())),
        }
    }
}

fn parse_path(path: &str) -> ClientResult<(&str, Option<&str>)> {
    let rest = path
        .trim_start_matches('/')
        .strip_prefix("api/")
        .ok_or_else(|| ClientError::NotFound(path.to_string()))?;
    match rest.split_once('/') {
        Some((resource, id)) if !id.is_empty() => Ok((resource, Some(id))),
        _ => Ok((rest.trim_end_matches('/'), None)),
    }
}

fn row_id(row: &Map<String, Value>) -> Option<&str> {
    row.get("id").and_then(Value::as_str)
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn list_page(rows: &[Map<String, Value>], query: &QueryPairs) -> Value {
    let mut current = 1u32;
    let mut page_size = shared::request::DEFAULT_PAGE_SIZE;
    let mut q: Option<String> = None;
    let mut filters = Vec::new();

    for (key, value) in query {
        match key.as_str() {
            "current" => current = value.parse().unwrap_or(1).max(1),
            "pageSize" => page_size = value.parse().unwrap_or(page_size).max(1),
            "q" => q = Some(value.to_lowercase()),
            _ => filters.push((key.as_str(), value.as_str())),
        }
    }

    let matching: Vec<&Map<String, Value>> = rows
        .iter()
        .filter(|row| match &q {
            Some(q) => row
                .values()
                .filter_map(Value::as_str)
                .any(|s| s.to_lowercase().contains(q.as_str())),
            None => true,
        })
        // filters on fields the rows do not carry are ignored
        .filter(|row| {
            filters.iter().all(|(key, value)| match row.get(*key) {
                Some(field) => scalar_text(field).as_deref() == Some(*value),
                None => true,
            })
        })
        .collect();

    let total = matching.len();
    let result: Vec<Value> = matching
        .into_iter()
        .skip((current as usize - 1) * page_size as usize)
        .take(page_size as usize)
        .cloned()
        .map(Value::Object)
        .collect();

    json!({
        "data": [{
            "result": result,
            "meta": { "current": current, "pageSize": page_size, "total": total }
        }]
    })
}

#[async_trait]
impl HttpClient for InMemoryHttpClient {
    async fn get<T: DeserializeOwned>(&self, path: &str, query: &QueryPairs) -> ClientResult<T> {
        let value = self.handle(Operation::List, path, query, None).await?;
        Ok(serde_json::from_value(value)?)
    }

    async fn post<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        let body = serde_json::to_value(body)?;
        let value = self.handle(Operation::Create, path, &[], Some(body)).await?;
        Ok(serde_json::from_value(value)?)
    }

    async fn put<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        let body = serde_json::to_value(body)?;
        let value = self.handle(Operation::Update, path, &[], Some(body)).await?;
        Ok(serde_json::from_value(value)?)
    }

    async fn delete<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        let value = self.handle(Operation::Delete, path, &[], None).await?;
        Ok(serde_json::from_value(value)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(items: &[(&str, &str)]) -> Vec<(String, String)> {
        items
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_parse_path() {
        assert_eq!(parse_path("/api/Department").unwrap(), ("Department", None));
        assert_eq!(
            parse_path("/api/Department/d1").unwrap(),
            ("Department", Some("d1"))
        );
        assert!(parse_path("/health").is_err());
    }

    #[tokio::test]
    async fn test_list_paginates_and_filters() {
        let client = InMemoryHttpClient::new();
        {
            let mut backend = client.backend.lock().await;
            let rows = (0..25)
                .map(|i| {
                    let mut row = Map::new();
                    row.insert("id".into(), json!(format!("r{i}")));
                    row.insert("name".into(), json!(format!("Row {i}")));
                    row.insert("status".into(), json!(i % 2));
                    row
                })
                .collect();
            backend.collections.insert("Thing".into(), rows);
        }

        let body: Value = client
            .get("/api/Thing", &pairs(&[("current", "3"), ("pageSize", "10")]))
            .await
            .unwrap();
        let page = &body["data"][0];
        assert_eq!(page["result"].as_array().unwrap().len(), 5);
        assert_eq!(page["meta"]["total"], 25);

        let body: Value = client
            .get("/api/Thing", &pairs(&[("status", "1"), ("q", "row 1")]))
            .await
            .unwrap();
        // Row 1, 11, 13, 15, 17, 19
        assert_eq!(body["data"][0]["meta"]["total"], 6);
    }

    #[tokio::test]
    async fn test_injected_failure_is_consumed_once() {
        let client = InMemoryHttpClient::new();
        client.fail_next(Operation::List, 503, "maintenance").await;

        let err = client.get::<Value>("/api/Thing", &[]).await.unwrap_err();
        assert!(matches!(err, ClientError::Api { status: 503, .. }));
        assert!(client.get::<Value>("/api/Thing", &[]).await.is_ok());
        assert_eq!(client.request_count().await, 2);
    }
}
