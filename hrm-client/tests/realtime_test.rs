// hrm-client/tests/realtime_test.rs
// Push events reconciled into stores

mod common;

use common::{department, department_backend, department_store};
use hrm_client::realtime::transport::{MemoryTransport, read_frame, write_frame};
use hrm_client::{
    BusMessage, ChangeAction, ListQuery, MessageError, PushClient, RealtimeHub, Session,
    SessionContext, SyncPayload,
};
use serde_json::json;
use shared::message::{EventType, HandshakePayload};
use shared::models::DepartmentCreate;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::{broadcast, oneshot};
use tokio_util::sync::CancellationToken;

fn sync(action: ChangeAction, id: &str, data: Option<serde_json::Value>) -> BusMessage {
    BusMessage::sync(&SyncPayload {
        resource: "departmentChanged".into(),
        version: 1,
        action,
        id: Some(id.into()),
        data,
    })
    .unwrap()
}

fn signed_in() -> SessionContext {
    let session = SessionContext::new();
    session.establish(Session {
        access_token: "token-123".into(),
        role: "admin".into(),
        username: "admin".into(),
        user_id: "u1".into(),
        has_changed_password: true,
    });
    session
}

#[tokio::test]
async fn test_dispatch_applies_create_update_delete() {
    let http = department_backend(3).await;
    let store = department_store(&http);
    store.fetch(&ListQuery::new(1, 10)).await.unwrap();

    let mut hub = RealtimeHub::new();
    hub.register(store.clone());
    assert!(hub.is_registered("departmentChanged"));

    let created = serde_json::to_value(department(40)).unwrap();
    assert_eq!(hub.dispatch(&sync(ChangeAction::Create, "d40", Some(created))).await, 1);
    assert_eq!(store.records().await.len(), 4);

    let update = json!({ "description": "Moved to building B" });
    assert_eq!(hub.dispatch(&sync(ChangeAction::Update, "d02", Some(update))).await, 1);
    let d02 = store.get("d02").await.unwrap();
    assert_eq!(d02.description.as_deref(), Some("Moved to building B"));
    assert_eq!(d02.name, "Department 02");

    assert_eq!(hub.dispatch(&sync(ChangeAction::Delete, "d01", None)).await, 1);
    assert!(store.get("d01").await.is_none());
    assert_eq!(store.records().await.len(), 3);
}

#[tokio::test]
async fn test_create_echo_is_not_duplicated() {
    let http = department_backend(2).await;
    let store = department_store(&http);
    store.fetch(&ListQuery::new(1, 10)).await.unwrap();

    let created = store
        .add(&DepartmentCreate {
            name: "Security".into(),
            description: None,
            manager_id: None,
        })
        .await
        .unwrap();

    let mut hub = RealtimeHub::new();
    hub.register(store.clone());
    let echo = serde_json::to_value(&created).unwrap();
    hub.dispatch(&sync(ChangeAction::Create, &created.id, Some(echo)))
        .await;

    let records = store.records().await;
    assert_eq!(records.iter().filter(|d| d.id == created.id).count(), 1);
    assert_eq!(records.len(), 3);
}

#[tokio::test]
async fn test_unknown_or_malformed_events_change_nothing() {
    let http = department_backend(2).await;
    let store = department_store(&http);
    store.fetch(&ListQuery::new(1, 10)).await.unwrap();
    let before = store.records().await;

    let mut hub = RealtimeHub::new();
    hub.register(store.clone());

    let update = json!({ "name": "Ghost" });
    assert_eq!(hub.dispatch(&sync(ChangeAction::Update, "d99", Some(update))).await, 0);
    assert_eq!(hub.dispatch(&sync(ChangeAction::Delete, "d99", None)).await, 0);
    // update without data
    assert_eq!(hub.dispatch(&sync(ChangeAction::Update, "d01", None)).await, 0);
    // not a sync frame
    let other = BusMessage::new(EventType::Response, b"{}".to_vec());
    assert_eq!(hub.dispatch(&other).await, 0);
    // garbage payload
    let garbage = BusMessage::new(EventType::Sync, b"not json".to_vec());
    assert_eq!(hub.dispatch(&garbage).await, 0);
    // event nobody registered for
    let course = BusMessage::sync(&SyncPayload {
        resource: "courseChanged".into(),
        version: 1,
        action: ChangeAction::Delete,
        id: Some("d01".into()),
        data: None,
    })
    .unwrap();
    assert_eq!(hub.dispatch(&course).await, 0);

    assert_eq!(store.records().await, before);
}

#[tokio::test]
async fn test_tcp_push_client_feeds_hub() {
    let http = department_backend(3).await;
    let store = department_store(&http);
    store.fetch(&ListQuery::new(1, 10)).await.unwrap();

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap().to_string();
    let (go_tx, go_rx) = oneshot::channel::<()>();

    let server = tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.unwrap();
        let hello = read_frame(&mut stream).await.unwrap();
        assert_eq!(hello.event_type, EventType::Handshake);
        let handshake: HandshakePayload = hello.parse_payload().unwrap();

        go_rx.await.unwrap();
        write_frame(&mut stream, &sync(ChangeAction::Delete, "d02", None))
            .await
            .unwrap();
        // hold the connection until the client goes away
        let _ = read_frame(&mut stream).await;
        handshake
    });

    let client = PushClient::connect(&addr, &signed_in(), 16).await.unwrap();
    let rx = client.subscribe();

    let mut hub = RealtimeHub::new();
    hub.register(store.clone());
    let hub = Arc::new(hub);
    let cancel = CancellationToken::new();
    let runner = {
        let hub = hub.clone();
        let cancel = cancel.clone();
        tokio::spawn(async move { hub.run(rx, cancel).await })
    };

    go_tx.send(()).unwrap();
    tokio::time::timeout(Duration::from_secs(5), async {
        while store.get("d02").await.is_some() {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("push delete never applied");
    assert_eq!(store.records().await.len(), 2);

    client.close();
    cancel.cancel();
    runner.await.unwrap();

    let handshake = server.await.unwrap();
    assert_eq!(handshake.access_token.as_deref(), Some("token-123"));
    assert_eq!(handshake.client_name.as_deref(), Some("hrm-client"));
}

#[tokio::test]
async fn test_in_memory_push_client() {
    let http = department_backend(3).await;
    let store = department_store(&http);
    store.fetch(&ListQuery::new(1, 10)).await.unwrap();

    let (hub_tx, _) = broadcast::channel(16);
    let (to_hub_tx, mut to_hub_rx) = broadcast::channel(16);
    let transport = MemoryTransport::new(&hub_tx, &to_hub_tx);

    let client = PushClient::in_memory(transport, &signed_in(), 16)
        .await
        .unwrap();
    let hello = to_hub_rx.recv().await.unwrap();
    assert_eq!(hello.event_type, EventType::Handshake);

    let mut rx = client.subscribe();
    let mut hub = RealtimeHub::new();
    hub.register(store.clone());

    let update = json!({ "name": "Finance" });
    hub_tx
        .send(sync(ChangeAction::Update, "d03", Some(update)))
        .unwrap();
    let msg = tokio::time::timeout(Duration::from_secs(5), rx.recv())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(hub.dispatch(&msg).await, 1);
    assert_eq!(store.get("d03").await.unwrap().name, "Finance");

    client.close();
    assert!(!client.is_connected());
}

#[tokio::test]
async fn test_push_requires_session() {
    let (hub_tx, _) = broadcast::channel(4);
    let (to_hub_tx, _) = broadcast::channel(4);
    let transport = MemoryTransport::new(&hub_tx, &to_hub_tx);

    let err = PushClient::in_memory(transport, &SessionContext::new(), 4)
        .await
        .unwrap_err();
    assert!(matches!(err, MessageError::Unauthenticated));
}
