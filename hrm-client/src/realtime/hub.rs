use shared::message::{BusMessage, EventType, SyncPayload};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;
use tokio_util::sync::CancellationToken;

use crate::store::ChangeSink;

/// Routes push events to the stores registered for them
#[derive(Default)]
pub struct RealtimeHub {
    sinks: HashMap<&'static str, Vec<Arc<dyn ChangeSink>>>,
}

impl std::fmt::Debug for RealtimeHub {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RealtimeHub")
            .field("events", &self.sinks.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl RealtimeHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe a store to its `{entity}Changed` event
    pub fn register(&mut self, sink: Arc<dyn ChangeSink>) {
        tracing::debug!(event = sink.event(), "Realtime sink registered");
        self.sinks.entry(sink.event()).or_default().push(sink);
    }

    pub fn is_registered(&self, event: &str) -> bool {
        self.sinks.contains_key(event)
    }

    /// Apply one frame. Returns how many sinks changed.
    ///
    /// Malformed or unrouted events are logged and dropped.
    pub async fn dispatch(&self, msg: &BusMessage) -> usize {
        if msg.event_type != EventType::Sync {
            return 0;
        }

        let change: SyncPayload = match msg.parse_payload() {
            Ok(change) => change,
            Err(e) => {
                tracing::warn!(request_id = %msg.request_id, error = %e, "Malformed push event");
                return 0;
            }
        };

        let Some(sinks) = self.sinks.get(change.resource.as_str()) else {
            tracing::trace!(event = %change.resource, "No sink for push event");
            return 0;
        };

        let mut applied = 0;
        for sink in sinks {
            match sink.apply(&change).await {
                Ok(true) => {
                    applied += 1;
                    tracing::debug!(event = %change.resource, action = %change.action, id = ?change.entity_id(), "Push event applied");
                }
                Ok(false) => {
                    tracing::debug!(event = %change.resource, action = %change.action, id = ?change.entity_id(), "Push event changed nothing");
                }
                Err(e) => {
                    tracing::warn!(event = %change.resource, action = %change.action, error = %e, "Push event rejected");
                }
            }
        }
        applied
    }

    /// Dispatch until `cancel` fires or the sender side closes
    pub async fn run(&self, mut rx: broadcast::Receiver<BusMessage>, cancel: CancellationToken) {
        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                received = rx.recv() => match received {
                    Ok(msg) => {
                        self.dispatch(&msg).await;
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::warn!(skipped, "Realtime hub lagged, events dropped until next refetch");
                    }
                    Err(RecvError::Closed) => break,
                },
            }
        }
        tracing::debug!("Realtime hub stopped");
    }
}
