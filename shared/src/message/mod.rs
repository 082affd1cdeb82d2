//! Push channel message types
//!
//! Shared by the push hub and clients. A [`BusMessage`] is the framed unit on
//! the wire; its payload is the JSON encoding of one of the payload types.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;

use uuid::Uuid;

pub mod payload;
pub use payload::*;

/// Protocol version
pub const PROTOCOL_VERSION: u16 = 1;

/// Push channel event types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventType {
    /// Client handshake
    Handshake = 0,
    /// Entity change broadcast
    Sync = 1,
    /// Reply to a client message
    Response = 2,
}

impl TryFrom<u8> for EventType {
    type Error = ();

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(EventType::Handshake),
            1 => Ok(EventType::Sync),
            2 => Ok(EventType::Response),
            _ => Err(()),
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventType::Handshake => write!(f, "handshake"),
            EventType::Sync => write!(f, "sync"),
            EventType::Response => write!(f, "response"),
        }
    }
}

/// Framed push channel message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BusMessage {
    pub request_id: Uuid,
    pub event_type: EventType,
    pub correlation_id: Option<Uuid>,
    pub payload: Vec<u8>,
}

impl BusMessage {
    pub fn new(event_type: EventType, payload: Vec<u8>) -> Self {
        Self {
            request_id: Uuid::new_v4(),
            event_type,
            correlation_id: None,
            payload,
        }
    }

    /// Set the correlation id (replies)
    pub fn with_correlation_id(mut self, id: Uuid) -> Self {
        self.correlation_id = Some(id);
        self
    }

    /// Build a handshake message
    pub fn handshake(payload: &HandshakePayload) -> Result<Self, serde_json::Error> {
        Ok(Self::new(EventType::Handshake, serde_json::to_vec(payload)?))
    }

    /// Build an entity change message
    pub fn sync(payload: &SyncPayload) -> Result<Self, serde_json::Error> {
        Ok(Self::new(EventType::Sync, serde_json::to_vec(payload)?))
    }

    /// Build a reply message
    pub fn response(payload: &ResponsePayload) -> Result<Self, serde_json::Error> {
        Ok(Self::new(EventType::Response, serde_json::to_vec(payload)?))
    }

    /// Decode the payload
    pub fn parse_payload<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_slice(&self.payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_sync_message_roundtrip_payload() {
        let payload = SyncPayload {
            resource: "departmentChanged".to_string(),
            version: 3,
            action: ChangeAction::Update,
            id: Some("d1".to_string()),
            data: Some(json!({ "id": "d1", "name": "Ops" })),
        };

        let msg = BusMessage::sync(&payload).unwrap();
        assert_eq!(msg.event_type, EventType::Sync);
        assert!(msg.correlation_id.is_none());

        let parsed: SyncPayload = msg.parse_payload().unwrap();
        assert_eq!(parsed, payload);
    }

    #[test]
    fn test_action_accepts_past_tense() {
        let payload: SyncPayload = serde_json::from_value(json!({
            "resource": "employeeChanged",
            "action": "deleted",
            "id": "e1"
        }))
        .unwrap();
        assert_eq!(payload.action, ChangeAction::Delete);
        assert_eq!(payload.version, 0);
    }

    #[test]
    fn test_entity_id_falls_back_to_data() {
        let payload: SyncPayload = serde_json::from_value(json!({
            "resource": "employeeChanged",
            "action": "create",
            "data": { "id": "e9" }
        }))
        .unwrap();
        assert_eq!(payload.entity_id(), Some("e9"));
    }

    #[test]
    fn test_event_type_from_byte() {
        assert_eq!(EventType::try_from(1), Ok(EventType::Sync));
        assert!(EventType::try_from(9).is_err());
    }
}
