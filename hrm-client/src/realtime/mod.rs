//! Realtime push channel
//!
//! A single connection to the push hub delivers `{entity}Changed` events.
//! [`PushClient`] owns the connection and fans incoming frames out on a
//! broadcast channel; [`RealtimeHub`] routes each event to the store that
//! registered for its name.

pub mod client;
pub mod hub;
pub mod transport;

pub use client::PushClient;
pub use hub::RealtimeHub;
pub use transport::{MemoryTransport, TcpTransport, Transport};

use thiserror::Error;

/// Push channel error
#[derive(Debug, Error)]
pub enum MessageError {
    #[error("connection error: {0}")]
    Connection(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid message: {0}")]
    InvalidMessage(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("no active session")]
    Unauthenticated,
}
