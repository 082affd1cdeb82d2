//! Push channel transports
//!
//! Frame layout:
//!
//! | bytes | field                                  |
//! |-------|----------------------------------------|
//! | 1     | event type                             |
//! | 16    | request id                             |
//! | 16    | correlation id (nil = none)            |
//! | 4     | payload length, little endian          |
//! | n     | JSON payload                           |

use async_trait::async_trait;
use shared::message::{BusMessage, EventType};
use std::sync::Arc;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::sync::{Mutex, broadcast};
use uuid::Uuid;

use super::MessageError;

/// Largest payload accepted from the hub
pub const MAX_PAYLOAD_LEN: usize = 4 * 1024 * 1024;

/// Transport abstraction for the push channel
#[async_trait]
pub trait Transport: Send + Sync + std::fmt::Debug {
    async fn read_message(&self) -> Result<BusMessage, MessageError>;
    async fn write_message(&self, msg: &BusMessage) -> Result<(), MessageError>;
    async fn close(&self) -> Result<(), MessageError>;
}

/// Read one frame
pub async fn read_frame<R: AsyncRead + Unpin>(reader: &mut R) -> Result<BusMessage, MessageError> {
    let mut type_buf = [0u8; 1];
    reader.read_exact(&mut type_buf).await?;
    let event_type = EventType::try_from(type_buf[0])
        .map_err(|_| MessageError::InvalidMessage(format!("event type {}", type_buf[0])))?;

    let mut uuid_buf = [0u8; 16];
    reader.read_exact(&mut uuid_buf).await?;
    let request_id = Uuid::from_bytes(uuid_buf);

    reader.read_exact(&mut uuid_buf).await?;
    let correlation_id = Some(Uuid::from_bytes(uuid_buf)).filter(|id| !id.is_nil());

    let mut len_buf = [0u8; 4];
    reader.read_exact(&mut len_buf).await?;
    let len = u32::from_le_bytes(len_buf) as usize;
    if len > MAX_PAYLOAD_LEN {
        return Err(MessageError::InvalidMessage(format!(
            "payload of {len} bytes exceeds limit"
        )));
    }

    let mut payload = vec![0u8; len];
    reader.read_exact(&mut payload).await?;

    Ok(BusMessage {
        request_id,
        event_type,
        correlation_id,
        payload,
    })
}

/// Encode one frame
pub fn encode_frame(msg: &BusMessage) -> Vec<u8> {
    let mut data = Vec::with_capacity(37 + msg.payload.len());
    data.push(msg.event_type as u8);
    data.extend_from_slice(msg.request_id.as_bytes());
    data.extend_from_slice(msg.correlation_id.unwrap_or(Uuid::nil()).as_bytes());
    data.extend_from_slice(&(msg.payload.len() as u32).to_le_bytes());
    data.extend_from_slice(&msg.payload);
    data
}

/// Write one frame
pub async fn write_frame<W: AsyncWrite + Unpin>(
    writer: &mut W,
    msg: &BusMessage,
) -> Result<(), MessageError> {
    writer.write_all(&encode_frame(msg)).await?;
    writer.flush().await?;
    Ok(())
}

/// TCP transport
#[derive(Debug, Clone)]
pub struct TcpTransport {
    reader: Arc<Mutex<OwnedReadHalf>>,
    writer: Arc<Mutex<OwnedWriteHalf>>,
}

impl TcpTransport {
    pub async fn connect(addr: &str) -> Result<Self, MessageError> {
        let stream = TcpStream::connect(addr)
            .await
            .map_err(|e| MessageError::Connection(format!("{addr}: {e}")))?;
        Ok(Self::from_stream(stream))
    }

    pub fn from_stream(stream: TcpStream) -> Self {
        let (reader, writer) = stream.into_split();
        Self {
            reader: Arc::new(Mutex::new(reader)),
            writer: Arc::new(Mutex::new(writer)),
        }
    }
}

#[async_trait]
impl Transport for TcpTransport {
    async fn read_message(&self) -> Result<BusMessage, MessageError> {
        let mut reader = self.reader.lock().await;
        read_frame(&mut *reader).await
    }

    async fn write_message(&self, msg: &BusMessage) -> Result<(), MessageError> {
        let mut writer = self.writer.lock().await;
        write_frame(&mut *writer, msg).await
    }

    async fn close(&self) -> Result<(), MessageError> {
        self.writer.lock().await.shutdown().await?;
        Ok(())
    }
}

/// In-process transport over broadcast channels
#[derive(Debug, Clone)]
pub struct MemoryTransport {
    /// Messages from the hub
    rx: Arc<Mutex<broadcast::Receiver<BusMessage>>>,
    /// Messages to the hub
    tx: broadcast::Sender<BusMessage>,
}

impl MemoryTransport {
    /// * `hub_tx` - the hub's broadcast sender, subscribed to for events
    /// * `to_hub_tx` - where client messages (handshake) are sent
    pub fn new(
        hub_tx: &broadcast::Sender<BusMessage>,
        to_hub_tx: &broadcast::Sender<BusMessage>,
    ) -> Self {
        Self {
            rx: Arc::new(Mutex::new(hub_tx.subscribe())),
            tx: to_hub_tx.clone(),
        }
    }
}

#[async_trait]
impl Transport for MemoryTransport {
    async fn read_message(&self) -> Result<BusMessage, MessageError> {
        let mut rx = self.rx.lock().await;
        loop {
            match rx.recv().await {
                Ok(msg) => return Ok(msg),
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Memory transport lagged");
                }
                Err(e) => return Err(MessageError::Connection(format!("memory channel: {e}"))),
            }
        }
    }

    async fn write_message(&self, msg: &BusMessage) -> Result<(), MessageError> {
        self.tx
            .send(msg.clone())
            .map_err(|e| MessageError::Connection(format!("send to hub: {e}")))?;
        Ok(())
    }

    async fn close(&self) -> Result<(), MessageError> {
        Ok(())
    }
}
