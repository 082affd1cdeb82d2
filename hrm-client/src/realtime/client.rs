use shared::message::{BusMessage, HandshakePayload, PROTOCOL_VERSION};
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;

use super::MessageError;
use super::transport::{MemoryTransport, TcpTransport, Transport};
use crate::config::ClientConfig;
use crate::session::SessionContext;

const CLIENT_NAME: &str = "hrm-client";

/// Push channel client
///
/// Performs the handshake, then a background task reads frames until the
/// connection fails or [`PushClient::close`] is called, forwarding each one
/// to every subscriber.
#[derive(Debug, Clone)]
pub struct PushClient {
    transport: ClientTransport,
    event_tx: broadcast::Sender<BusMessage>,
    shutdown: CancellationToken,
}

#[derive(Debug, Clone)]
enum ClientTransport {
    Tcp(TcpTransport),
    Memory(MemoryTransport),
}

impl ClientTransport {
    async fn read_message(&self) -> Result<BusMessage, MessageError> {
        match self {
            ClientTransport::Tcp(t) => t.read_message().await,
            ClientTransport::Memory(t) => t.read_message().await,
        }
    }

    async fn write_message(&self, msg: &BusMessage) -> Result<(), MessageError> {
        match self {
            ClientTransport::Tcp(t) => t.write_message(msg).await,
            ClientTransport::Memory(t) => t.write_message(msg).await,
        }
    }

    async fn close(&self) -> Result<(), MessageError> {
        match self {
            ClientTransport::Tcp(t) => t.close().await,
            ClientTransport::Memory(t) => t.close().await,
        }
    }
}

impl PushClient {
    /// Connect over TCP and authenticate with the session's token
    pub async fn connect(
        addr: &str,
        session: &SessionContext,
        capacity: usize,
    ) -> Result<Self, MessageError> {
        let token = session.access_token().ok_or(MessageError::Unauthenticated)?;
        let transport = ClientTransport::Tcp(TcpTransport::connect(addr).await?);
        tracing::info!(addr, "Push channel connected");
        Self::start(transport, token, capacity).await
    }

    /// Connect to `config.push_addr`
    pub async fn from_config(
        config: &ClientConfig,
        session: &SessionContext,
    ) -> Result<Self, MessageError> {
        let addr = config
            .push_addr
            .as_deref()
            .ok_or_else(|| MessageError::Connection("push address not configured".into()))?;
        Self::connect(addr, session, config.push_channel_capacity).await
    }

    /// Attach to an in-process hub
    pub async fn in_memory(
        transport: MemoryTransport,
        session: &SessionContext,
        capacity: usize,
    ) -> Result<Self, MessageError> {
        let token = session.access_token().ok_or(MessageError::Unauthenticated)?;
        Self::start(ClientTransport::Memory(transport), token, capacity).await
    }

    async fn start(
        transport: ClientTransport,
        token: String,
        capacity: usize,
    ) -> Result<Self, MessageError> {
        let handshake = HandshakePayload {
            version: PROTOCOL_VERSION,
            client_name: Some(CLIENT_NAME.to_string()),
            client_version: Some(env!("CARGO_PKG_VERSION").to_string()),
            access_token: Some(token),
        };
        transport
            .write_message(&BusMessage::handshake(&handshake)?)
            .await?;

        let (event_tx, _) = broadcast::channel(capacity.max(1));
        let client = Self {
            transport,
            event_tx,
            shutdown: CancellationToken::new(),
        };
        client.spawn_reader();
        Ok(client)
    }

    fn spawn_reader(&self) {
        let transport = self.transport.clone();
        let event_tx = self.event_tx.clone();
        let shutdown = self.shutdown.clone();

        tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = shutdown.cancelled() => break,
                    result = transport.read_message() => match result {
                        Ok(msg) => {
                            tracing::trace!(event_type = %msg.event_type, len = msg.payload.len(), "Push frame received");
                            // no subscriber is not an error
                            let _ = event_tx.send(msg);
                        }
                        Err(e) => {
                            tracing::warn!(error = %e, "Push channel closed");
                            shutdown.cancel();
                            break;
                        }
                    },
                }
            }
            if let Err(e) = transport.close().await {
                tracing::debug!(error = %e, "Push transport close failed");
            }
        });
    }

    /// Receiver for every frame read from now on
    pub fn subscribe(&self) -> broadcast::Receiver<BusMessage> {
        self.event_tx.subscribe()
    }

    /// Token cancelled when the connection ends for any reason
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    pub fn is_connected(&self) -> bool {
        !self.shutdown.is_cancelled()
    }

    /// Stop the reader task and close the transport
    pub fn close(&self) {
        self.shutdown.cancel();
    }
}
