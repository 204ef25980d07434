//! WebSocket transport for the client.
//!
//! Provides [`ConnectedClient`] which handles socket I/O for room events.
//! This is a thin layer that only encodes, decodes and moves events; session
//! logic remains in the Sans-IO [`crate::Client`].

use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use parley_proto::{ClientMessage, RoomId, ServerMessage};
use reqwest::Url;
use thiserror::Error;
use tokio::{net::TcpStream, sync::mpsc};
use tokio_tungstenite::{
    MaybeTlsStream, WebSocketStream, connect_async, tungstenite::Message as WsMessage,
};

use crate::event::ConnectionEvent;

/// Default room server.
pub const DEFAULT_SERVER_URL: &str = "http://localhost:3000";

/// Default path of the WebSocket endpoint.
pub const DEFAULT_SOCKET_PATH: &str = "/ws";

/// Transport errors.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Server URL cannot be used.
    #[error("invalid server url: {0}")]
    InvalidUrl(String),

    /// Connection failed.
    #[error("connection failed: {0}")]
    Connection(String),

    /// Connection did not open in time.
    #[error("connection timed out after {0:?}")]
    Timeout(Duration),

    /// The connection task is gone.
    #[error("connection closed")]
    Closed,
}

/// Transport configuration.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// Base URL of the room server, e.g. `http://localhost:3000`.
    pub server_url: String,
    /// Path of the WebSocket endpoint on the same host.
    pub socket_path: String,
    /// Upper bound for one directory check.
    pub directory_timeout: Duration,
    /// Upper bound for opening the socket.
    pub connect_timeout: Duration,
    /// Buffered events per direction.
    pub channel_capacity: usize,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.to_owned(),
            socket_path: DEFAULT_SOCKET_PATH.to_owned(),
            directory_timeout: Duration::from_secs(10),
            connect_timeout: Duration::from_secs(10),
            channel_capacity: 64,
        }
    }
}

impl TransportConfig {
    /// Configuration for the server at `server_url`, other fields default.
    pub fn with_server(server_url: impl Into<String>) -> Self {
        Self { server_url: server_url.into(), ..Self::default() }
    }

    fn base_url(&self) -> Result<Url, TransportError> {
        Url::parse(&self.server_url)
            .map_err(|e| TransportError::InvalidUrl(format!("{}: {e}", self.server_url)))
    }

    /// Directory URL for `room_id`: `{server}/rooms/{room_id}`.
    ///
    /// The room id is percent-encoded as a single path segment.
    pub fn room_url(&self, room_id: &RoomId) -> Result<Url, TransportError> {
        let mut url = self.base_url()?;
        url.path_segments_mut()
            .map_err(|()| TransportError::InvalidUrl(format!("{} cannot be a base", self.server_url)))?
            .pop_if_empty()
            .extend(["rooms", room_id.as_str()]);
        Ok(url)
    }

    /// WebSocket URL: the server URL with `ws`/`wss` scheme and the socket
    /// path.
    pub fn socket_url(&self) -> Result<Url, TransportError> {
        let mut url = self.base_url()?;
        let scheme = match url.scheme() {
            "http" | "ws" => "ws",
            "https" | "wss" => "wss",
            other => {
                return Err(TransportError::InvalidUrl(format!("unsupported scheme {other}")));
            },
        };
        url.set_scheme(scheme)
            .map_err(|()| TransportError::InvalidUrl(format!("cannot use scheme {scheme}")))?;
        url.set_path(&self.socket_path);
        Ok(url)
    }
}

/// Handle to an open room connection.
///
/// Events are sent and received through the channels while an internal task
/// handles the socket. Dropping the handle aborts the task and closes the
/// socket, so a connection never outlives its owner.
pub struct ConnectedClient {
    /// Send events to the server.
    pub to_server: mpsc::Sender<ClientMessage>,
    /// Receive events from the server, ending with [`ConnectionEvent::Closed`]
    /// if the peer goes away.
    pub from_server: mpsc::Receiver<ConnectionEvent>,
    /// Abort handle to stop the connection task.
    abort_handle: tokio::task::AbortHandle,
}

impl ConnectedClient {
    /// Queue an event for the server.
    pub async fn send(&self, message: ClientMessage) -> Result<(), TransportError> {
        self.to_server.send(message).await.map_err(|_| TransportError::Closed)
    }

    /// Stop the connection. Safe to call more than once.
    pub fn stop(&self) {
        self.abort_handle.abort();
    }

    /// `true` once the connection task has exited.
    pub fn is_finished(&self) -> bool {
        self.abort_handle.is_finished()
    }
}

impl Drop for ConnectedClient {
    fn drop(&mut self) {
        self.abort_handle.abort();
    }
}

/// Open the room socket described by `config`.
pub async fn connect(config: &TransportConfig) -> Result<ConnectedClient, TransportError> {
    let url = config.socket_url()?;
    tracing::debug!(%url, "opening room socket");

    let (stream, _response) = tokio::time::timeout(config.connect_timeout, connect_async(url.as_str()))
        .await
        .map_err(|_| TransportError::Timeout(config.connect_timeout))?
        .map_err(|e| TransportError::Connection(e.to_string()))?;

    let (to_server_tx, to_server_rx) = mpsc::channel(config.channel_capacity);
    let (from_server_tx, from_server_rx) = mpsc::channel(config.channel_capacity);

    let handle = tokio::spawn(run_connection(stream, to_server_rx, from_server_tx));

    Ok(ConnectedClient {
        to_server: to_server_tx,
        from_server: from_server_rx,
        abort_handle: handle.abort_handle(),
    })
}

/// Run the connection, bridging between channels and the socket.
async fn run_connection(
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
    mut to_server: mpsc::Receiver<ClientMessage>,
    from_server: mpsc::Sender<ConnectionEvent>,
) {
    let (mut sink, mut source) = stream.split();

    let reason = loop {
        tokio::select! {
            outgoing = to_server.recv() => {
                let Some(message) = outgoing else {
                    // Owner dropped the sender: close politely and stop.
                    let _ = sink.send(WsMessage::Close(None)).await;
                    return;
                };
                let text = match message.encode() {
                    Ok(text) => text,
                    Err(e) => {
                        tracing::warn!(error = %e, event = message.event_name(), "dropping unencodable event");
                        continue;
                    },
                };
                if let Err(e) = sink.send(WsMessage::text(text)).await {
                    break format!("send failed: {e}");
                }
            }

            incoming = source.next() => {
                match incoming {
                    Some(Ok(WsMessage::Text(text))) => match ServerMessage::decode(text.as_str()) {
                        Ok(message) => {
                            if from_server.send(ConnectionEvent::Message(message)).await.is_err() {
                                return;
                            }
                        },
                        Err(e) => tracing::debug!(error = %e, "skipping unrecognised server event"),
                    },
                    Some(Ok(WsMessage::Close(frame))) => {
                        break frame.map_or_else(
                            || "closed by server".to_owned(),
                            |frame| format!("closed by server: {}", frame.reason.as_str()),
                        );
                    },
                    Some(Ok(_)) => {},
                    Some(Err(e)) => break format!("receive failed: {e}"),
                    None => break "connection closed".to_owned(),
                }
            }
        }
    };

    tracing::warn!(%reason, "room socket closed");
    let _ = from_server.send(ConnectionEvent::Closed { reason }).await;
}
