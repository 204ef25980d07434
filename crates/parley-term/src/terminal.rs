//! Terminal driver.
//!
//! Implements the [`Driver`] trait with stdin lines for input, plain text on
//! stdout for output, the HTTP directory for room checks and the WebSocket
//! transport for the room connection.

use std::io::{self, Stdout, stdout};

use parley_app::{App, AppEvent, Driver, DriverInput};
use parley_client::{
    Client, ClientMessage, ConnectionEvent, DirectoryResponse, RoomId,
    directory::HttpDirectory,
    transport::{self, ConnectedClient, TransportConfig, TransportError},
};
use thiserror::Error;
use tokio::{
    io::{AsyncBufReadExt, BufReader},
    sync::mpsc,
    task::JoinHandle,
};

use crate::Renderer;

/// Terminal driver errors.
#[derive(Debug, Error)]
pub enum TerminalError {
    /// I/O error from terminal operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Transport error.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// Send attempted without an open connection.
    #[error("not connected")]
    NotConnected,
}

/// Terminal driver implementing the [`Driver`] trait.
pub struct TerminalDriver {
    out: Stdout,
    renderer: Renderer,
    lines: mpsc::Receiver<String>,
    reader: JoinHandle<()>,
    directory: HttpDirectory,
    config: TransportConfig,
    connection: Option<ConnectedClient>,
}

impl TerminalDriver {
    /// Create a terminal driver talking to the server in `config`.
    ///
    /// Spawns the stdin reader, so this must run inside a tokio runtime.
    pub fn new(config: TransportConfig) -> Result<Self, TerminalError> {
        let directory = HttpDirectory::new(config.clone())?;
        let (tx, lines) = mpsc::channel(config.channel_capacity);
        let reader = tokio::spawn(read_lines(tx));

        Ok(Self {
            out: stdout(),
            renderer: Renderer::new(),
            lines,
            reader,
            directory,
            config,
            connection: None,
        })
    }
}

/// Forward stdin lines until EOF or until the driver goes away.
async fn read_lines(tx: mpsc::Sender<String>) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        match lines.next_line().await {
            Ok(Some(line)) => {
                if tx.send(line).await.is_err() {
                    return;
                }
            },
            Ok(None) => return,
            Err(e) => {
                tracing::warn!(error = %e, "stdin read failed");
                return;
            },
        }
    }
}

/// Next event of the open connection. Pends forever without one.
async fn next_connection_event(connection: &mut Option<ConnectedClient>) -> ConnectionEvent {
    match connection {
        Some(client) => client
            .from_server
            .recv()
            .await
            .unwrap_or_else(|| ConnectionEvent::Closed { reason: "connection task ended".into() }),
        None => std::future::pending().await,
    }
}

impl Driver for TerminalDriver {
    type Error = TerminalError;

    async fn next_input(&mut self) -> Result<Option<DriverInput>, Self::Error> {
        tokio::select! {
            biased;

            event = next_connection_event(&mut self.connection) => {
                Ok(Some(DriverInput::Connection(event)))
            }

            line = self.lines.recv() => {
                Ok(line.map(|line| DriverInput::App(AppEvent::Line(line))))
            }

            _ = tokio::signal::ctrl_c() => Ok(None),
        }
    }

    async fn check_room(&mut self, room_id: &RoomId) -> DirectoryResponse {
        self.directory.check(room_id).await
    }

    async fn connect(&mut self, room_id: &RoomId) -> Result<(), Self::Error> {
        self.disconnect();
        tracing::info!(%room_id, server = %self.config.server_url, "connecting");
        self.connection = Some(transport::connect(&self.config).await?);
        Ok(())
    }

    async fn send(&mut self, message: ClientMessage) -> Result<(), Self::Error> {
        match &self.connection {
            Some(client) => Ok(client.send(message).await?),
            None => Err(TerminalError::NotConnected),
        }
    }

    fn disconnect(&mut self) {
        if let Some(client) = self.connection.take() {
            client.stop();
        }
    }

    fn is_connected(&self) -> bool {
        self.connection.as_ref().is_some_and(|client| !client.is_finished())
    }

    fn render(&mut self, app: &App, client: &Client) -> Result<(), Self::Error> {
        self.renderer.render(&mut self.out.lock(), app, client)?;
        Ok(())
    }
}

impl Drop for TerminalDriver {
    fn drop(&mut self) {
        self.disconnect();
        self.reader.abort();
    }
}
