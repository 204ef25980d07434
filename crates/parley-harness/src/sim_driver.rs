//! Simulation driver implementing the Driver trait.
//!
//! `SimDriver` provides the same interface as `TerminalDriver` but for
//! deterministic testing. It implements [`Driver`] so the same
//! [`parley_app::Runtime`] orchestration code runs in both production and
//! simulation.
//!
//! Inputs are consumed strictly in injection order. The runtime processes
//! each input to completion, so a connection event injected after a `/join`
//! line arrives after that join has been checked, connected and announced.

use std::{
    collections::{HashMap, VecDeque},
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use parley_app::{App, AppEvent, ConnectionState, Driver, DriverInput};
use parley_client::{
    Client, ClientMessage, ConnectionEvent, DirectoryResponse, Message, RoomId, RosterEntry,
    ServerMessage, SessionPhase, ValidationState,
};
use thiserror::Error;

/// Error type for simulation driver.
#[derive(Debug, Clone, Error)]
pub enum SimDriverError {
    /// Connection refused by the scripted server.
    #[error("connection refused: {0}")]
    ConnectRefused(String),

    /// Send attempted without an open connection.
    #[error("not connected")]
    NotConnected,
}

/// Directory answer for a room the directory does not know.
pub fn not_found(msg: &str) -> DirectoryResponse {
    DirectoryResponse::Rejected {
        status: 404,
        status_text: Some("Not Found".into()),
        body: Some(format!(r#"{{"msg":"{msg}"}}"#)),
    }
}

/// What the last render showed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderedView {
    /// Status line.
    pub status: Option<String>,
    /// UI connection state.
    pub state: ConnectionState,
    /// Validation state of the selected room.
    pub validation: Option<ValidationState>,
    /// Session phase, if a session exists.
    pub phase: Option<SessionPhase>,
    /// Message log.
    pub messages: Vec<Message>,
    /// Roster.
    pub roster: Vec<RosterEntry>,
}

/// Shared state for event injection.
///
/// This allows injection and inspection from outside the runtime, which owns
/// the driver while it runs.
#[derive(Default)]
struct SharedState {
    pending: VecDeque<DriverInput>,
    directory: HashMap<String, DirectoryResponse>,
    refuse_connect: Option<String>,
    checks: Vec<RoomId>,
    connects: Vec<RoomId>,
    sent: Vec<ClientMessage>,
    connected: bool,
    disconnects: usize,
    renders: usize,
    last_view: RenderedView,
}

/// Simulation driver for deterministic testing.
///
/// Clones share state, so a test keeps one handle for injection and
/// inspection and hands another to the runtime.
#[derive(Clone, Default)]
pub struct SimDriver {
    state: Arc<Mutex<SharedState>>,
}

impl SimDriver {
    /// Create a new simulation driver with an empty directory.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, SharedState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Script the directory answer for `room_id`.
    ///
    /// Rooms without an answer get a bare 404.
    #[must_use]
    pub fn with_room(self, room_id: &str, response: DirectoryResponse) -> Self {
        self.lock().directory.insert(room_id.to_owned(), response);
        self
    }

    /// Refuse every connection attempt with `reason`.
    #[must_use]
    pub fn refusing_connections(self, reason: &str) -> Self {
        self.lock().refuse_connect = Some(reason.to_owned());
        self
    }

    /// Inject one line of user input.
    pub fn inject_line(&self, line: &str) {
        self.lock().pending.push_back(DriverInput::App(AppEvent::Line(line.to_owned())));
    }

    /// Inject an event from the server.
    pub fn inject_server(&self, message: ServerMessage) {
        self.lock().pending.push_back(DriverInput::Connection(ConnectionEvent::Message(message)));
    }

    /// Inject a connection drop.
    pub fn inject_close(&self, reason: &str) {
        self.lock()
            .pending
            .push_back(DriverInput::Connection(ConnectionEvent::Closed { reason: reason.to_owned() }));
    }

    /// Check if there are pending inputs to process.
    pub fn has_pending(&self) -> bool {
        !self.lock().pending.is_empty()
    }

    /// Rooms the directory was asked about, in order.
    pub fn checks(&self) -> Vec<RoomId> {
        self.lock().checks.clone()
    }

    /// Rooms a connection was opened for, in order.
    pub fn connects(&self) -> Vec<RoomId> {
        self.lock().connects.clone()
    }

    /// Take all captured outgoing events.
    pub fn take_sent(&self) -> Vec<ClientMessage> {
        std::mem::take(&mut self.lock().sent)
    }

    /// Number of times a connection was released.
    pub fn disconnects(&self) -> usize {
        self.lock().disconnects
    }

    /// Number of renders so far.
    pub fn renders(&self) -> usize {
        self.lock().renders
    }

    /// What the last render showed.
    pub fn last_view(&self) -> RenderedView {
        self.lock().last_view.clone()
    }
}

impl Driver for SimDriver {
    type Error = SimDriverError;

    async fn next_input(&mut self) -> Result<Option<DriverInput>, Self::Error> {
        Ok(self.lock().pending.pop_front())
    }

    async fn check_room(&mut self, room_id: &RoomId) -> DirectoryResponse {
        let mut state = self.lock();
        state.checks.push(room_id.clone());
        state.directory.get(room_id.as_str()).cloned().unwrap_or(DirectoryResponse::Rejected {
            status: 404,
            status_text: Some("Not Found".into()),
            body: None,
        })
    }

    async fn connect(&mut self, room_id: &RoomId) -> Result<(), Self::Error> {
        let mut state = self.lock();
        if let Some(reason) = state.refuse_connect.clone() {
            tracing::debug!(%room_id, %reason, "refusing scripted connection");
            return Err(SimDriverError::ConnectRefused(reason));
        }
        state.connects.push(room_id.clone());
        state.connected = true;
        Ok(())
    }

    async fn send(&mut self, message: ClientMessage) -> Result<(), Self::Error> {
        let mut state = self.lock();
        if !state.connected {
            return Err(SimDriverError::NotConnected);
        }
        state.sent.push(message);
        Ok(())
    }

    fn disconnect(&mut self) {
        let mut state = self.lock();
        if state.connected {
            state.connected = false;
            state.disconnects += 1;
        }
    }

    fn is_connected(&self) -> bool {
        self.lock().connected
    }

    fn render(&mut self, app: &App, client: &Client) -> Result<(), Self::Error> {
        let session = client.session();
        let view = RenderedView {
            status: app.status_message().map(str::to_owned),
            state: app.connection_state().clone(),
            validation: client.validation().cloned(),
            phase: session.map(|s| s.phase().clone()),
            messages: session.map(|s| s.messages().as_slice().to_vec()).unwrap_or_default(),
            roster: session.map(|s| s.roster().as_slice().to_vec()).unwrap_or_default(),
        };

        let mut state = self.lock();
        state.renders += 1;
        state.last_view = view;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn room(raw: &str) -> RoomId {
        RoomId::parse(raw).unwrap()
    }

    #[test]
    fn inject_line_queues_input() {
        let driver = SimDriver::new();
        driver.inject_line("/join abc");

        assert!(driver.has_pending());
    }

    #[test]
    fn not_found_body_carries_msg() {
        let response = not_found("Room does not exist");
        assert_eq!(response.into_validation().reason(), Some("Room does not exist"));
    }

    #[tokio::test]
    async fn unknown_room_is_bare_404() {
        let mut driver = SimDriver::new().with_room("abc", DirectoryResponse::Found);

        assert_eq!(driver.check_room(&room("abc")).await, DirectoryResponse::Found);
        let response = driver.check_room(&room("other")).await;
        assert_eq!(response.into_validation().reason(), Some("Not Found"));
        assert_eq!(driver.checks(), vec![room("abc"), room("other")]);
    }

    #[tokio::test]
    async fn send_requires_connection() {
        let mut driver = SimDriver::new();
        let join = ClientMessage::JoinRoom(parley_proto::JoinRoom {
            room_id: room("abc"),
            username: "alice".into(),
        });

        assert!(matches!(driver.send(join.clone()).await, Err(SimDriverError::NotConnected)));
        driver.connect(&room("abc")).await.unwrap();
        driver.send(join).await.unwrap();
        assert_eq!(driver.take_sent().len(), 1);
    }

    #[test]
    fn disconnect_counts_only_real_releases() {
        let mut driver = SimDriver::new();
        driver.disconnect();
        assert_eq!(driver.disconnects(), 0);
    }
}
