//! Protocol-to-Application translation layer.
//!
//! The [`Bridge`] wraps the Sans-IO [`parley_client::Client`] and adapts it to
//! the high-level application lifecycle.
//!
//! # Responsibilities
//!
//! - Converts high-level [`crate::AppAction`] into client events.
//! - Accumulates I/O requests ([`Outgoing`]) for the driver to execute in the
//!   next I/O cycle.
//! - Converts client notifications back into [`crate::AppEvent`]s to update
//!   the UI.
//! - Feeds results of executed requests (directory answers, connection
//!   events) back into the client.

use parley_client::{
    Client, ClientAction, ClientError, ClientEvent, ClientMessage, ConnectionEvent,
    DirectoryResponse, Identity, RoomId,
};

use crate::{AppAction, AppEvent};

/// I/O request produced by the client, executed by the driver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outgoing {
    /// Ask the directory whether the room exists.
    CheckRoom(RoomId),
    /// Open the room connection.
    Connect(RoomId),
    /// Transmit an event over the open connection.
    Send(ClientMessage),
    /// Close the connection if one is open.
    Disconnect,
}

/// Bridge between App and Client protocol logic.
pub struct Bridge {
    client: Client,
    outgoing: Vec<Outgoing>,
}

impl Bridge {
    /// Create a new Bridge for `identity`.
    pub fn new(identity: Identity) -> Self {
        Self { client: Client::new(identity), outgoing: Vec::new() }
    }

    /// Underlying client, for rendering the session views.
    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Process an App action and return resulting App events.
    pub fn process_app_action(&mut self, action: AppAction) -> Vec<AppEvent> {
        match action {
            AppAction::EnterRoom { room_id } => {
                let result = self.client.handle(ClientEvent::EnterRoom { room_id });
                self.handle_client_result(result)
            },
            AppAction::SendMessage { text } => {
                let result = self.client.handle(ClientEvent::SendMessage { text });
                self.handle_client_result(result)
            },
            AppAction::LeaveRoom => {
                let result = self.client.handle(ClientEvent::Leave);
                self.handle_client_result(result)
            },
            AppAction::Render | AppAction::Quit => vec![],
        }
    }

    /// Report the directory's answer for `room_id`.
    pub fn handle_directory_checked(
        &mut self,
        room_id: RoomId,
        response: DirectoryResponse,
    ) -> Vec<AppEvent> {
        let result = self.client.handle(ClientEvent::DirectoryChecked { room_id, response });
        self.handle_client_result(result)
    }

    /// Report that a requested connection is open.
    pub fn handle_connection_opened(&mut self) -> Vec<AppEvent> {
        let result = self.client.handle(ClientEvent::ConnectionOpened);
        self.handle_client_result(result)
    }

    /// Handle an event from the live connection.
    pub fn handle_connection_event(&mut self, event: ConnectionEvent) -> Vec<AppEvent> {
        let result = self.client.handle(event.into());
        self.handle_client_result(result)
    }

    /// End the session on an exit path. Idempotent.
    pub fn teardown(&mut self) -> Vec<AppEvent> {
        let actions = self.client.teardown();
        self.process_client_actions(actions)
    }

    /// Take pending I/O requests.
    pub fn take_outgoing(&mut self) -> Vec<Outgoing> {
        std::mem::take(&mut self.outgoing)
    }

    fn handle_client_result(
        &mut self,
        result: Result<Vec<ClientAction>, ClientError>,
    ) -> Vec<AppEvent> {
        match result {
            Ok(actions) => self.process_client_actions(actions),
            Err(e) => vec![AppEvent::Error { message: e.to_string() }],
        }
    }

    fn process_client_actions(&mut self, actions: Vec<ClientAction>) -> Vec<AppEvent> {
        let mut events = Vec::new();

        for action in actions {
            match action {
                ClientAction::CheckRoom { room_id } => {
                    self.outgoing.push(Outgoing::CheckRoom(room_id));
                },
                ClientAction::Connect { room_id } => {
                    self.outgoing.push(Outgoing::Connect(room_id));
                },
                ClientAction::Send(message) => {
                    self.outgoing.push(Outgoing::Send(message));
                },
                ClientAction::Disconnect => {
                    self.outgoing.push(Outgoing::Disconnect);
                },
                ClientAction::ValidationChanged { room_id, state } => {
                    events.push(AppEvent::Validation { room_id, state });
                },
                ClientAction::SessionChanged { room_id, phase } => {
                    events.push(AppEvent::Session { room_id, phase });
                },
                ClientAction::MessageAppended(message) => {
                    events.push(AppEvent::MessageAppended(message));
                },
                ClientAction::RosterReplaced { participants } => {
                    events.push(AppEvent::RosterReplaced { participants });
                },
            }
        }

        events
    }
}
