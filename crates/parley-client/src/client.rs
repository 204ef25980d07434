//! Client state machine.
//!
//! The `Client` composes the [`RoomGate`] and the [`RoomSession`]: the gate
//! runs for every newly selected room, and a session is created only once the
//! gate reports the room valid.

use parley_proto::RoomId;

use crate::{
    error::ClientError,
    event::{ClientAction, ClientEvent},
    gate::{DirectoryResponse, RoomGate, ValidationState},
    identity::Identity,
    session::{EndReason, Received, RoomSession},
};

/// Client for a single room at a time.
#[derive(Debug, Clone)]
pub struct Client {
    /// Local user.
    identity: Identity,
    /// Existence check for the selected room.
    gate: RoomGate,
    /// Session for the selected room. `None` until the room is valid.
    session: Option<RoomSession>,
}

impl Client {
    /// Create a client for `identity`.
    pub fn new(identity: Identity) -> Self {
        Self { identity, gate: RoomGate::new(), session: None }
    }

    /// Process an event and return resulting actions.
    pub fn handle(&mut self, event: ClientEvent) -> Result<Vec<ClientAction>, ClientError> {
        match event {
            ClientEvent::EnterRoom { room_id } => self.handle_enter_room(&room_id),
            ClientEvent::DirectoryChecked { room_id, response } => {
                Ok(self.handle_directory_checked(&room_id, response))
            },
            ClientEvent::ConnectionOpened => Ok(self.handle_connection_opened()),
            ClientEvent::ServerMessage(message) => Ok(self.handle_server_message(message)),
            ClientEvent::ConnectionClosed { reason } => Ok(self.handle_connection_closed(reason)),
            ClientEvent::SendMessage { text } => Ok(self.handle_send_message(&text)),
            ClientEvent::Leave => Ok(self.handle_leave()),
        }
    }

    /// Release the session on an exit path. Idempotent.
    pub fn teardown(&mut self) -> Vec<ClientAction> {
        self.end_session(EndReason::Left)
    }

    fn handle_leave(&mut self) -> Vec<ClientAction> {
        let actions = self.end_session(EndReason::Left);
        self.gate.forget();
        actions
    }

    fn handle_enter_room(&mut self, raw: &str) -> Result<Vec<ClientAction>, ClientError> {
        let room_id = RoomId::parse(raw).ok_or(ClientError::EmptyRoomId)?;

        if !self.gate.observe(&room_id) {
            tracing::debug!(%room_id, "room unchanged, no new check");
            return Ok(vec![]);
        }

        let mut actions = self.end_session(EndReason::RoomChanged);
        self.session = None;

        tracing::info!(%room_id, "checking room");
        actions.push(ClientAction::ValidationChanged {
            room_id: room_id.clone(),
            state: ValidationState::Checking,
        });
        actions.push(ClientAction::CheckRoom { room_id });
        Ok(actions)
    }

    fn handle_directory_checked(
        &mut self,
        room_id: &RoomId,
        response: DirectoryResponse,
    ) -> Vec<ClientAction> {
        let Some(state) = self.gate.resolve(room_id, response).cloned() else {
            return vec![];
        };

        let mut actions = vec![ClientAction::ValidationChanged { room_id: room_id.clone(), state }];

        if self.gate.is_valid() {
            let mut session = RoomSession::new(room_id.clone(), self.identity.clone());
            if session.start() {
                actions.push(ClientAction::SessionChanged {
                    room_id: room_id.clone(),
                    phase: session.phase().clone(),
                });
                actions.push(ClientAction::Connect { room_id: room_id.clone() });
            }
            self.session = Some(session);
        }

        actions
    }

    fn handle_connection_opened(&mut self) -> Vec<ClientAction> {
        let Some(session) = self.session.as_mut() else {
            tracing::warn!("connection opened without a session, closing it");
            return vec![ClientAction::Disconnect];
        };

        match session.connection_opened() {
            Some(announce) => vec![
                ClientAction::SessionChanged {
                    room_id: session.room_id().clone(),
                    phase: session.phase().clone(),
                },
                ClientAction::Send(announce),
            ],
            None => {
                tracing::warn!(
                    room_id = %session.room_id(),
                    phase = ?session.phase(),
                    "unexpected connection open, closing it"
                );
                vec![ClientAction::Disconnect]
            },
        }
    }

    fn handle_server_message(&mut self, message: parley_proto::ServerMessage) -> Vec<ClientAction> {
        let Some(session) = self.session.as_mut() else {
            tracing::debug!(event = message.event_name(), "dropping event without a session");
            return vec![];
        };

        match session.receive(message) {
            Some(Received::Message(message)) => vec![ClientAction::MessageAppended(message)],
            Some(Received::Roster(participants)) => {
                vec![ClientAction::RosterReplaced { participants }]
            },
            None => vec![],
        }
    }

    fn handle_connection_closed(&mut self, reason: String) -> Vec<ClientAction> {
        tracing::warn!(%reason, "connection closed");
        let Some(session) = self.session.as_mut() else {
            return vec![];
        };
        if !session.connection_lost(reason) {
            return vec![];
        }
        Self::session_ended(session)
    }

    fn handle_send_message(&self, text: &str) -> Vec<ClientAction> {
        let Some(session) = self.session.as_ref() else {
            tracing::debug!("send skipped: no session");
            return vec![];
        };

        match session.prepare_send(text) {
            Ok(message) => vec![ClientAction::Send(message)],
            Err(skipped) => {
                tracing::debug!(%skipped, "send skipped");
                vec![]
            },
        }
    }

    fn end_session(&mut self, reason: EndReason) -> Vec<ClientAction> {
        let Some(session) = self.session.as_mut() else {
            return vec![];
        };
        if !session.end(reason) {
            return vec![];
        }
        Self::session_ended(session)
    }

    fn session_ended(session: &RoomSession) -> Vec<ClientAction> {
        vec![ClientAction::Disconnect, ClientAction::SessionChanged {
            room_id: session.room_id().clone(),
            phase: session.phase().clone(),
        }]
    }

    /// Local user.
    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    /// Currently selected room. `None` before the first room is entered.
    pub fn room_id(&self) -> Option<&RoomId> {
        self.gate.room_id()
    }

    /// Validation state of the selected room.
    pub fn validation(&self) -> Option<&ValidationState> {
        self.gate.state()
    }

    /// Session of the selected room. `None` until the room is valid.
    pub fn session(&self) -> Option<&RoomSession> {
        self.session.as_ref()
    }
}
