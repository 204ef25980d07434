//! Client events and actions.

use parley_proto::{ClientMessage, RoomId, ServerMessage};

use crate::{
    gate::{DirectoryResponse, ValidationState},
    session::SessionPhase,
    view::Message,
};

/// Events the caller feeds into the client.
///
/// The caller is responsible for:
/// - Running directory checks and reporting their answers
/// - Opening the connection and reporting when it opens or closes
/// - Receiving server events from the connection
/// - Forwarding user intents (enter room, send, leave)
#[derive(Debug, Clone)]
pub enum ClientEvent {
    /// User selected a room. The id is trimmed by the client.
    EnterRoom {
        /// Room id as typed.
        room_id: String,
    },

    /// A directory check issued through [`ClientAction::CheckRoom`] finished.
    DirectoryChecked {
        /// Room that was checked.
        room_id: RoomId,
        /// The directory's answer.
        response: DirectoryResponse,
    },

    /// Connection requested through [`ClientAction::Connect`] is open.
    ConnectionOpened,

    /// Event pushed by the server.
    ServerMessage(ServerMessage),

    /// Connection failed to open or was closed by the peer.
    ConnectionClosed {
        /// Transport description.
        reason: String,
    },

    /// User wants to send a chat line.
    SendMessage {
        /// Text as typed.
        text: String,
    },

    /// User left the room.
    Leave,
}

/// Events produced by a live connection, in delivery order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionEvent {
    /// Server event decoded from the socket.
    Message(ServerMessage),
    /// The connection is gone. No further events follow.
    Closed {
        /// Transport description.
        reason: String,
    },
}

impl From<ConnectionEvent> for ClientEvent {
    fn from(event: ConnectionEvent) -> Self {
        match event {
            ConnectionEvent::Message(message) => Self::ServerMessage(message),
            ConnectionEvent::Closed { reason } => Self::ConnectionClosed { reason },
        }
    }
}

/// Actions the client produces for the caller to execute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientAction {
    /// Ask the directory whether the room exists, then report back with
    /// [`ClientEvent::DirectoryChecked`].
    CheckRoom {
        /// Room to check.
        room_id: RoomId,
    },

    /// Open the streaming connection, then report back with
    /// [`ClientEvent::ConnectionOpened`] or [`ClientEvent::ConnectionClosed`].
    Connect {
        /// Room the connection is for.
        room_id: RoomId,
    },

    /// Transmit an event over the open connection.
    Send(ClientMessage),

    /// Close the connection if one is open. Safe to execute repeatedly.
    Disconnect,

    /// Room validation state changed.
    ValidationChanged {
        /// Room being validated.
        room_id: RoomId,
        /// New state.
        state: ValidationState,
    },

    /// Session phase changed.
    SessionChanged {
        /// Room of the session.
        room_id: RoomId,
        /// New phase.
        phase: SessionPhase,
    },

    /// A message was appended to the log.
    MessageAppended(Message),

    /// The roster was replaced.
    RosterReplaced {
        /// Size of the new roster.
        participants: usize,
    },
}
