//! JSON-encoded socket events.
//!
//! Every event travels as one WebSocket text frame holding an adjacently
//! tagged object: `event` names the event and `data` carries its payload.
//! Client and server events are separate enums so neither side can emit the
//! other's events by construction.

pub mod chat;
pub mod presence;

use serde::{Deserialize, Serialize};

use crate::errors::{ProtocolError, Result};

/// Events sent from the client to the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Announce membership in a room (`join_room`).
    JoinRoom(chat::JoinRoom),
    /// Publish a chat line to a room (`send_message`).
    SendMessage(chat::OutboundMessage),
}

/// Events pushed from the server to the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ServerMessage {
    /// Chat line broadcast to every room member, sender included
    /// (`receive_message`).
    ReceiveMessage(chat::InboundMessage),
    /// Complete list of current participants (`room_users`).
    RoomUsers(Vec<presence::RosterEntry>),
}

impl ClientMessage {
    /// Wire event name.
    pub fn event_name(&self) -> &'static str {
        match self {
            Self::JoinRoom(_) => "join_room",
            Self::SendMessage(_) => "send_message",
        }
    }

    /// Encode as a JSON text frame.
    pub fn encode(&self) -> Result<String> {
        serde_json::to_string(self).map_err(ProtocolError::Encode)
    }

    /// Decode from a JSON text frame.
    pub fn decode(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(ProtocolError::Decode)
    }
}

impl ServerMessage {
    /// Wire event name.
    pub fn event_name(&self) -> &'static str {
        match self {
            Self::ReceiveMessage(_) => "receive_message",
            Self::RoomUsers(_) => "room_users",
        }
    }

    /// Encode as a JSON text frame.
    pub fn encode(&self) -> Result<String> {
        serde_json::to_string(self).map_err(ProtocolError::Encode)
    }

    /// Decode from a JSON text frame.
    pub fn decode(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(ProtocolError::Decode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{InboundMessage, RoomId, RosterEntry};

    #[test]
    fn decode_receive_message() {
        let msg = ServerMessage::decode(
            r#"{"event":"receive_message","data":{"username":"alice","message":"hi"}}"#,
        );

        assert!(matches!(
            msg,
            Ok(ServerMessage::ReceiveMessage(InboundMessage { ref username, ref message }))
                if username == "alice" && message == "hi"
        ));
    }

    #[test]
    fn decode_room_users() {
        let msg = ServerMessage::decode(
            r#"{"event":"room_users","data":[{"id":1,"username":"alice","online":true}]}"#,
        );

        let Ok(ServerMessage::RoomUsers(users)) = msg else {
            unreachable!("expected room_users");
        };
        assert_eq!(users, vec![RosterEntry::new(1, "alice", true)]);
    }

    #[test]
    fn decode_rejects_unknown_event() {
        let msg = ServerMessage::decode(r#"{"event":"typing","data":{"username":"bob"}}"#);
        assert!(matches!(msg, Err(ProtocolError::Decode(_))));
    }

    #[test]
    fn decode_rejects_client_event() {
        let msg = ServerMessage::decode(
            r#"{"event":"join_room","data":{"roomId":"abc","username":"alice"}}"#,
        );
        assert!(msg.is_err());
    }

    #[test]
    fn event_names_match_tags() {
        let join = ClientMessage::JoinRoom(chat::JoinRoom {
            room_id: RoomId::parse("abc").unwrap(),
            username: "alice".into(),
        });
        let encoded = join.encode().unwrap();
        assert!(encoded.contains(&format!("\"event\":\"{}\"", join.event_name())));
    }
}
