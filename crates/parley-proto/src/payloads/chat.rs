//! Chat payloads.

use serde::{Deserialize, Serialize};

use crate::RoomId;

/// Membership announcement sent once per connection.
///
/// Fire-and-forget: the server answers with a `room_users` snapshot rather
/// than an acknowledgment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinRoom {
    /// Room being joined.
    pub room_id: RoomId,
    /// Display name of the joining user.
    pub username: String,
}

/// Chat line sent by this client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutboundMessage {
    /// Target room.
    pub room_id: RoomId,
    /// Message text as typed.
    pub message: String,
    /// Display name of the sender.
    pub username: String,
}

/// Chat line relayed by the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InboundMessage {
    /// Display name the message was sent under.
    pub username: String,
    /// Message text.
    pub message: String,
}
