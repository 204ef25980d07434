//! Parley protocol
//!
//! Wire-level types shared by the room directory and the messaging channel.
//!
//! # Components
//!
//! - [`RoomId`]: trimmed, non-empty room identifier
//! - [`ClientMessage`] / [`ServerMessage`]: events carried over the socket
//! - [`RejectionBody`]: body returned by the directory for unknown rooms
//!
//! Socket events are JSON text frames of the form
//! `{"event": "<name>", "data": <payload>}`.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod directory;
pub mod errors;
pub mod payloads;
mod room;

pub use directory::RejectionBody;
pub use errors::ProtocolError;
pub use payloads::{
    ClientMessage, ServerMessage,
    chat::{InboundMessage, JoinRoom, OutboundMessage},
    presence::{ParticipantId, RosterEntry, UNKNOWN_USER},
};
pub use room::RoomId;
