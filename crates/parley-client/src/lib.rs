//! Client
//!
//! Action-based room session state machine. Validates that a room exists,
//! manages the lifecycle of the streaming connection, and folds chat and
//! presence events into view models.
//!
//! # Architecture
//!
//! The client is Sans-IO. It receives events ([`ClientEvent`]), processes
//! them through pure state machine logic, and returns actions
//! ([`ClientAction`]) for the caller to execute. Directory checks, socket I/O
//! and timers all live with the caller.
//!
//! # Components
//!
//! - [`Client`]: Top-level state machine for the selected room
//! - [`RoomGate`]: Room existence check (`Checking -> Valid | Invalid`)
//! - [`RoomSession`]: Connection phase and view models of a valid room
//! - [`MessageLog`] / [`Roster`]: Append-only and replace-only view models
//!
//! # Transport (optional)
//!
//! With the `transport` feature enabled, this crate also provides:
//! - [`directory::HttpDirectory`]: HTTP room directory client
//! - [`transport::connect`]: WebSocket connection to the room server

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod client;
mod error;
mod event;
mod gate;
mod identity;
mod session;
mod view;

#[cfg(feature = "transport")]
pub mod directory;
#[cfg(feature = "transport")]
pub mod transport;

pub use client::Client;
pub use error::{
    ClientError, DIRECTORY_UNREACHABLE_REASON, ROOM_NOT_FOUND_REASON, RoomRejection, SendSkipped,
};
pub use event::{ClientAction, ClientEvent, ConnectionEvent};
pub use gate::{DirectoryResponse, RoomGate, ValidationState};
pub use identity::{Identity, IdentityFile, IdentitySource};
pub use parley_proto::{ClientMessage, RoomId, RosterEntry, ServerMessage};
pub use session::{EndReason, Received, RoomSession, SessionPhase};
pub use view::{Message, MessageId, MessageLog, Roster, SYSTEM_SENDER};
