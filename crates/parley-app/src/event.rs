//! Application input events.
//!
//! This module defines [`AppEvent`], the set of inputs that drive the
//! [`crate::App`] state machine.
//!
//! Events originate from two distinct sources:
//! - User input lines.
//! - Protocol notifications translated from the underlying client.

use parley_client::{Message, RoomId, SessionPhase, ValidationState};

/// Events processed by the App state machine.
#[derive(Debug, Clone)]
pub enum AppEvent {
    /// One line of user input, without the line terminator.
    Line(String),

    /// Room validation state changed.
    Validation {
        /// Room being validated.
        room_id: RoomId,
        /// New state.
        state: ValidationState,
    },

    /// Session phase changed.
    Session {
        /// Room of the session.
        room_id: RoomId,
        /// New phase.
        phase: SessionPhase,
    },

    /// A message was appended to the room log.
    MessageAppended(Message),

    /// The roster was replaced.
    RosterReplaced {
        /// Number of participants in the new roster.
        participants: usize,
    },

    /// Error occurred.
    Error {
        /// Error description.
        message: String,
    },
}
