//! Application state machine.
//!
//! This module defines the [`App`] state machine, which manages the interactive
//! state of the application completely decoupled from I/O and protocol
//! mechanics.
//!
//! This is a pure state machine: it consumes [`crate::AppEvent`] inputs and
//! produces [`crate::AppAction`] instructions for the runtime to execute.
//!
//! # Responsibilities
//!
//! - Parses input lines into room commands and chat text.
//! - Tracks the coarse room connection state for UI feedback.
//! - Keeps the status line the user sees while a room is checked, joined,
//!   left or lost.
//!
//! The message log and roster are not copied here. Renderers read them from
//! the client's session.

use parley_client::{EndReason, RoomId, SessionPhase, ValidationState};

use crate::{AppAction, AppEvent, Command, ConnectionState};

/// Status shown while the directory check is running.
pub const STATUS_CHECKING: &str = "Checking...";

/// Status shown once the room exists and the connection is opening.
pub const STATUS_CONNECTING: &str = "Room found. Connecting...";

/// Application state machine.
///
/// Pure state machine that processes events and produces actions.
/// No I/O dependencies - fully testable in simulation.
#[derive(Debug, Clone, Default)]
pub struct App {
    /// Room connection state.
    state: ConnectionState,
    /// Transient status message. `None` if no message.
    status_message: Option<String>,
}

impl App {
    /// Create a new App with no room selected.
    pub fn new() -> Self {
        Self::default()
    }

    /// Process an event and return actions.
    pub fn handle(&mut self, event: AppEvent) -> Vec<AppAction> {
        match event {
            AppEvent::Line(line) => self.handle_line(&line),
            AppEvent::Validation { room_id, state } => {
                self.handle_validation(room_id, &state);
                vec![AppAction::Render]
            },
            AppEvent::Session { room_id, phase } => {
                self.handle_session(room_id, phase);
                vec![AppAction::Render]
            },
            AppEvent::MessageAppended(_) | AppEvent::RosterReplaced { .. } => {
                vec![AppAction::Render]
            },
            AppEvent::Error { message } => {
                self.set_status(format!("Error: {message}"));
                vec![AppAction::Render]
            },
        }
    }

    fn handle_line(&mut self, line: &str) -> Vec<AppAction> {
        match Command::parse(line) {
            Command::Join(room_id) => self.enter_room(room_id),
            Command::Leave => self.leave_room(),
            Command::Quit => self.quit(),
            Command::Say(text) => self.send_message(text),
            Command::MissingRoom => {
                self.set_status("Usage: /join <room>");
                vec![AppAction::Render]
            },
            Command::Unknown(name) => {
                self.set_status(format!("Unknown command: /{name}"));
                vec![AppAction::Render]
            },
        }
    }

    fn handle_validation(&mut self, room_id: RoomId, state: &ValidationState) {
        match state {
            ValidationState::Checking => {
                self.set_status(STATUS_CHECKING);
                self.state = ConnectionState::Checking { room_id };
            },
            ValidationState::Valid => {
                self.set_status(STATUS_CONNECTING);
                self.state = ConnectionState::Connecting { room_id };
            },
            ValidationState::Invalid(rejection) => {
                self.set_status(format!("Error: {}", rejection.reason()));
                self.state = ConnectionState::Failed { room_id };
            },
        }
    }

    fn handle_session(&mut self, room_id: RoomId, phase: SessionPhase) {
        match phase {
            SessionPhase::Idle => {},
            SessionPhase::Joining => {
                self.state = ConnectionState::Connecting { room_id };
            },
            SessionPhase::Joined => {
                self.set_status(format!("Joined room {room_id}"));
                self.state = ConnectionState::Joined { room_id };
            },
            SessionPhase::Ended(EndReason::Left) => {
                self.set_status(format!("Left room {room_id}"));
                self.state = ConnectionState::Idle;
            },
            // A new check follows immediately and sets its own status.
            SessionPhase::Ended(EndReason::RoomChanged) => {},
            SessionPhase::Ended(EndReason::ConnectionLost { reason }) => {
                self.set_status(format!("Disconnected: {reason}"));
                self.state = ConnectionState::Failed { room_id };
            },
        }
    }

    fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
    }

    /// Select a room.
    pub fn enter_room(&self, room_id: impl Into<String>) -> Vec<AppAction> {
        vec![AppAction::EnterRoom { room_id: room_id.into() }, AppAction::Render]
    }

    /// Send a chat line to the current room.
    pub fn send_message(&self, text: impl Into<String>) -> Vec<AppAction> {
        vec![AppAction::SendMessage { text: text.into() }, AppAction::Render]
    }

    /// Leave the current room.
    pub fn leave_room(&self) -> Vec<AppAction> {
        vec![AppAction::LeaveRoom, AppAction::Render]
    }

    /// Quit the application.
    pub fn quit(&self) -> Vec<AppAction> {
        vec![AppAction::Quit]
    }

    /// Current room connection state.
    pub fn connection_state(&self) -> &ConnectionState {
        &self.state
    }

    /// Room the UI is currently showing. `None` when idle.
    pub fn room_id(&self) -> Option<&RoomId> {
        self.state.room_id()
    }

    /// Transient status message. `None` if no message.
    pub fn status_message(&self) -> Option<&str> {
        self.status_message.as_deref()
    }
}
