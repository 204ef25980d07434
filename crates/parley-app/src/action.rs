//! Application side-effects and intents.
//!
//! This module defines the [`AppAction`] enum, which represents instructions
//! produced by the [`crate::App`] state machine for the runtime to execute.

/// Actions produced by the App state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppAction {
    /// Render the UI.
    Render,

    /// Quit the application.
    Quit,

    /// Select a room. Trimming and validation happen in the client.
    EnterRoom {
        /// Room id as typed.
        room_id: String,
    },

    /// Send a chat line to the current room.
    SendMessage {
        /// Text as typed.
        text: String,
    },

    /// Leave the current room.
    LeaveRoom,
}
