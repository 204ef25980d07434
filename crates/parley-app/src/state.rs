//! Observable application state types.
//!
//! [`ConnectionState`] is the App's coarse view of the room lifecycle, enough
//! to drive a prompt or status indicator without reaching into the client.

use parley_client::RoomId;

/// Room connection state as seen by the UI.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ConnectionState {
    /// No room selected, or the last room was left.
    #[default]
    Idle,
    /// Waiting for the directory to answer.
    Checking {
        /// Room being checked.
        room_id: RoomId,
    },
    /// Room exists, connection opening.
    Connecting {
        /// Room being joined.
        room_id: RoomId,
    },
    /// Connection open and membership announced.
    Joined {
        /// Joined room.
        room_id: RoomId,
    },
    /// Room rejected or connection lost. Cleared by selecting a room.
    Failed {
        /// Room that failed.
        room_id: RoomId,
    },
}

impl ConnectionState {
    /// Room this state refers to. `None` when idle.
    pub fn room_id(&self) -> Option<&RoomId> {
        match self {
            Self::Idle => None,
            Self::Checking { room_id }
            | Self::Connecting { room_id }
            | Self::Joined { room_id }
            | Self::Failed { room_id } => Some(room_id),
        }
    }

    /// `true` once the room is joined.
    pub fn is_joined(&self) -> bool {
        matches!(self, Self::Joined { .. })
    }
}
