//! Client error taxonomy.
//!
//! Only [`ClientError`] is ever returned from [`crate::Client::handle`].
//! [`RoomRejection`] is a terminal validation outcome carried inside
//! [`crate::ValidationState::Invalid`], and [`SendSkipped`] is a silent no-op
//! that never leaves the client.

use thiserror::Error;

/// Reason shown when the room directory could not be reached.
pub const DIRECTORY_UNREACHABLE_REASON: &str = "error connecting to server";

/// Reason shown when the directory rejected a room without saying why.
pub const ROOM_NOT_FOUND_REASON: &str = "room not found";

/// Errors returned by client operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClientError {
    /// No usable identity is available. Nothing may be started without one.
    #[error("no identity available: {detail}")]
    PreconditionMissing {
        /// What was missing or unreadable.
        detail: String,
    },

    /// Room identifier was empty after trimming.
    #[error("room id is empty")]
    EmptyRoomId,
}

/// Why a room failed validation.
///
/// Both variants end in [`crate::ValidationState::Invalid`], but they read
/// differently to the user. The `Display` output is the user-facing reason.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RoomRejection {
    /// The directory answered and refused the room.
    #[error("{reason}")]
    RoomNotFound {
        /// Reason given by the server, or a fallback.
        reason: String,
    },

    /// The directory could not be reached at all.
    #[error("error connecting to server")]
    DirectoryUnreachable {
        /// Underlying transport failure, for logs.
        detail: String,
    },
}

impl RoomRejection {
    /// User-facing reason.
    pub fn reason(&self) -> &str {
        match self {
            Self::RoomNotFound { reason } => reason,
            Self::DirectoryUnreachable { .. } => DIRECTORY_UNREACHABLE_REASON,
        }
    }
}

/// Why an outbound chat line was dropped.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendSkipped {
    /// Text was empty or whitespace.
    #[error("message is empty")]
    EmptyInput,

    /// No connection is open.
    #[error("not connected to a room")]
    NotConnected,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejection_display_is_reason() {
        let not_found = RoomRejection::RoomNotFound { reason: "Room does not exist".into() };
        assert_eq!(not_found.to_string(), "Room does not exist");
        assert_eq!(not_found.reason(), "Room does not exist");

        let unreachable = RoomRejection::DirectoryUnreachable { detail: "refused".into() };
        assert_eq!(unreachable.to_string(), DIRECTORY_UNREACHABLE_REASON);
        assert_eq!(unreachable.reason(), DIRECTORY_UNREACHABLE_REASON);
    }
}
