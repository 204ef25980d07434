//! Room existence check.
//!
//! The gate decides once per room id whether a streaming connection may be
//! opened. It issues the directory check and interprets the single answer.
//!
//! # State Machine
//!
//! ```text
//!              found            ┌───────┐
//!          ┌───────────────────>│ Valid │
//! ┌──────────┐                  └───────┘
//! │ Checking │
//! └──────────┘  rejected / unreachable  ┌─────────┐
//!          └───────────────────────────>│ Invalid │
//!                                       └─────────┘
//! ```
//!
//! Both end states are terminal for the observed room id. Observing a
//! different room id starts over in `Checking`.

use parley_proto::{RejectionBody, RoomId};

use crate::error::{ROOM_NOT_FOUND_REASON, RoomRejection};

/// Validation state of the current room.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationState {
    /// Directory check in flight.
    Checking,
    /// Room exists; a session may start.
    Valid,
    /// Room refused or directory unreachable.
    Invalid(RoomRejection),
}

impl ValidationState {
    /// User-facing reason for an invalid room.
    pub fn reason(&self) -> Option<&str> {
        match self {
            Self::Invalid(rejection) => Some(rejection.reason()),
            Self::Checking | Self::Valid => None,
        }
    }

    /// `true` once the state will no longer change for this room.
    pub fn is_resolved(&self) -> bool {
        !matches!(self, Self::Checking)
    }
}

/// Answer from the room directory, as seen by the caller that ran the check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirectoryResponse {
    /// Success status: the room exists.
    Found,
    /// Non-success status.
    Rejected {
        /// HTTP status code.
        status: u16,
        /// Status text for the code, if known.
        status_text: Option<String>,
        /// Raw response body, if one could be read.
        body: Option<String>,
    },
    /// The request never got an answer.
    Unreachable {
        /// Transport failure description.
        detail: String,
    },
}

impl DirectoryResponse {
    /// Interpret the response as a validation outcome.
    ///
    /// A rejection reason is taken from the body's `msg`, else the status
    /// text, else a generic fallback.
    pub fn into_validation(self) -> ValidationState {
        match self {
            Self::Found => ValidationState::Valid,
            Self::Rejected { status_text, body, .. } => {
                let from_body = body
                    .as_deref()
                    .and_then(RejectionBody::parse)
                    .and_then(|b| b.reason().map(str::to_owned));
                let reason = from_body
                    .or_else(|| status_text.filter(|text| !text.is_empty()))
                    .unwrap_or_else(|| ROOM_NOT_FOUND_REASON.to_owned());
                ValidationState::Invalid(RoomRejection::RoomNotFound { reason })
            },
            Self::Unreachable { detail } => {
                ValidationState::Invalid(RoomRejection::DirectoryUnreachable { detail })
            },
        }
    }
}

/// Gate in front of the streaming connection.
#[derive(Debug, Clone, Default)]
pub struct RoomGate {
    /// Most recently observed room. `None` before the first observation.
    room_id: Option<RoomId>,
    /// Validation state of `room_id`.
    state: Option<ValidationState>,
}

impl RoomGate {
    /// Gate that has not observed any room yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an observed room id.
    ///
    /// Returns `true` if a directory check must be issued, which happens only
    /// when `room_id` differs from the previously observed one.
    pub fn observe(&mut self, room_id: &RoomId) -> bool {
        if self.room_id.as_ref() == Some(room_id) {
            return false;
        }
        self.room_id = Some(room_id.clone());
        self.state = Some(ValidationState::Checking);
        true
    }

    /// Apply the directory answer for `room_id`.
    ///
    /// Returns the new state, or `None` when the answer is for a room that is
    /// no longer current or the current room was already resolved.
    pub fn resolve(
        &mut self,
        room_id: &RoomId,
        response: DirectoryResponse,
    ) -> Option<&ValidationState> {
        if self.room_id.as_ref() != Some(room_id) {
            tracing::debug!(%room_id, "ignoring directory answer for stale room");
            return None;
        }
        if self.state.as_ref().is_some_and(ValidationState::is_resolved) {
            tracing::debug!(%room_id, "ignoring repeated directory answer");
            return None;
        }

        let state = response.into_validation();
        match &state {
            ValidationState::Invalid(RoomRejection::DirectoryUnreachable { detail }) => {
                tracing::warn!(%room_id, %detail, "room directory unreachable");
            },
            ValidationState::Invalid(rejection) => {
                tracing::info!(%room_id, reason = rejection.reason(), "room rejected");
            },
            ValidationState::Valid => tracing::info!(%room_id, "room found"),
            ValidationState::Checking => {},
        }
        self.state = Some(state);
        self.state.as_ref()
    }

    /// Forget the observed room, so that observing it again issues a fresh
    /// check. A pending answer for it becomes stale.
    pub fn forget(&mut self) {
        self.room_id = None;
        self.state = None;
    }

    /// Currently observed room.
    pub fn room_id(&self) -> Option<&RoomId> {
        self.room_id.as_ref()
    }

    /// Validation state of the current room. `None` before the first
    /// observation.
    pub fn state(&self) -> Option<&ValidationState> {
        self.state.as_ref()
    }

    /// `true` if the current room passed validation.
    pub fn is_valid(&self) -> bool {
        matches!(self.state, Some(ValidationState::Valid))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DIRECTORY_UNREACHABLE_REASON;

    fn room(raw: &str) -> RoomId {
        RoomId::parse(raw).unwrap()
    }

    fn rejected(status_text: Option<&str>, body: Option<&str>) -> DirectoryResponse {
        DirectoryResponse::Rejected {
            status: 404,
            status_text: status_text.map(str::to_owned),
            body: body.map(str::to_owned),
        }
    }

    #[test]
    fn found_is_valid() {
        assert_eq!(DirectoryResponse::Found.into_validation(), ValidationState::Valid);
    }

    #[test]
    fn reason_comes_from_body() {
        let state =
            rejected(Some("Not Found"), Some(r#"{"msg":"Room does not exist"}"#)).into_validation();
        assert_eq!(state.reason(), Some("Room does not exist"));
    }

    #[test]
    fn unparseable_body_falls_back_to_status_text() {
        assert_eq!(rejected(Some("Not Found"), Some("<h1>404</h1>")).into_validation().reason(), Some("Not Found"));
        assert_eq!(rejected(Some("Not Found"), None).into_validation().reason(), Some("Not Found"));
        assert_eq!(
            rejected(Some("Not Found"), Some(r#"{"msg":""}"#)).into_validation().reason(),
            Some("Not Found")
        );
    }

    #[test]
    fn no_reason_anywhere_uses_fallback() {
        assert_eq!(rejected(None, None).into_validation().reason(), Some(ROOM_NOT_FOUND_REASON));
        assert_eq!(rejected(Some(""), Some("{}")).into_validation().reason(), Some(ROOM_NOT_FOUND_REASON));
    }

    #[test]
    fn unreachable_has_fixed_reason() {
        let state =
            DirectoryResponse::Unreachable { detail: "connection refused".into() }.into_validation();

        assert_eq!(state.reason(), Some(DIRECTORY_UNREACHABLE_REASON));
        assert!(matches!(
            state,
            ValidationState::Invalid(RoomRejection::DirectoryUnreachable { ref detail })
                if detail == "connection refused"
        ));
    }

    #[test]
    fn unreachable_differs_from_server_reason() {
        let server = rejected(None, Some(r#"{"msg":"error connecting to server"}"#)).into_validation();
        let network = DirectoryResponse::Unreachable { detail: String::new() }.into_validation();

        assert_eq!(server.reason(), network.reason());
        assert_ne!(server, network);
    }

    #[test]
    fn observe_same_room_twice_checks_once() {
        let mut gate = RoomGate::new();
        assert!(gate.observe(&room("abc")));
        assert!(!gate.observe(&room("abc")));
        assert_eq!(gate.state(), Some(&ValidationState::Checking));
    }

    #[test]
    fn observe_new_room_restarts_check() {
        let mut gate = RoomGate::new();
        gate.observe(&room("abc"));
        gate.resolve(&room("abc"), DirectoryResponse::Found);

        assert!(gate.observe(&room("xyz")));
        assert_eq!(gate.state(), Some(&ValidationState::Checking));
        assert!(!gate.is_valid());
    }

    #[test]
    fn resolve_is_applied_once() {
        let mut gate = RoomGate::new();
        gate.observe(&room("abc"));

        assert_eq!(gate.resolve(&room("abc"), DirectoryResponse::Found), Some(&ValidationState::Valid));
        assert_eq!(gate.resolve(&room("abc"), rejected(None, None)), None);
        assert!(gate.is_valid());
    }

    #[test]
    fn resolve_for_stale_room_is_ignored() {
        let mut gate = RoomGate::new();
        gate.observe(&room("abc"));
        gate.observe(&room("xyz"));

        assert_eq!(gate.resolve(&room("abc"), DirectoryResponse::Found), None);
        assert_eq!(gate.state(), Some(&ValidationState::Checking));
    }

    #[test]
    fn resolve_before_observe_is_ignored() {
        let mut gate = RoomGate::new();
        assert_eq!(gate.resolve(&room("abc"), DirectoryResponse::Found), None);
        assert_eq!(gate.state(), None);
    }

    #[test]
    fn forget_allows_fresh_check_of_same_room() {
        let mut gate = RoomGate::new();
        assert!(gate.observe(&room("abc")));
        gate.forget();
        assert_eq!(gate.room_id(), None);
        assert_eq!(gate.resolve(&room("abc"), DirectoryResponse::Found), None);
        assert!(gate.observe(&room("abc")));
    }
}
