//! Live room session.
//!
//! A [`RoomSession`] exists only for a room that passed the gate. It tracks
//! the connection phase, builds outbound records, and folds inbound events
//! into the [`MessageLog`] and [`Roster`] view models.
//!
//! # State Machine
//!
//! ```text
//! ┌──────┐  start   ┌─────────┐  connection open  ┌────────┐
//! │ Idle │─────────>│ Joining │──────────────────>│ Joined │
//! └──────┘          └─────────┘                   └────────┘
//!                        │ leave / lost               │ leave / lost
//!                        ↓                            ↓
//!                   ┌───────┐                     ┌───────┐
//!                   │ Ended │                     │ Ended │
//!                   └───────┘                     └───────┘
//! ```
//!
//! `Ended` is final. A new session is created for a new room id; there is no
//! path back to `Joining`.

use std::fmt;

use parley_proto::{ClientMessage, JoinRoom, OutboundMessage, RoomId, ServerMessage};

use crate::{
    error::SendSkipped,
    identity::Identity,
    view::{Message, MessageLog, Roster},
};

/// Why a session ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EndReason {
    /// The user left the room or the client was torn down.
    Left,
    /// A different room was selected.
    RoomChanged,
    /// The connection failed or was closed by the server.
    ConnectionLost {
        /// Transport description of the failure.
        reason: String,
    },
}

impl fmt::Display for EndReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Left => f.write_str("left room"),
            Self::RoomChanged => f.write_str("switched room"),
            Self::ConnectionLost { reason } => write!(f, "connection lost: {reason}"),
        }
    }
}

/// Connection phase of a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionPhase {
    /// Created, no connection requested.
    Idle,
    /// Connection requested, not yet open.
    Joining,
    /// Connection open and membership announced.
    Joined,
    /// Connection released. Final.
    Ended(EndReason),
}

impl SessionPhase {
    /// `true` while a connection is requested or open.
    pub fn holds_connection(&self) -> bool {
        matches!(self, Self::Joining | Self::Joined)
    }
}

/// Inbound event after it has been folded into the view models.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Received {
    /// One message appended to the log.
    Message(Message),
    /// Roster replaced with this many entries.
    Roster(usize),
}

/// Session for one validated room.
#[derive(Debug, Clone)]
pub struct RoomSession {
    room_id: RoomId,
    identity: Identity,
    phase: SessionPhase,
    messages: MessageLog,
    roster: Roster,
}

impl RoomSession {
    /// New idle session for `room_id`.
    pub fn new(room_id: RoomId, identity: Identity) -> Self {
        Self {
            room_id,
            identity,
            phase: SessionPhase::Idle,
            messages: MessageLog::new(),
            roster: Roster::new(),
        }
    }

    /// Move to `Joining`. Returns `false` unless the session was idle.
    pub fn start(&mut self) -> bool {
        if self.phase != SessionPhase::Idle {
            return false;
        }
        self.phase = SessionPhase::Joining;
        tracing::debug!(room_id = %self.room_id, "session joining");
        true
    }

    /// The connection is open: move to `Joined` and return the membership
    /// announcement to send.
    ///
    /// `None` if the session was not waiting for a connection.
    pub fn connection_opened(&mut self) -> Option<ClientMessage> {
        if self.phase != SessionPhase::Joining {
            return None;
        }
        self.phase = SessionPhase::Joined;
        tracing::info!(room_id = %self.room_id, user = self.identity.name(), "joined room");

        Some(ClientMessage::JoinRoom(JoinRoom {
            room_id: self.room_id.clone(),
            username: self.identity.name().to_owned(),
        }))
    }

    /// Build the outbound record for a chat line.
    ///
    /// Nothing is appended locally: the server echoes the line back to its
    /// sender and that echo is what lands in the log.
    pub fn prepare_send(&self, text: &str) -> Result<ClientMessage, SendSkipped> {
        if text.trim().is_empty() {
            return Err(SendSkipped::EmptyInput);
        }
        if self.phase != SessionPhase::Joined {
            return Err(SendSkipped::NotConnected);
        }

        Ok(ClientMessage::SendMessage(OutboundMessage {
            room_id: self.room_id.clone(),
            message: text.to_owned(),
            username: self.identity.name().to_owned(),
        }))
    }

    /// Fold an inbound server event into the view models.
    ///
    /// `None` if the session holds no connection, in which case the event is
    /// dropped.
    pub fn receive(&mut self, message: ServerMessage) -> Option<Received> {
        if !self.phase.holds_connection() {
            tracing::debug!(
                room_id = %self.room_id,
                event = message.event_name(),
                "dropping event outside of a live session"
            );
            return None;
        }

        match message {
            ServerMessage::ReceiveMessage(inbound) => {
                let appended =
                    self.messages.append(inbound.username, inbound.message, self.identity.name());
                Some(Received::Message(appended.clone()))
            },
            ServerMessage::RoomUsers(snapshot) => {
                self.roster.replace(snapshot);
                Some(Received::Roster(self.roster.len()))
            },
        }
    }

    /// End the session.
    ///
    /// Returns `true` if a connection was held and must be released. Calling
    /// this on an ended session changes nothing and returns `false`.
    pub fn end(&mut self, reason: EndReason) -> bool {
        if matches!(self.phase, SessionPhase::Ended(_)) {
            return false;
        }
        let held = self.phase.holds_connection();
        tracing::info!(room_id = %self.room_id, %reason, "session ended");
        self.phase = SessionPhase::Ended(reason);
        held
    }

    /// The transport failed or the server closed the connection.
    ///
    /// Ends the session with [`EndReason::ConnectionLost`]. The views are kept
    /// as they were. Returns `true` if a connection was held.
    pub fn connection_lost(&mut self, reason: impl Into<String>) -> bool {
        self.end(EndReason::ConnectionLost { reason: reason.into() })
    }

    /// Room this session belongs to.
    pub fn room_id(&self) -> &RoomId {
        &self.room_id
    }

    /// Identity the session was opened with.
    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    /// Current phase.
    pub fn phase(&self) -> &SessionPhase {
        &self.phase
    }

    /// Received messages.
    pub fn messages(&self) -> &MessageLog {
        &self.messages
    }

    /// Latest presence snapshot.
    pub fn roster(&self) -> &Roster {
        &self.roster
    }
}

#[cfg(test)]
mod tests {
    use parley_proto::{InboundMessage, RosterEntry};

    use super::*;

    fn idle(name: &str) -> RoomSession {
        RoomSession::new(RoomId::parse("abc").unwrap(), Identity::new(name).unwrap())
    }

    fn joined(name: &str) -> RoomSession {
        let mut session = idle(name);
        session.start();
        session.connection_opened();
        session
    }

    fn chat(username: &str, message: &str) -> ServerMessage {
        ServerMessage::ReceiveMessage(InboundMessage {
            username: username.into(),
            message: message.into(),
        })
    }

    fn users(names: &[&str]) -> ServerMessage {
        ServerMessage::RoomUsers(
            names
                .iter()
                .enumerate()
                .map(|(i, name)| RosterEntry::new(i as u64, *name, true))
                .collect(),
        )
    }

    #[test]
    fn start_only_from_idle() {
        let mut session = idle("alice");
        assert!(session.start());
        assert!(!session.start());
        assert_eq!(session.phase(), &SessionPhase::Joining);
    }

    #[test]
    fn open_announces_membership() {
        let mut session = idle("alice");
        session.start();

        let announce = session.connection_opened();
        assert_eq!(
            announce,
            Some(ClientMessage::JoinRoom(JoinRoom {
                room_id: RoomId::parse("abc").unwrap(),
                username: "alice".into(),
            }))
        );
        assert_eq!(session.phase(), &SessionPhase::Joined);
        assert_eq!(session.connection_opened(), None);
    }

    #[test]
    fn open_before_start_is_ignored() {
        let mut session = idle("alice");
        assert_eq!(session.connection_opened(), None);
        assert_eq!(session.phase(), &SessionPhase::Idle);
    }

    #[test]
    fn send_keeps_text_as_typed() {
        let session = joined("alice");
        let Ok(ClientMessage::SendMessage(out)) = session.prepare_send("  hi  ") else {
            unreachable!("joined session must produce an outbound record");
        };

        assert_eq!(out.message, "  hi  ");
        assert_eq!(out.username, "alice");
        assert_eq!(out.room_id.as_str(), "abc");
    }

    #[test]
    fn send_skips_blank_text() {
        let session = joined("alice");
        assert_eq!(session.prepare_send(""), Err(SendSkipped::EmptyInput));
        assert_eq!(session.prepare_send(" \t\n"), Err(SendSkipped::EmptyInput));
        assert!(session.messages().is_empty());
    }

    #[test]
    fn send_skips_without_connection() {
        let mut session = idle("alice");
        assert_eq!(session.prepare_send("hi"), Err(SendSkipped::NotConnected));

        session.start();
        assert_eq!(session.prepare_send("hi"), Err(SendSkipped::NotConnected));
    }

    #[test]
    fn send_does_not_echo_locally() {
        let session = joined("alice");
        let _ = session.prepare_send("hi");
        assert!(session.messages().is_empty());
    }

    #[test]
    fn chat_event_appends_one_message() {
        let mut session = joined("alice");
        let received = session.receive(chat("alice", "hi"));

        assert!(matches!(received, Some(Received::Message(ref m)) if m.is_self && m.text == "hi"));
        assert_eq!(session.messages().len(), 1);

        session.receive(chat("bob", "yo"));
        let last = &session.messages().as_slice()[1];
        assert_eq!(last.sender, "bob");
        assert!(!last.is_self);
    }

    #[test]
    fn presence_replaces_roster() {
        let mut session = joined("alice");
        session.receive(users(&["alice", "bob", "carol"]));
        let received = session.receive(users(&["alice"]));

        assert_eq!(received, Some(Received::Roster(1)));
        assert_eq!(session.roster().len(), 1);
    }

    #[test]
    fn events_after_end_are_dropped() {
        let mut session = joined("alice");
        session.receive(chat("bob", "before"));
        session.end(EndReason::Left);

        assert_eq!(session.receive(chat("bob", "after")), None);
        assert_eq!(session.messages().len(), 1);
    }

    #[test]
    fn end_is_idempotent() {
        let mut session = joined("alice");
        assert!(session.end(EndReason::Left));
        assert!(!session.end(EndReason::Left));
        assert!(!session.end(EndReason::ConnectionLost { reason: "reset".into() }));
        assert_eq!(session.phase(), &SessionPhase::Ended(EndReason::Left));
    }

    #[test]
    fn ending_idle_session_releases_nothing() {
        let mut session = idle("alice");
        assert!(!session.end(EndReason::RoomChanged));
    }

    #[test]
    fn lost_connection_freezes_views() {
        let mut session = joined("alice");
        session.receive(chat("bob", "hi"));
        session.receive(users(&["alice", "bob"]));
        assert!(session.connection_lost("reset"));

        assert_eq!(
            session.phase(),
            &SessionPhase::Ended(EndReason::ConnectionLost { reason: "reset".into() })
        );
        assert_eq!(session.messages().len(), 1);
        assert_eq!(session.roster().len(), 2);
        assert_eq!(session.prepare_send("still there?"), Err(SendSkipped::NotConnected));
    }

    #[test]
    fn connection_lost_while_joining_releases_the_request() {
        let mut session = idle("alice");
        session.start();

        assert!(session.connection_lost("refused"));
        assert!(!session.connection_lost("refused again"));
        assert_eq!(session.connection_opened(), None);
        assert!(!session.start());
    }
}
