//! View models derived from the inbound event stream.
//!
//! Both models only ever grow or get replaced. Entries are never edited in
//! place, so a renderer can hold on to indices between frames.

use std::fmt;

use parley_proto::RosterEntry;

/// Sender name the server uses for its own announcements.
pub const SYSTEM_SENDER: &str = "System";

/// Identifier of a received message, unique within one session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MessageId(u64);

impl MessageId {
    /// Raw value.
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A chat line as shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    /// Assigned on receipt.
    pub id: MessageId,
    /// Name the message was sent under.
    pub sender: String,
    /// Message text.
    pub text: String,
    /// `sender` equals the local user's name at the time of receipt.
    pub is_self: bool,
}

impl Message {
    /// `true` for a server announcement rather than a participant's line.
    pub fn is_system(&self) -> bool {
        !self.is_self && self.sender == SYSTEM_SENDER
    }
}

/// Append-only message log, in order of arrival.
#[derive(Debug, Clone, Default)]
pub struct MessageLog {
    entries: Vec<Message>,
    next_id: u64,
}

impl MessageLog {
    /// Empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a received message and return it.
    ///
    /// `is_self` is decided here by plain string comparison against
    /// `local_name`.
    pub fn append(&mut self, sender: String, text: String, local_name: &str) -> &Message {
        let id = MessageId(self.next_id);
        self.next_id += 1;

        let is_self = sender == local_name;
        let index = self.entries.len();
        self.entries.push(Message { id, sender, text, is_self });
        &self.entries[index]
    }

    /// Messages in arrival order.
    pub fn as_slice(&self) -> &[Message] {
        &self.entries
    }

    /// Number of messages.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// `true` if nothing has been received.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Most recent presence snapshot.
#[derive(Debug, Clone, Default)]
pub struct Roster {
    entries: Vec<RosterEntry>,
}

impl Roster {
    /// Empty roster.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole roster with `snapshot`.
    pub fn replace(&mut self, snapshot: Vec<RosterEntry>) {
        self.entries = snapshot;
    }

    /// Participants in the order the server listed them.
    pub fn as_slice(&self) -> &[RosterEntry] {
        &self.entries
    }

    /// Number of participants.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// `true` if no snapshot or an empty one was received.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Participants flagged online.
    pub fn online_count(&self) -> usize {
        self.entries.iter().filter(|entry| entry.online).count()
    }
}
