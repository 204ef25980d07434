//! Presence payloads.
//!
//! Servers are loose about roster entries: names may be `null`, ids may be
//! missing or fractional. A single odd entry must not cost the whole snapshot,
//! so every field here decodes leniently.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Name shown for a participant the server sent without one.
pub const UNKNOWN_USER: &str = "Unknown User";

/// Participant identifier as chosen by the server.
///
/// Servers use either numeric ids (sometimes timestamps with a fraction) or
/// socket id strings, so any JSON number or string is accepted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParticipantId {
    /// Numeric identifier, kept as sent.
    Number(serde_json::Number),
    /// String identifier.
    Text(String),
}

impl From<u64> for ParticipantId {
    fn from(id: u64) -> Self {
        Self::Number(id.into())
    }
}

impl From<&str> for ParticipantId {
    fn from(id: &str) -> Self {
        Self::Text(id.to_owned())
    }
}

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(id) => write!(f, "{id}"),
            Self::Text(id) => f.write_str(id),
        }
    }
}

/// One entry of a presence snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterEntry {
    /// Participant identifier. `None` when the server omitted it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ParticipantId>,
    /// Name as sent. `None` when missing or `null`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// Whether the participant is currently connected. Missing or `null`
    /// reads as offline.
    #[serde(default, deserialize_with = "null_as_false")]
    pub online: bool,
}

impl RosterEntry {
    /// Entry with every field present.
    pub fn new(id: impl Into<ParticipantId>, username: impl Into<String>, online: bool) -> Self {
        Self { id: Some(id.into()), username: Some(username.into()), online }
    }

    /// Name to show: the sent name, or [`UNKNOWN_USER`] if it is missing or
    /// empty.
    pub fn display_name(&self) -> &str {
        self.username.as_deref().filter(|name| !name.is_empty()).unwrap_or(UNKNOWN_USER)
    }

    /// First character of the sent name, `'?'` without one.
    pub fn initial(&self) -> char {
        self.username.as_deref().and_then(|name| name.chars().next()).unwrap_or('?')
    }
}

fn null_as_false<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    Ok(Option::<bool>::deserialize(deserializer)?.unwrap_or_default())
}
