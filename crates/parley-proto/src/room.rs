use std::{fmt, ops::Deref};

use serde::{Deserialize, Serialize};

/// Identifier of a single room.
///
/// Built from user input with surrounding whitespace removed. A `RoomId`
/// created through [`RoomId::parse`] is never empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomId(String);

impl RoomId {
    /// Trim `raw` and wrap it. `None` if nothing is left after trimming.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() { None } else { Some(Self(trimmed.to_owned())) }
    }

    /// Room identifier as sent on the wire.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Deref for RoomId {
    type Target = str;

    fn deref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_trims_surrounding_whitespace() {
        assert_eq!(RoomId::parse("  abc \n").as_deref(), Some("abc"));
    }

    #[test]
    fn parse_keeps_inner_whitespace() {
        assert_eq!(RoomId::parse(" team room ").as_deref(), Some("team room"));
    }

    #[test]
    fn parse_rejects_blank() {
        assert_eq!(RoomId::parse(""), None);
        assert_eq!(RoomId::parse(" \t "), None);
    }
}
