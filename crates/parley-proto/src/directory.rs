//! Room directory response bodies.
//!
//! The directory answers `GET /rooms/{roomId}` with a success status when the
//! room exists. Any other status may carry a JSON body with a reason.

use serde::{Deserialize, Serialize};

/// Body of a non-success directory response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RejectionBody {
    /// Human-readable reason. Absent when the server gives none.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub msg: Option<String>,
}

impl RejectionBody {
    /// Parse a response body, returning `None` for anything that is not a
    /// JSON object.
    pub fn parse(body: &str) -> Option<Self> {
        serde_json::from_str(body).ok()
    }

    /// The reason, if present and not blank.
    pub fn reason(&self) -> Option<&str> {
        self.msg.as_deref().filter(|msg| !msg.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_reason() {
        let body = RejectionBody::parse(r#"{"msg":"Room does not exist"}"#);
        assert_eq!(body.as_ref().and_then(RejectionBody::reason), Some("Room does not exist"));
    }

    #[test]
    fn missing_or_empty_msg_has_no_reason() {
        assert_eq!(RejectionBody::parse("{}").as_ref().and_then(RejectionBody::reason), None);
        assert_eq!(
            RejectionBody::parse(r#"{"msg":""}"#).as_ref().and_then(RejectionBody::reason),
            None
        );
    }

    #[test]
    fn unparseable_body_is_none() {
        assert_eq!(RejectionBody::parse("<html>Not Found</html>"), None);
        assert_eq!(RejectionBody::parse(""), None);
    }

    #[test]
    fn ignores_unknown_fields() {
        let body = RejectionBody::parse(r#"{"msg":"gone","code":404}"#);
        assert_eq!(body.and_then(|b| b.msg), Some("gone".to_owned()));
    }
}
