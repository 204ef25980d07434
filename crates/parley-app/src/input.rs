//! Line command parsing.
//!
//! Lines starting with `/` are commands, everything else is chat text. A
//! doubled `//` escapes the slash: `//shrug` says `/shrug`.

/// A parsed input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `/join <room>`
    Join(String),
    /// `/leave`
    Leave,
    /// `/quit`
    Quit,
    /// Chat text, kept exactly as typed.
    Say(String),
    /// `/join` without a room.
    MissingRoom,
    /// Any other `/word`.
    Unknown(String),
}

impl Command {
    /// Parse one input line.
    pub fn parse(line: &str) -> Self {
        let Some(command) = line.trim_start().strip_prefix('/') else {
            return Self::Say(line.to_owned());
        };
        if command.starts_with('/') {
            return Self::Say(command.to_owned());
        }

        let command = command.trim_end();
        let (name, rest) = command.split_once(char::is_whitespace).unwrap_or((command, ""));
        match name {
            "" => Self::Say(line.to_owned()),
            "join" => {
                let room = rest.trim();
                if room.is_empty() { Self::MissingRoom } else { Self::Join(room.to_owned()) }
            },
            "leave" => Self::Leave,
            "quit" | "exit" => Self::Quit,
            other => Self::Unknown(other.to_owned()),
        }
    }
}
