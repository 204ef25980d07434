//! Plain text rendering.
//!
//! The terminal is append-only, so the [`Renderer`] remembers what it already
//! printed and writes only what changed since the previous render: new
//! messages, a changed roster, a changed status line. A joined room with an
//! empty log gets a one-time placeholder line.

use std::io::{self, Write};

use parley_app::App;
use parley_client::{Client, Message, RoomId, RosterEntry, SessionPhase};

/// Shown once per room while the log of a joined room is empty.
const EMPTY_LOG: &str = "No messages yet. Start the conversation!";

/// Incremental renderer for one terminal.
#[derive(Debug, Default)]
pub struct Renderer {
    /// Room whose log is being printed.
    room_id: Option<RoomId>,
    /// Messages of that log already printed.
    printed: usize,
    /// Empty-log placeholder already printed for that room.
    placeholder: bool,
    /// Roster as last printed.
    roster: Option<Vec<RosterEntry>>,
    /// Status line as last printed.
    status: Option<String>,
}

impl Renderer {
    /// Renderer that has printed nothing yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Write everything that changed since the last call.
    pub fn render(&mut self, out: &mut impl Write, app: &App, client: &Client) -> io::Result<()> {
        if let Some(session) = client.session() {
            let messages = session.messages().as_slice();
            if self.room_id.as_ref() != Some(session.room_id()) || messages.len() < self.printed {
                self.room_id = Some(session.room_id().clone());
                self.printed = 0;
                self.placeholder = false;
                self.roster = None;
            }

            if messages.is_empty() && !self.placeholder && session.phase() == &SessionPhase::Joined {
                writeln!(out, "-- {EMPTY_LOG}")?;
                self.placeholder = true;
            }

            for message in &messages[self.printed..] {
                write_message(out, message)?;
            }
            self.printed = messages.len();

            let roster = session.roster().as_slice();
            if self.roster.as_deref() != Some(roster) && (self.roster.is_some() || !roster.is_empty()) {
                write_roster(out, roster, session.roster().online_count())?;
                self.roster = Some(roster.to_vec());
            }
        }

        if let Some(status) = app.status_message()
            && self.status.as_deref() != Some(status)
        {
            writeln!(out, "-- {status}")?;
            self.status = Some(status.to_owned());
        }

        out.flush()
    }
}

fn write_message(out: &mut impl Write, message: &Message) -> io::Result<()> {
    if message.is_self {
        writeln!(out, "{} (you): {}", message.sender, message.text)
    } else if message.is_system() {
        writeln!(out, "[{}] {}", message.sender, message.text)
    } else {
        writeln!(out, "{}: {}", message.sender, message.text)
    }
}

fn write_roster(out: &mut impl Write, roster: &[RosterEntry], online: usize) -> io::Result<()> {
    if roster.is_empty() {
        return writeln!(out, "-- in room: nobody");
    }

    let names: Vec<String> = roster
        .iter()
        .map(|entry| {
            let name = format!("[{}] {}", entry.initial(), entry.display_name());
            if entry.online { name } else { format!("{name} (away)") }
        })
        .collect();
    writeln!(out, "-- in room ({}, {online} online): {}", roster.len(), names.join(", "))
}

#[cfg(test)]
mod tests {
    use parley_app::AppEvent;
    use parley_client::{ClientEvent, DirectoryResponse, Identity, ServerMessage, SessionPhase};
    use parley_proto::InboundMessage;

    use super::*;

    fn room(raw: &str) -> RoomId {
        RoomId::parse(raw).unwrap()
    }

    fn joined(room_id: &str) -> (App, Client) {
        let mut client = Client::new(Identity::new("alice").unwrap());
        client.handle(ClientEvent::EnterRoom { room_id: room_id.into() }).unwrap();
        client
            .handle(ClientEvent::DirectoryChecked {
                room_id: room(room_id),
                response: DirectoryResponse::Found,
            })
            .unwrap();
        client.handle(ClientEvent::ConnectionOpened).unwrap();

        let mut app = App::new();
        app.handle(AppEvent::Session { room_id: room(room_id), phase: SessionPhase::Joined });
        (app, client)
    }

    fn deliver(client: &mut Client, message: ServerMessage) {
        client.handle(ClientEvent::ServerMessage(message)).unwrap();
    }

    fn chat(username: &str, message: &str) -> ServerMessage {
        ServerMessage::ReceiveMessage(InboundMessage {
            username: username.into(),
            message: message.into(),
        })
    }

    fn render(renderer: &mut Renderer, app: &App, client: &Client) -> String {
        let mut out = Vec::new();
        renderer.render(&mut out, app, client).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn prints_only_what_changed() {
        let (app, mut client) = joined("abc");
        let mut renderer = Renderer::new();

        insta::assert_snapshot!(render(&mut renderer, &app, &client), @r"
        -- No messages yet. Start the conversation!
        -- Joined room abc
        ");

        deliver(&mut client, ServerMessage::RoomUsers(vec![
            RosterEntry::new(1, "alice", true),
            RosterEntry::new("b", "bob", false),
        ]));
        deliver(&mut client, chat("alice", "hi"));
        deliver(&mut client, chat("bob", "yo"));

        insta::assert_snapshot!(render(&mut renderer, &app, &client), @r"
        alice (you): hi
        bob: yo
        -- in room (2, 1 online): [a] alice, [b] bob (away)
        ");

        assert_eq!(render(&mut renderer, &app, &client), "");
    }

    #[test]
    fn emptied_roster_is_printed() {
        let (app, mut client) = joined("abc");
        let mut renderer = Renderer::new();
        render(&mut renderer, &app, &client);

        deliver(&mut client, ServerMessage::RoomUsers(vec![RosterEntry::new(1, "bob", true)]));
        render(&mut renderer, &app, &client);

        deliver(&mut client, ServerMessage::RoomUsers(vec![]));
        assert_eq!(render(&mut renderer, &app, &client), "-- in room: nobody\n");
    }

    #[test]
    fn new_room_starts_a_fresh_log() {
        let (mut app, mut client) = joined("abc");
        let mut renderer = Renderer::new();
        deliver(&mut client, chat("bob", "first"));
        render(&mut renderer, &app, &client);

        client.handle(ClientEvent::EnterRoom { room_id: "lobby".into() }).unwrap();
        client
            .handle(ClientEvent::DirectoryChecked {
                room_id: room("lobby"),
                response: DirectoryResponse::Found,
            })
            .unwrap();
        client.handle(ClientEvent::ConnectionOpened).unwrap();
        app.handle(AppEvent::Session { room_id: room("lobby"), phase: SessionPhase::Joined });
        deliver(&mut client, chat("carol", "welcome"));

        insta::assert_snapshot!(render(&mut renderer, &app, &client), @r"
        carol: welcome
        -- Joined room lobby
        ");
    }

    #[test]
    fn unnamed_participants_and_system_lines() {
        let (app, mut client) = joined("abc");
        let mut renderer = Renderer::new();
        render(&mut renderer, &app, &client);

        deliver(&mut client, ServerMessage::RoomUsers(vec![
            RosterEntry::new(1, "alice", true),
            RosterEntry { id: None, username: None, online: true },
            RosterEntry::new(3, "", false),
        ]));
        deliver(&mut client, chat("System", "bob joined the room"));
        deliver(&mut client, chat("bob", "hey"));

        insta::assert_snapshot!(render(&mut renderer, &app, &client), @r"
        [System] bob joined the room
        bob: hey
        -- in room (3, 2 online): [a] alice, [?] Unknown User, [?] Unknown User (away)
        ");
    }

    #[test]
    fn placeholder_waits_for_join_and_prints_once() {
        let mut client = Client::new(Identity::new("alice").unwrap());
        client.handle(ClientEvent::EnterRoom { room_id: "abc".into() }).unwrap();
        client
            .handle(ClientEvent::DirectoryChecked {
                room_id: room("abc"),
                response: DirectoryResponse::Found,
            })
            .unwrap();
        let app = App::new();
        let mut renderer = Renderer::new();

        assert_eq!(render(&mut renderer, &app, &client), "");

        client.handle(ClientEvent::ConnectionOpened).unwrap();
        assert_eq!(
            render(&mut renderer, &app, &client),
            "-- No messages yet. Start the conversation!\n"
        );
        assert_eq!(render(&mut renderer, &app, &client), "");
    }
}
