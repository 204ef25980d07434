//! Snapshot tests for the socket event encoding.
//!
//! The JSON shapes here are the contract with the room server. A change to any
//! snapshot is a wire-format change.

use parley_proto::{
    ClientMessage, InboundMessage, JoinRoom, OutboundMessage, ParticipantId, RoomId, RosterEntry,
    ServerMessage,
};
use proptest::prelude::*;

fn room(raw: &str) -> RoomId {
    RoomId::parse(raw).unwrap()
}

#[test]
fn join_room_encoding() {
    let msg = ClientMessage::JoinRoom(JoinRoom { room_id: room("abc "), username: "alice".into() });

    insta::assert_snapshot!(
        msg.encode().unwrap(),
        @r#"{"event":"join_room","data":{"roomId":"abc","username":"alice"}}"#
    );
}

#[test]
fn send_message_encoding() {
    let msg = ClientMessage::SendMessage(OutboundMessage {
        room_id: room("abc"),
        message: "hi there".into(),
        username: "alice".into(),
    });

    insta::assert_snapshot!(
        msg.encode().unwrap(),
        @r#"{"event":"send_message","data":{"roomId":"abc","message":"hi there","username":"alice"}}"#
    );
}

#[test]
fn receive_message_encoding() {
    let msg = ServerMessage::ReceiveMessage(InboundMessage {
        username: "bob".into(),
        message: "hello".into(),
    });

    insta::assert_snapshot!(
        msg.encode().unwrap(),
        @r#"{"event":"receive_message","data":{"username":"bob","message":"hello"}}"#
    );
}

#[test]
fn room_users_encoding() {
    let msg = ServerMessage::RoomUsers(vec![
        RosterEntry::new(1, "alice", true),
        RosterEntry::new("k2f9", "bob", false),
    ]);

    insta::assert_snapshot!(
        msg.encode().unwrap(),
        @r#"{"event":"room_users","data":[{"id":1,"username":"alice","online":true},{"id":"k2f9","username":"bob","online":false}]}"#
    );
}

#[test]
fn roster_entry_defaults_missing_fields() {
    let msg = ServerMessage::decode(r#"{"event":"room_users","data":[{"id":"x"}]}"#).unwrap();

    assert_eq!(
        msg,
        ServerMessage::RoomUsers(vec![RosterEntry {
            id: Some(ParticipantId::Text("x".into())),
            username: None,
            online: false,
        }])
    );
}

#[test]
fn partial_entries_keep_the_snapshot() {
    let msg = ServerMessage::decode(
        r#"{"event":"room_users","data":[
            {"id":1,"username":"alice","online":true},
            {"id":2,"username":null,"online":true},
            {"username":"bob","online":false},
            {"id":1712345678901.23,"username":"carol","online":null},
            {"id":null}
        ]}"#,
    )
    .unwrap();

    let ServerMessage::RoomUsers(users) = msg else {
        unreachable!("expected room_users");
    };
    let shown: Vec<String> = users
        .iter()
        .map(|u| {
            let id = u.id.as_ref().map_or_else(|| "-".to_owned(), ToString::to_string);
            format!("{id} {} online={}", u.display_name(), u.online)
        })
        .collect();

    insta::assert_snapshot!(shown.join("\n"), @r"
    1 alice online=true
    2 Unknown User online=true
    - bob online=false
    1712345678901.23 carol online=false
    - Unknown User online=false
    ");
}

#[test]
fn empty_roster_decodes() {
    let msg = ServerMessage::decode(r#"{"event":"room_users","data":[]}"#).unwrap();
    assert_eq!(msg, ServerMessage::RoomUsers(Vec::new()));
}

proptest! {
    #[test]
    fn prop_decode_never_panics(text in ".{0,256}") {
        let _ = ServerMessage::decode(&text);
        let _ = ClientMessage::decode(&text);
    }

    #[test]
    fn prop_chat_text_survives_encoding(
        username in ".{0,32}",
        message in ".{0,256}",
    ) {
        let msg = ServerMessage::ReceiveMessage(InboundMessage { username, message });
        let decoded = ServerMessage::decode(&msg.encode().unwrap()).unwrap();
        prop_assert_eq!(decoded, msg);
    }
}
