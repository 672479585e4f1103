#[macro_use]
extern crate serde_json;

use mxevents::protocol::content::call::SessionDescription;
use mxevents::protocol::content::message::{
    AudioInfo, AudioMessage, FileInfo, FileMessage, ImageInfo, ImageMessage,
    LocationInfo, LocationMessage, VideoInfo, VideoMessage,
};
use mxevents::protocol::content::{
    CallAnswer, CallHangup, CallInvite, Content, EventType, Message,
    RoomAliases, RoomAvatar, RoomCanonicalAlias, RoomMessageFeedback,
    RoomName, RoomRedaction, RoomThirdPartyInvite, RoomTopic, TextMessage,
};
use mxevents::{DecodeError, Event, EventBuilder};

use serde_json::Value;

fn decode(val: Value) -> Result<Event, DecodeError> {
    Event::decode(&serde_json::to_vec(&val).unwrap())
}

fn envelope(event_type: &str, content: Value) -> Value {
    json!({
        "sender": "@alice:test",
        "type": event_type,
        "origin_server_ts": 1598691790166u64,
        "event_id": "$event:test",
        "room_id": "!room:test",
        "content": content,
    })
}

#[test]
fn text_message() {
    env_logger::builder().is_test(true).try_init().ok();

    let event = decode(envelope(
        "m.room.message",
        json!({ "msgtype": "m.text", "body": "hi" }),
    ))
    .unwrap();

    assert_eq!(
        event.content(),
        &Content::Message(Message::Text(TextMessage::plain("hi")))
    );
    assert!(!event.is_state());
}

#[test]
fn unknown_msgtype_is_an_error() {
    let res = decode(envelope(
        "m.room.message",
        json!({ "msgtype": "m.bogus", "body": "hi" }),
    ));

    match res {
        Err(DecodeError::UnknownMessageSubtype { msgtype }) => {
            assert_eq!(msgtype, "m.bogus")
        }
        r => panic!("unexpected result {:?}", r),
    }
}

#[test]
fn unknown_type_falls_back_to_map() {
    let event =
        decode(envelope("m.custom.foo", json!({ "x": 1, "y": [true] })))
            .unwrap();

    assert_eq!(event.event_type(), &EventType::Custom("m.custom.foo".into()));

    let map = event.content().as_other().unwrap();
    assert_eq!(Value::Object(map.clone()), json!({ "x": 1, "y": [true] }));

    // And goes back out untouched.
    let value: Value = serde_json::from_slice(&event.encode().unwrap()).unwrap();
    assert_eq!(value["content"], json!({ "x": 1, "y": [true] }));
    assert_eq!(value["type"], "m.custom.foo");
}

#[test]
fn malformed_content_keeps_envelope_context() {
    let res = decode(envelope("m.room.member", json!({ "membership": 5 })));

    match res {
        Err(DecodeError::MalformedContent {
            event_type,
            event_id,
            ..
        }) => {
            assert_eq!(event_type, "m.room.member");
            assert_eq!(event_id.as_deref(), Some("$event:test"));
        }
        r => panic!("unexpected result {:?}", r),
    }
}

#[test]
fn aliased_types_decode_as_aliases() {
    let event = decode(envelope(
        "m.room.guest_access",
        json!({ "guest_access": "can_join" }),
    ))
    .unwrap();
    assert_eq!(event.content(), &Content::RoomAliases(RoomAliases::default()));

    let event = decode(envelope(
        "m.direct",
        json!({ "@bob:test": ["!dm:test"] }),
    ))
    .unwrap();
    assert_eq!(event.event_type(), &EventType::Direct);
    assert_eq!(event.content(), &Content::RoomAliases(RoomAliases::default()));

    let event = decode(envelope(
        "m.room.aliases",
        json!({ "aliases": ["#a:test", "#b:test"] }),
    ))
    .unwrap();
    assert_eq!(
        event.content(),
        &Content::RoomAliases(RoomAliases {
            aliases: vec!["#a:test".to_string(), "#b:test".to_string()],
        })
    );
}

#[test]
fn state_key_presence_marks_state() {
    let mut val = envelope("m.room.name", json!({ "name": "Room" }));
    val["state_key"] = json!("");

    let event = decode(val).unwrap();
    assert!(event.is_state());
    assert_eq!(event.state_key(), Some(""));

    let encoded: Value =
        serde_json::from_slice(&event.encode().unwrap()).unwrap();
    assert_eq!(encoded["state_key"], "");
}

#[test]
fn image_decodes_as_image() {
    let event = decode(envelope(
        "m.room.message",
        json!({
            "msgtype": "m.image",
            "body": "cat.png",
            "url": "mxc://test/cat",
            "info": { "h": 10, "w": 20, "mimetype": "image/png" },
        }),
    ))
    .unwrap();

    match event.content() {
        Content::Message(Message::Image(image)) => {
            assert_eq!(image.url, "mxc://test/cat");
            assert_eq!(image.info.as_ref().unwrap().width, Some(20));
        }
        c => panic!("unexpected content {:?}", c),
    }
}

#[test]
fn encoding_injects_msgtype() {
    let messages = vec![
        (Message::Text(TextMessage::plain("a")), "m.text"),
        (Message::Emote(TextMessage::plain("b")), "m.emote"),
        (Message::Notice(TextMessage::plain("c")), "m.notice"),
        (
            Message::Image(ImageMessage {
                body: "d".to_string(),
                url: "mxc://test/d".to_string(),
                info: None,
            }),
            "m.image",
        ),
        (
            Message::Video(VideoMessage {
                body: "e".to_string(),
                url: "mxc://test/e".to_string(),
                info: None,
            }),
            "m.video",
        ),
        (
            Message::File(FileMessage {
                body: "f".to_string(),
                url: "mxc://test/f".to_string(),
                filename: None,
                info: None,
            }),
            "m.file",
        ),
        (
            Message::Location(LocationMessage {
                body: "g".to_string(),
                geo_uri: "geo:0,0".to_string(),
                info: None,
            }),
            "m.location",
        ),
        (
            Message::Audio(AudioMessage {
                body: "h".to_string(),
                url: "mxc://test/h".to_string(),
                info: None,
            }),
            "m.audio",
        ),
    ];

    for (message, msgtype) in messages {
        let event =
            EventBuilder::message("!room:test", "@alice:test", message).build();
        let value: Value =
            serde_json::from_slice(&event.encode().unwrap()).unwrap();
        assert_eq!(value["content"]["msgtype"], msgtype);
    }
}

#[test]
fn received_msgtype_is_replaced_by_variant() {
    // The msgtype that goes out follows the variant, not what was received.
    let event = decode(envelope(
        "m.room.message",
        json!({ "msgtype": "m.emote", "body": "waves" }),
    ))
    .unwrap();

    let message = match event.into_content() {
        Content::Message(Message::Emote(m)) => Message::Text(m),
        c => panic!("unexpected content {:?}", c),
    };

    let out = EventBuilder::message("!room:test", "@alice:test", message)
        .build()
        .to_value()
        .unwrap();
    assert_eq!(out["content"]["msgtype"], "m.text");
}

#[test]
fn received_html_body_not_rewritten_on_decode() {
    let event = decode(envelope(
        "m.room.message",
        json!({
            "msgtype": "m.text",
            "body": "sender's own fallback",
            "format": "org.matrix.custom.html",
            "formatted_body": "<b>bold</b>",
        }),
    ))
    .unwrap();

    match event.content() {
        Content::Message(Message::Text(m)) => {
            assert_eq!(m.body, "sender's own fallback")
        }
        c => panic!("unexpected content {:?}", c),
    }

    // Sending it again uses the derived body.
    let value = event.to_value().unwrap();
    assert_eq!(value["content"]["body"], "bold");
}

#[test]
fn encode_decode_encode_is_fixed_point() {
    let contents = vec![
        (
            EventType::RoomMessage,
            Content::Message(Message::Text(TextMessage::html(
                "<p>Hello &amp; <em>welcome</em></p>",
            ))),
        ),
        (
            EventType::RoomMessage,
            Content::Message(Message::Video(VideoMessage {
                body: "clip".to_string(),
                url: "mxc://test/clip".to_string(),
                info: Some(VideoInfo {
                    duration: Some(1500),
                    thumbnail_info: Some(ImageInfo {
                        height: Some(1),
                        ..Default::default()
                    }),
                    ..Default::default()
                }),
            })),
        ),
        (
            EventType::RoomMessage,
            Content::Message(Message::File(FileMessage {
                body: "notes.txt".to_string(),
                url: "mxc://test/notes".to_string(),
                filename: Some("notes.txt".to_string()),
                info: Some(FileInfo {
                    size: Some(12),
                    ..Default::default()
                }),
            })),
        ),
        (
            EventType::RoomMessage,
            Content::Message(Message::Image(ImageMessage {
                body: "cat.png".to_string(),
                url: "mxc://test/cat".to_string(),
                info: Some(ImageInfo {
                    height: Some(10),
                    width: Some(20),
                    ..Default::default()
                }),
            })),
        ),
        (
            EventType::RoomMessage,
            Content::Message(Message::Location(LocationMessage {
                body: "here".to_string(),
                geo_uri: "geo:1,2".to_string(),
                info: Some(LocationInfo {
                    thumbnail_url: Some("mxc://test/map".to_string()),
                    thumbnail_info: None,
                }),
            })),
        ),
        (
            EventType::RoomMessage,
            Content::Message(Message::Audio(AudioMessage {
                body: "hi.ogg".to_string(),
                url: "mxc://test/hi".to_string(),
                info: Some(AudioInfo {
                    duration: Some(900),
                    ..Default::default()
                }),
            })),
        ),
        (
            EventType::RoomMessage,
            Content::Message(Message::Emote(TextMessage::html("<i>waves</i>"))),
        ),
        (
            EventType::RoomMessage,
            Content::Message(Message::Notice(TextMessage::plain("beep"))),
        ),
        (
            EventType::RoomAvatar,
            Content::RoomAvatar(RoomAvatar {
                url: "mxc://test/a".to_string(),
                info: None,
            }),
        ),
        (
            EventType::RoomCanonicalAlias,
            Content::RoomCanonicalAlias(RoomCanonicalAlias {
                alias: Some("#main:test".to_string()),
            }),
        ),
        (
            EventType::RoomName,
            Content::RoomName(RoomName {
                name: "Room".to_string(),
            }),
        ),
        (
            EventType::RoomTopic,
            Content::RoomTopic(RoomTopic {
                topic: "Things".to_string(),
            }),
        ),
        (
            EventType::RoomRedaction,
            Content::RoomRedaction(RoomRedaction {
                reason: Some("spam".to_string()),
            }),
        ),
        (
            EventType::RoomMessageFeedback,
            Content::RoomMessageFeedback(RoomMessageFeedback {
                target_event_id: "$a:test".to_string(),
                feedback_type: "delivered".to_string(),
            }),
        ),
        (
            EventType::RoomThirdPartyInvite,
            Content::RoomThirdPartyInvite(RoomThirdPartyInvite {
                display_name: "b...@test".to_string(),
                key_validity_url: "https://test/isvalid".to_string(),
                public_key: "abc".to_string(),
                public_keys: vec![],
            }),
        ),
        (
            EventType::CallAnswer,
            Content::CallAnswer(CallAnswer {
                call_id: "c1".to_string(),
                answer: SessionDescription {
                    sdp_type: "answer".to_string(),
                    sdp: "v=0".to_string(),
                },
                version: 0,
            }),
        ),
        (
            EventType::CallHangup,
            Content::CallHangup(CallHangup {
                call_id: "c1".to_string(),
                version: 0,
            }),
        ),
        (
            EventType::CallInvite,
            Content::CallInvite(
                serde_json::from_value::<CallInvite>(json!({
                    "call_id": "c1",
                    "offer": { "type": "offer", "sdp": "v=0" },
                    "version": 0,
                    "lifetime": 60000,
                }))
                .unwrap(),
            ),
        ),
    ];

    for (event_type, content) in contents {
        let event = EventBuilder::new("!room:test", "@alice:test", event_type, None)
            .with_content(content)
            .build_with_id("$sent:test");

        let first = event.encode().unwrap();
        let decoded = Event::decode(&first).unwrap();
        let second = decoded.encode().unwrap();

        let first: Value = serde_json::from_slice(&first).unwrap();
        let second: Value = serde_json::from_slice(&second).unwrap();
        assert_eq!(first, second);
    }
}

#[test]
fn decode_round_trips_typed_state() {
    let events = vec![
        envelope(
            "m.room.power_levels",
            json!({
                "users": { "@alice:test": 100 },
                "users_default": 0,
                "events": { "m.room.name": 50 },
                "ban": 50,
                "kick": 50,
                "redact": 50,
                "state_default": 50,
                "events_default": 0,
                "invite": 0,
            }),
        ),
        envelope("m.room.create", json!({ "creator": "@alice:test", "m.federate": false })),
        envelope("m.room.join_rules", json!({ "join_rule": "invite" })),
        envelope(
            "m.room.member",
            json!({ "membership": "join", "displayname": "Alice", "is_direct": true }),
        ),
        envelope("m.room.history_visibility", json!({ "history_visibility": "shared" })),
        envelope("m.room.pinned_events", json!({ "pinned": ["$a:test"] })),
        envelope("m.typing", json!({ "user_ids": ["@alice:test"] })),
        envelope("m.presence", json!({ "presence": "online", "last_active_ago": 3 })),
        envelope(
            "m.receipt",
            json!({ "$e:test": { "m.read": { "@alice:test": { "ts": 5 } } } }),
        ),
        envelope(
            "m.call.candidates",
            json!({
                "call_id": "c1",
                "version": 0,
                "candidates": [
                    { "sdpMid": "audio", "sdpMLineIndex": 0, "candidate": "candidate:0" },
                ],
            }),
        ),
        envelope("m.room.avatar", json!({ "url": "mxc://test/a", "info": { "h": 64, "w": 64 } })),
        envelope("m.room.canonical_alias", json!({ "alias": "#main:test" })),
        envelope("m.room.name", json!({ "name": "Room" })),
        envelope("m.room.topic", json!({ "topic": "Things" })),
        envelope("m.room.redaction", json!({ "reason": "spam" })),
        envelope(
            "m.room.message.feedback",
            json!({ "target_event_id": "$a:test", "type": "read" }),
        ),
        envelope(
            "m.room.third_party_invite",
            json!({
                "display_name": "b...@test",
                "key_validity_url": "https://test/isvalid",
                "public_key": "abc",
                "public_keys": [{ "public_key": "def" }],
            }),
        ),
        envelope(
            "m.call.answer",
            json!({ "call_id": "c1", "version": 0, "answer": { "type": "answer", "sdp": "v=0" } }),
        ),
        envelope("m.call.hangup", json!({ "call_id": "c1", "version": 0 })),
        envelope(
            "m.room.message",
            json!({ "msgtype": "m.image", "body": "cat.png", "url": "mxc://test/cat", "info": { "size": 3 } }),
        ),
        envelope(
            "m.room.message",
            json!({ "msgtype": "m.location", "body": "here", "geo_uri": "geo:1,2" }),
        ),
        envelope(
            "m.room.message",
            json!({ "msgtype": "m.audio", "body": "hi.ogg", "url": "mxc://test/hi", "info": { "duration": 900 } }),
        ),
        envelope("m.room.message", json!({ "msgtype": "m.emote", "body": "waves" })),
        envelope(
            "m.room.message",
            json!({
                "msgtype": "m.notice",
                "body": "kept as sent",
                "format": "org.matrix.custom.html",
                "formatted_body": "<b>bot</b>",
            }),
        ),
    ];

    for val in events {
        let event = decode(val.clone()).unwrap();
        assert!(event.content().kind().is_some(), "{:?}", event);
        assert_eq!(event.to_value().unwrap(), val);
    }
}

#[test]
fn partial_message_without_msgtype_is_kept() {
    let event =
        decode(envelope("m.room.message", json!({ "body": "?" }))).unwrap();
    assert_eq!(event.content().as_other().unwrap()["body"], "?");
}

#[test]
fn html_entities_decoded_into_body() {
    let event = EventBuilder::message(
        "!room:test",
        "@alice:test",
        Message::Text(TextMessage::html(
            "<p>caf&eacute; &hearts; na&iuml;ve &Auml;</p>",
        )),
    )
    .build();

    let value = event.to_value().unwrap();
    assert_eq!(value["content"]["body"], "café ♥ naïve Ä");
}
