//! The registry of known event types and the shapes their content decodes
//! into.
//!
//! Every known tag maps to a [`ContentKind`]. A few tags share a shape with
//! another tag (`m.room.guest_access` and `m.direct` both decode as
//! [`RoomAliases`]) and that aliasing is part of the wire format, so keep it.
//! Tags that aren't in the table decode into [`Content::Other`].

use log::debug;
use serde_json::{Map, Value};

use std::fmt;

use crate::protocol::errors::DecodeError;

pub mod call;
pub mod ephemeral;
pub mod html;
pub mod message;
pub mod room;

pub use self::call::{CallAnswer, CallCandidates, CallHangup, CallInvite};
pub use self::ephemeral::{Presence, Receipt, Typing};
pub use self::message::{Message, MessageType, TextMessage};
pub use self::room::{
    RoomAliases, RoomAvatar, RoomCanonicalAlias, RoomCreate,
    RoomHistoryVisibility, RoomJoinRules, RoomMember, RoomMessageFeedback,
    RoomName, RoomPinnedEvents, RoomPowerLevels, RoomRedaction,
    RoomThirdPartyInvite, RoomTopic,
};

const TYPE_ROOM_ALIASES: &str = "m.room.aliases";
const TYPE_ROOM_CANONICAL_ALIAS: &str = "m.room.canonical_alias";
const TYPE_ROOM_CREATE: &str = "m.room.create";
const TYPE_ROOM_JOIN_RULES: &str = "m.room.join_rules";
const TYPE_ROOM_MEMBER: &str = "m.room.member";
const TYPE_ROOM_POWER_LEVELS: &str = "m.room.power_levels";
const TYPE_ROOM_REDACTION: &str = "m.room.redaction";
const TYPE_ROOM_MESSAGE: &str = "m.room.message";
const TYPE_ROOM_MESSAGE_FEEDBACK: &str = "m.room.message.feedback";
const TYPE_ROOM_NAME: &str = "m.room.name";
const TYPE_ROOM_TOPIC: &str = "m.room.topic";
const TYPE_ROOM_AVATAR: &str = "m.room.avatar";
const TYPE_ROOM_PINNED_EVENTS: &str = "m.room.pinned_events";
const TYPE_CALL_INVITE: &str = "m.call.invite";
const TYPE_CALL_CANDIDATES: &str = "m.call.candidates";
const TYPE_CALL_ANSWER: &str = "m.call.answer";
const TYPE_CALL_HANGUP: &str = "m.call.hangup";
const TYPE_TYPING: &str = "m.typing";
const TYPE_RECEIPT: &str = "m.receipt";
const TYPE_PRESENCE: &str = "m.presence";
const TYPE_ROOM_HISTORY_VISIBILITY: &str = "m.room.history_visibility";
const TYPE_ROOM_THIRD_PARTY_INVITE: &str = "m.room.third_party_invite";
const TYPE_ROOM_GUEST_ACCESS: &str = "m.room.guest_access";
const TYPE_DIRECT: &str = "m.direct";

/// An event's `type`. Anything we don't recognise is kept verbatim in
/// `Custom`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EventType {
    RoomAliases,
    RoomCanonicalAlias,
    RoomCreate,
    RoomJoinRules,
    RoomMember,
    RoomPowerLevels,
    RoomRedaction,
    RoomMessage,
    RoomMessageFeedback,
    RoomName,
    RoomTopic,
    RoomAvatar,
    RoomPinnedEvents,
    CallInvite,
    CallCandidates,
    CallAnswer,
    CallHangup,
    Typing,
    Receipt,
    Presence,
    RoomHistoryVisibility,
    RoomThirdPartyInvite,
    RoomGuestAccess,
    Direct,
    Custom(String),
}

impl EventType {
    pub fn as_str(&self) -> &str {
        match self {
            EventType::RoomAliases => TYPE_ROOM_ALIASES,
            EventType::RoomCanonicalAlias => TYPE_ROOM_CANONICAL_ALIAS,
            EventType::RoomCreate => TYPE_ROOM_CREATE,
            EventType::RoomJoinRules => TYPE_ROOM_JOIN_RULES,
            EventType::RoomMember => TYPE_ROOM_MEMBER,
            EventType::RoomPowerLevels => TYPE_ROOM_POWER_LEVELS,
            EventType::RoomRedaction => TYPE_ROOM_REDACTION,
            EventType::RoomMessage => TYPE_ROOM_MESSAGE,
            EventType::RoomMessageFeedback => TYPE_ROOM_MESSAGE_FEEDBACK,
            EventType::RoomName => TYPE_ROOM_NAME,
            EventType::RoomTopic => TYPE_ROOM_TOPIC,
            EventType::RoomAvatar => TYPE_ROOM_AVATAR,
            EventType::RoomPinnedEvents => TYPE_ROOM_PINNED_EVENTS,
            EventType::CallInvite => TYPE_CALL_INVITE,
            EventType::CallCandidates => TYPE_CALL_CANDIDATES,
            EventType::CallAnswer => TYPE_CALL_ANSWER,
            EventType::CallHangup => TYPE_CALL_HANGUP,
            EventType::Typing => TYPE_TYPING,
            EventType::Receipt => TYPE_RECEIPT,
            EventType::Presence => TYPE_PRESENCE,
            EventType::RoomHistoryVisibility => TYPE_ROOM_HISTORY_VISIBILITY,
            EventType::RoomThirdPartyInvite => TYPE_ROOM_THIRD_PARTY_INVITE,
            EventType::RoomGuestAccess => TYPE_ROOM_GUEST_ACCESS,
            EventType::Direct => TYPE_DIRECT,
            EventType::Custom(t) => t,
        }
    }

    pub fn from_tag(t: &str) -> EventType {
        match t {
            TYPE_ROOM_ALIASES => EventType::RoomAliases,
            TYPE_ROOM_CANONICAL_ALIAS => EventType::RoomCanonicalAlias,
            TYPE_ROOM_CREATE => EventType::RoomCreate,
            TYPE_ROOM_JOIN_RULES => EventType::RoomJoinRules,
            TYPE_ROOM_MEMBER => EventType::RoomMember,
            TYPE_ROOM_POWER_LEVELS => EventType::RoomPowerLevels,
            TYPE_ROOM_REDACTION => EventType::RoomRedaction,
            TYPE_ROOM_MESSAGE => EventType::RoomMessage,
            TYPE_ROOM_MESSAGE_FEEDBACK => EventType::RoomMessageFeedback,
            TYPE_ROOM_NAME => EventType::RoomName,
            TYPE_ROOM_TOPIC => EventType::RoomTopic,
            TYPE_ROOM_AVATAR => EventType::RoomAvatar,
            TYPE_ROOM_PINNED_EVENTS => EventType::RoomPinnedEvents,
            TYPE_CALL_INVITE => EventType::CallInvite,
            TYPE_CALL_CANDIDATES => EventType::CallCandidates,
            TYPE_CALL_ANSWER => EventType::CallAnswer,
            TYPE_CALL_HANGUP => EventType::CallHangup,
            TYPE_TYPING => EventType::Typing,
            TYPE_RECEIPT => EventType::Receipt,
            TYPE_PRESENCE => EventType::Presence,
            TYPE_ROOM_HISTORY_VISIBILITY => EventType::RoomHistoryVisibility,
            TYPE_ROOM_THIRD_PARTY_INVITE => EventType::RoomThirdPartyInvite,
            TYPE_ROOM_GUEST_ACCESS => EventType::RoomGuestAccess,
            TYPE_DIRECT => EventType::Direct,
            t => EventType::Custom(t.to_string()),
        }
    }

    /// The shape content of this type decodes into, or `None` for types
    /// outside the registry.
    pub fn content_kind(&self) -> Option<ContentKind> {
        let kind = match self {
            EventType::RoomAliases
            | EventType::RoomGuestAccess
            | EventType::Direct => ContentKind::RoomAliases,
            EventType::RoomCanonicalAlias => ContentKind::RoomCanonicalAlias,
            EventType::RoomCreate => ContentKind::RoomCreate,
            EventType::RoomJoinRules => ContentKind::RoomJoinRules,
            EventType::RoomMember => ContentKind::RoomMember,
            EventType::RoomPowerLevels => ContentKind::RoomPowerLevels,
            EventType::RoomRedaction => ContentKind::RoomRedaction,
            EventType::RoomMessage => ContentKind::Message,
            EventType::RoomMessageFeedback => ContentKind::RoomMessageFeedback,
            EventType::RoomName => ContentKind::RoomName,
            EventType::RoomTopic => ContentKind::RoomTopic,
            EventType::RoomAvatar => ContentKind::RoomAvatar,
            EventType::RoomPinnedEvents => ContentKind::RoomPinnedEvents,
            EventType::CallInvite => ContentKind::CallInvite,
            EventType::CallCandidates => ContentKind::CallCandidates,
            EventType::CallAnswer => ContentKind::CallAnswer,
            EventType::CallHangup => ContentKind::CallHangup,
            EventType::Typing => ContentKind::Typing,
            EventType::Receipt => ContentKind::Receipt,
            EventType::Presence => ContentKind::Presence,
            EventType::RoomHistoryVisibility => {
                ContentKind::RoomHistoryVisibility
            }
            EventType::RoomThirdPartyInvite => {
                ContentKind::RoomThirdPartyInvite
            }
            EventType::Custom(_) => return None,
        };

        Some(kind)
    }
}

impl From<String> for EventType {
    fn from(t: String) -> EventType {
        match EventType::from_tag(&t) {
            EventType::Custom(_) => EventType::Custom(t),
            known => known,
        }
    }
}

impl From<&str> for EventType {
    fn from(t: &str) -> EventType {
        EventType::from_tag(t)
    }
}

impl From<EventType> for String {
    fn from(t: EventType) -> String {
        match t {
            EventType::Custom(t) => t,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl PartialEq<str> for EventType {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == other
    }
}

impl PartialEq<&str> for EventType {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}

/// Identifies a registered content shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentKind {
    RoomAliases,
    RoomCanonicalAlias,
    RoomCreate,
    RoomJoinRules,
    RoomMember,
    RoomPowerLevels,
    RoomRedaction,
    Message,
    RoomMessageFeedback,
    RoomName,
    RoomTopic,
    RoomAvatar,
    RoomPinnedEvents,
    CallInvite,
    CallCandidates,
    CallAnswer,
    CallHangup,
    Typing,
    Receipt,
    Presence,
    RoomHistoryVisibility,
    RoomThirdPartyInvite,
}

/// Decoded event content.
#[derive(Debug, Clone, PartialEq)]
pub enum Content {
    RoomAliases(RoomAliases),
    RoomCanonicalAlias(RoomCanonicalAlias),
    RoomCreate(RoomCreate),
    RoomJoinRules(RoomJoinRules),
    RoomMember(RoomMember),
    RoomPowerLevels(RoomPowerLevels),
    RoomRedaction(RoomRedaction),
    Message(Message),
    RoomMessageFeedback(RoomMessageFeedback),
    RoomName(RoomName),
    RoomTopic(RoomTopic),
    RoomAvatar(RoomAvatar),
    RoomPinnedEvents(RoomPinnedEvents),
    CallInvite(CallInvite),
    CallCandidates(CallCandidates),
    CallAnswer(CallAnswer),
    CallHangup(CallHangup),
    Typing(Typing),
    Receipt(Receipt),
    Presence(Presence),
    RoomHistoryVisibility(RoomHistoryVisibility),
    RoomThirdPartyInvite(RoomThirdPartyInvite),
    /// Content of an unrecognised event type, or of a message without a
    /// `msgtype`.
    Other(Map<String, Value>),
}

impl Content {
    /// Decodes `value` into the shape registered for `event_type`.
    ///
    /// `event_id` is only used to give errors some context.
    pub fn decode(
        event_type: &EventType,
        event_id: Option<&str>,
        value: Value,
    ) -> Result<Content, DecodeError> {
        let err = |e: serde_json::Error| {
            DecodeError::content(event_type.as_str(), event_id, e)
        };

        let kind = match event_type.content_kind() {
            Some(kind) => kind,
            None => {
                debug!("Decoding unrecognised {} content as a map", event_type);
                let map = serde_json::from_value(value).map_err(err)?;
                return Ok(Content::Other(map));
            }
        };

        let content = match kind {
            ContentKind::Message => {
                let map: Map<String, Value> =
                    serde_json::from_value(value).map_err(err)?;

                let msgtype = match map.get("msgtype").and_then(Value::as_str)
                {
                    Some(msgtype) => msgtype,
                    None => {
                        debug!("Message {:?} has no msgtype", event_id);
                        return Ok(Content::Other(map));
                    }
                };

                let msgtype = MessageType::from_tag(msgtype).ok_or_else(|| {
                    DecodeError::UnknownMessageSubtype {
                        msgtype: msgtype.to_string(),
                    }
                })?;

                Message::from_value(msgtype, Value::Object(map))
                    .map(Content::Message)
                    .map_err(err)?
            }
            ContentKind::RoomAliases => {
                Content::RoomAliases(serde_json::from_value(value).map_err(err)?)
            }
            ContentKind::RoomCanonicalAlias => Content::RoomCanonicalAlias(
                serde_json::from_value(value).map_err(err)?,
            ),
            ContentKind::RoomCreate => {
                Content::RoomCreate(serde_json::from_value(value).map_err(err)?)
            }
            ContentKind::RoomJoinRules => Content::RoomJoinRules(
                serde_json::from_value(value).map_err(err)?,
            ),
            ContentKind::RoomMember => {
                Content::RoomMember(serde_json::from_value(value).map_err(err)?)
            }
            ContentKind::RoomPowerLevels => Content::RoomPowerLevels(
                serde_json::from_value(value).map_err(err)?,
            ),
            ContentKind::RoomRedaction => Content::RoomRedaction(
                serde_json::from_value(value).map_err(err)?,
            ),
            ContentKind::RoomMessageFeedback => Content::RoomMessageFeedback(
                serde_json::from_value(value).map_err(err)?,
            ),
            ContentKind::RoomName => {
                Content::RoomName(serde_json::from_value(value).map_err(err)?)
            }
            ContentKind::RoomTopic => {
                Content::RoomTopic(serde_json::from_value(value).map_err(err)?)
            }
            ContentKind::RoomAvatar => {
                Content::RoomAvatar(serde_json::from_value(value).map_err(err)?)
            }
            ContentKind::RoomPinnedEvents => Content::RoomPinnedEvents(
                serde_json::from_value(value).map_err(err)?,
            ),
            ContentKind::CallInvite => {
                Content::CallInvite(serde_json::from_value(value).map_err(err)?)
            }
            ContentKind::CallCandidates => Content::CallCandidates(
                serde_json::from_value(value).map_err(err)?,
            ),
            ContentKind::CallAnswer => {
                Content::CallAnswer(serde_json::from_value(value).map_err(err)?)
            }
            ContentKind::CallHangup => {
                Content::CallHangup(serde_json::from_value(value).map_err(err)?)
            }
            ContentKind::Typing => {
                Content::Typing(serde_json::from_value(value).map_err(err)?)
            }
            ContentKind::Receipt => {
                Content::Receipt(serde_json::from_value(value).map_err(err)?)
            }
            ContentKind::Presence => {
                Content::Presence(serde_json::from_value(value).map_err(err)?)
            }
            ContentKind::RoomHistoryVisibility => {
                Content::RoomHistoryVisibility(
                    serde_json::from_value(value).map_err(err)?,
                )
            }
            ContentKind::RoomThirdPartyInvite => Content::RoomThirdPartyInvite(
                serde_json::from_value(value).map_err(err)?,
            ),
        };

        Ok(content)
    }

    /// The wire form of the content. Message variants get their `msgtype`
    /// stamped here.
    pub fn to_value(&self) -> Result<Value, serde_json::Error> {
        match self {
            Content::RoomAliases(c) => serde_json::to_value(c),
            Content::RoomCanonicalAlias(c) => serde_json::to_value(c),
            Content::RoomCreate(c) => serde_json::to_value(c),
            Content::RoomJoinRules(c) => serde_json::to_value(c),
            Content::RoomMember(c) => serde_json::to_value(c),
            Content::RoomPowerLevels(c) => serde_json::to_value(c),
            Content::RoomRedaction(c) => serde_json::to_value(c),
            Content::Message(m) => m.to_value(),
            Content::RoomMessageFeedback(c) => serde_json::to_value(c),
            Content::RoomName(c) => serde_json::to_value(c),
            Content::RoomTopic(c) => serde_json::to_value(c),
            Content::RoomAvatar(c) => serde_json::to_value(c),
            Content::RoomPinnedEvents(c) => serde_json::to_value(c),
            Content::CallInvite(c) => serde_json::to_value(c),
            Content::CallCandidates(c) => serde_json::to_value(c),
            Content::CallAnswer(c) => serde_json::to_value(c),
            Content::CallHangup(c) => serde_json::to_value(c),
            Content::Typing(c) => serde_json::to_value(c),
            Content::Receipt(c) => serde_json::to_value(c),
            Content::Presence(c) => serde_json::to_value(c),
            Content::RoomHistoryVisibility(c) => serde_json::to_value(c),
            Content::RoomThirdPartyInvite(c) => serde_json::to_value(c),
            Content::Other(map) => Ok(Value::Object(map.clone())),
        }
    }

    /// The registered shape of this content, `None` for [`Content::Other`].
    pub fn kind(&self) -> Option<ContentKind> {
        let kind = match self {
            Content::RoomAliases(_) => ContentKind::RoomAliases,
            Content::RoomCanonicalAlias(_) => ContentKind::RoomCanonicalAlias,
            Content::RoomCreate(_) => ContentKind::RoomCreate,
            Content::RoomJoinRules(_) => ContentKind::RoomJoinRules,
            Content::RoomMember(_) => ContentKind::RoomMember,
            Content::RoomPowerLevels(_) => ContentKind::RoomPowerLevels,
            Content::RoomRedaction(_) => ContentKind::RoomRedaction,
            Content::Message(_) => ContentKind::Message,
            Content::RoomMessageFeedback(_) => ContentKind::RoomMessageFeedback,
            Content::RoomName(_) => ContentKind::RoomName,
            Content::RoomTopic(_) => ContentKind::RoomTopic,
            Content::RoomAvatar(_) => ContentKind::RoomAvatar,
            Content::RoomPinnedEvents(_) => ContentKind::RoomPinnedEvents,
            Content::CallInvite(_) => ContentKind::CallInvite,
            Content::CallCandidates(_) => ContentKind::CallCandidates,
            Content::CallAnswer(_) => ContentKind::CallAnswer,
            Content::CallHangup(_) => ContentKind::CallHangup,
            Content::Typing(_) => ContentKind::Typing,
            Content::Receipt(_) => ContentKind::Receipt,
            Content::Presence(_) => ContentKind::Presence,
            Content::RoomHistoryVisibility(_) => {
                ContentKind::RoomHistoryVisibility
            }
            Content::RoomThirdPartyInvite(_) => {
                ContentKind::RoomThirdPartyInvite
            }
            Content::Other(_) => return None,
        };

        Some(kind)
    }

    pub fn as_member(&self) -> Option<&RoomMember> {
        match self {
            Content::RoomMember(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_message(&self) -> Option<&Message> {
        match self {
            Content::Message(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_other(&self) -> Option<&Map<String, Value>> {
        match self {
            Content::Other(map) => Some(map),
            _ => None,
        }
    }
}

impl From<Message> for Content {
    fn from(m: Message) -> Content {
        Content::Message(m)
    }
}

impl From<RoomMember> for Content {
    fn from(m: RoomMember) -> Content {
        Content::RoomMember(m)
    }
}
