use log::trace;
use serde_json::Value;

use crate::protocol::content::{Content, EventType, Message};
use crate::protocol::errors::{DecodeError, EncodeError};

/// The envelope as it arrives, with the content left untyped so that it can
/// be dispatched on `type` afterwards.
#[derive(Deserialize)]
struct RawEvent {
    sender: String,
    #[serde(rename = "type")]
    event_type: EventType,
    #[serde(default)]
    origin_server_ts: u64,
    event_id: Option<String>,
    room_id: Option<String>,
    state_key: Option<String>,
    redacts: Option<String>,
    content: Value,
}

#[derive(Serialize)]
struct WireEvent<'a> {
    sender: &'a str,
    #[serde(rename = "type")]
    event_type: &'a str,
    origin_server_ts: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    event_id: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    room_id: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    state_key: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    redacts: Option<&'a str>,
    content: Value,
}

/// A single event with its content decoded.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    sender: String,
    event_type: EventType,
    origin_server_ts: u64,
    event_id: Option<String>,
    room_id: Option<String>,
    state_key: Option<String>,
    redacts: Option<String>,
    content: Content,
}

impl Event {
    pub fn decode(bytes: &[u8]) -> Result<Event, DecodeError> {
        let raw: RawEvent = serde_json::from_slice(bytes)
            .map_err(|source| DecodeError::MalformedEnvelope { source })?;

        Event::from_raw(raw)
    }

    /// Like [`Event::decode`], for events that have already been parsed,
    /// e.g. as part of a larger response body.
    pub fn from_value(value: Value) -> Result<Event, DecodeError> {
        let raw: RawEvent = serde_json::from_value(value)
            .map_err(|source| DecodeError::MalformedEnvelope { source })?;

        Event::from_raw(raw)
    }

    fn from_raw(raw: RawEvent) -> Result<Event, DecodeError> {
        let RawEvent {
            sender,
            event_type,
            origin_server_ts,
            event_id,
            room_id,
            state_key,
            redacts,
            content,
        } = raw;

        trace!("Decoding {} event {:?}", event_type, event_id);

        let content =
            Content::decode(&event_type, event_id.as_deref(), content)?;

        Ok(Event {
            sender,
            event_type,
            origin_server_ts,
            event_id,
            room_id,
            state_key,
            redacts,
            content,
        })
    }

    pub fn encode(&self) -> Result<Vec<u8>, EncodeError> {
        let value = self.to_value()?;
        Ok(serde_json::to_vec(&value)?)
    }

    pub fn to_value(&self) -> Result<Value, EncodeError> {
        let wire = WireEvent {
            sender: &self.sender,
            event_type: self.event_type.as_str(),
            origin_server_ts: self.origin_server_ts,
            event_id: self.event_id.as_deref(),
            room_id: self.room_id.as_deref(),
            state_key: self.state_key.as_deref(),
            redacts: self.redacts.as_deref(),
            content: self.content.to_value()?,
        };

        Ok(serde_json::to_value(wire)?)
    }

    pub fn sender(&self) -> &str {
        &self.sender
    }

    pub fn event_type(&self) -> &EventType {
        &self.event_type
    }

    pub fn origin_server_ts(&self) -> u64 {
        self.origin_server_ts
    }

    pub fn event_id(&self) -> Option<&str> {
        self.event_id.as_deref()
    }

    pub fn room_id(&self) -> Option<&str> {
        self.room_id.as_deref()
    }

    pub fn state_key(&self) -> Option<&str> {
        self.state_key.as_deref()
    }

    pub fn redacts(&self) -> Option<&str> {
        self.redacts.as_deref()
    }

    pub fn content(&self) -> &Content {
        &self.content
    }

    pub fn into_content(self) -> Content {
        self.content
    }

    /// State events are the ones with a `state_key`, even an empty one.
    pub fn is_state(&self) -> bool {
        self.state_key.is_some()
    }
}

/// Builds an outgoing event. The server fills in the event ID and timestamp
/// once the event has been sent.
#[derive(Debug, Clone)]
pub struct EventBuilder {
    room_id: Option<String>,
    sender: String,
    event_type: EventType,
    state_key: Option<String>,
    redacts: Option<String>,
    origin_server_ts: u64,
    content: Content,
}

impl EventBuilder {
    pub fn new(
        room_id: impl Into<String>,
        sender: impl Into<String>,
        event_type: impl Into<EventType>,
        state_key: Option<&str>,
    ) -> Self {
        EventBuilder {
            room_id: Some(room_id.into()),
            sender: sender.into(),
            event_type: event_type.into(),
            state_key: state_key.map(str::to_string),
            redacts: None,
            origin_server_ts: 0,
            content: Content::Other(serde_json::Map::new()),
        }
    }

    /// An `m.room.message`, so the type can't disagree with the payload.
    pub fn message(
        room_id: impl Into<String>,
        sender: impl Into<String>,
        message: Message,
    ) -> Self {
        EventBuilder::new(room_id, sender, EventType::RoomMessage, None)
            .with_content(message)
    }

    pub fn with_content(mut self, content: impl Into<Content>) -> Self {
        self.content = content.into();
        self
    }

    pub fn redacts(mut self, event_id: impl Into<String>) -> Self {
        self.redacts = Some(event_id.into());
        self
    }

    pub fn origin_server_ts(mut self, ts: u64) -> Self {
        self.origin_server_ts = ts;
        self
    }

    pub fn without_room(mut self) -> Self {
        self.room_id = None;
        self
    }

    pub fn build(self) -> Event {
        let EventBuilder {
            room_id,
            sender,
            event_type,
            state_key,
            redacts,
            origin_server_ts,
            content,
        } = self;

        Event {
            sender,
            event_type,
            origin_server_ts,
            event_id: None,
            room_id,
            state_key,
            redacts,
            content,
        }
    }

    /// Sets the event ID the server assigned, for events echoed back to us.
    pub fn build_with_id(self, event_id: impl Into<String>) -> Event {
        let mut event = self.build();
        event.event_id = Some(event_id.into());
        event
    }
}
