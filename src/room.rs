//! The current state of rooms, built up from state events.
//!
//! Events are applied in the order they're handed over: there's no check
//! against `origin_server_ts`, so applying events out of order leaves stale
//! state behind. Callers that receive from several streams at once need to
//! serialize access to a room themselves.

use log::debug;

use std::collections::HashMap;

use crate::protocol::content::{Content, EventType};
use crate::protocol::errors::StateError;
use crate::protocol::events::Event;
use crate::state_map::StateMap;

/// Membership reported for users without a membership event.
pub const DEFAULT_MEMBERSHIP: &str = "leave";

#[derive(Debug, Clone)]
pub struct Room {
    room_id: String,
    state: StateMap<Event>,
}

impl Room {
    pub fn new(room_id: impl Into<String>) -> Room {
        Room {
            room_id: room_id.into(),
            state: StateMap::new(),
        }
    }

    pub fn room_id(&self) -> &str {
        &self.room_id
    }

    /// Replaces the state at the event's `(type, state_key)` with the event,
    /// returning the one it replaced.
    ///
    /// Events without a state key are rejected and leave the room untouched.
    pub fn apply_state(
        &mut self,
        event: Event,
    ) -> Result<Option<Event>, StateError> {
        let state_key = match event.state_key() {
            Some(state_key) => state_key.to_string(),
            None => {
                return Err(StateError::NotStateEvent {
                    event_type: event.event_type().to_string(),
                    event_id: event.event_id().map(str::to_string),
                })
            }
        };

        let event_type = event.event_type().as_str().to_string();

        let prev = self.state.insert(&event_type, &state_key, event);
        if let Some(prev) = &prev {
            debug!(
                "Replaced {} {:?} in {}: {:?}",
                event_type,
                state_key,
                self.room_id,
                prev.event_id()
            );
        }

        Ok(prev)
    }

    pub fn get_state(&self, event_type: &str, state_key: &str) -> Option<&Event> {
        self.state.get(event_type, state_key)
    }

    /// The user's membership, `"leave"` if we have no membership event for
    /// them or it didn't decode as one.
    pub fn membership(&self, user_id: &str) -> &str {
        self.state
            .get_membership(user_id)
            .and_then(|e| e.content().as_member())
            .map(|m| &m.membership as &str)
            .unwrap_or(DEFAULT_MEMBERSHIP)
    }

    /// Iterates over `(user_id, membership event)`.
    pub fn members(&self) -> impl Iterator<Item = (&str, &Event)> {
        self.state.iter_members()
    }

    /// Users whose current membership is `membership`.
    pub fn users_with_membership<'a>(
        &'a self,
        membership: &'a str,
    ) -> impl Iterator<Item = &'a str> + 'a {
        self.members()
            .filter(move |(_, e)| {
                e.content()
                    .as_member()
                    .map_or(false, |m| m.membership == membership)
            })
            .map(|(user_id, _)| user_id)
    }

    pub fn name(&self) -> Option<&str> {
        match self.get_state(EventType::RoomName.as_str(), "")?.content() {
            Content::RoomName(c) => Some(&c.name),
            _ => None,
        }
    }

    pub fn topic(&self) -> Option<&str> {
        match self.get_state(EventType::RoomTopic.as_str(), "")?.content() {
            Content::RoomTopic(c) => Some(&c.topic),
            _ => None,
        }
    }

    pub fn state(&self) -> &StateMap<Event> {
        &self.state
    }

    pub fn len(&self) -> usize {
        self.state.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.is_empty()
    }
}

/// Every room we've seen state for, keyed by room ID.
#[derive(Debug, Clone, Default)]
pub struct Rooms {
    rooms: HashMap<String, Room>,
}

impl Rooms {
    pub fn new() -> Rooms {
        Rooms::default()
    }

    /// Applies a state event to the given room, creating the room if this is
    /// the first we've heard of it.
    ///
    /// A rejected event doesn't create the room.
    pub fn apply_state(
        &mut self,
        room_id: &str,
        event: Event,
    ) -> Result<Option<Event>, StateError> {
        if !event.is_state() {
            return Err(StateError::NotStateEvent {
                event_type: event.event_type().to_string(),
                event_id: event.event_id().map(str::to_string),
            });
        }

        self.rooms
            .entry(room_id.to_string())
            .or_insert_with(|| Room::new(room_id))
            .apply_state(event)
    }

    pub fn get(&self, room_id: &str) -> Option<&Room> {
        self.rooms.get(room_id)
    }

    pub fn get_state(
        &self,
        room_id: &str,
        event_type: &str,
        state_key: &str,
    ) -> Option<&Event> {
        self.get(room_id)?.get_state(event_type, state_key)
    }

    /// See [`Room::membership`]. Unknown rooms report `"leave"` too.
    pub fn membership(&self, room_id: &str, user_id: &str) -> &str {
        self.get(room_id)
            .map(|room| room.membership(user_id))
            .unwrap_or(DEFAULT_MEMBERSHIP)
    }

    pub fn room_ids(&self) -> impl Iterator<Item = &str> {
        self.rooms.keys().map(|r| r as &str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Room> {
        self.rooms.values()
    }

    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }
}
