#![allow(clippy::type_complexity)]

#[macro_use]
extern crate serde_derive;
#[cfg(test)]
#[macro_use]
extern crate serde_json;

pub mod protocol;
pub mod room;
pub mod state_map;

pub use crate::protocol::content::{Content, EventType};
pub use crate::protocol::errors::{DecodeError, EncodeError, StateError};
pub use crate::protocol::events::{Event, EventBuilder};
pub use crate::room::{Room, Rooms};
