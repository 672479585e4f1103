//! Client side model of the events a homeserver sends and receives.
//!
//! Raw JSON goes through [`events::Event::decode`], which reads the envelope
//! and then dispatches the `content` through the [`content`] registry.

pub mod content;
pub mod errors;
pub mod events;
