use failure::Fail;

/// Failure to turn raw JSON into an [`Event`](super::events::Event).
#[derive(Debug, Fail)]
pub enum DecodeError {
    /// The outer object isn't valid JSON, or is missing `sender`, `type` or
    /// `content`.
    #[fail(display = "malformed event envelope: {}", source)]
    MalformedEnvelope {
        #[cause]
        source: serde_json::Error,
    },

    /// The envelope parsed but its `content` doesn't fit the shape registered
    /// for the event type.
    #[fail(
        display = "malformed content for {} event {:?}: {}",
        event_type, event_id, source
    )]
    MalformedContent {
        event_type: String,
        event_id: Option<String>,
        #[cause]
        source: serde_json::Error,
    },

    #[fail(display = "unknown msgtype: {}", msgtype)]
    UnknownMessageSubtype { msgtype: String },
}

impl DecodeError {
    pub(crate) fn content(
        event_type: &str,
        event_id: Option<&str>,
        source: serde_json::Error,
    ) -> DecodeError {
        DecodeError::MalformedContent {
            event_type: event_type.to_string(),
            event_id: event_id.map(str::to_string),
            source,
        }
    }
}

#[derive(Debug, Fail)]
#[fail(display = "failed to encode event: {}", source)]
pub struct EncodeError {
    #[cause]
    pub source: serde_json::Error,
}

impl From<serde_json::Error> for EncodeError {
    fn from(source: serde_json::Error) -> Self {
        EncodeError { source }
    }
}

/// Returned when an event can't be folded into room state.
#[derive(Debug, Fail)]
pub enum StateError {
    #[fail(
        display = "{} event {:?} has no state_key",
        event_type, event_id
    )]
    NotStateEvent {
        event_type: String,
        event_id: Option<String>,
    },
}
