//! `m.room.message` payloads, one shape per `msgtype`.
//!
//! None of the shapes carry a `msgtype` field: it is read when dispatching on
//! decode and written back from the variant on encode, so a payload can't
//! claim to be something it isn't.

use serde_json::Value;

use super::html;

const MSGTYPE_TEXT: &str = "m.text";
const MSGTYPE_EMOTE: &str = "m.emote";
const MSGTYPE_NOTICE: &str = "m.notice";
const MSGTYPE_IMAGE: &str = "m.image";
const MSGTYPE_VIDEO: &str = "m.video";
const MSGTYPE_FILE: &str = "m.file";
const MSGTYPE_LOCATION: &str = "m.location";
const MSGTYPE_AUDIO: &str = "m.audio";

pub const FORMAT_HTML: &str = "org.matrix.custom.html";

/// The known values of `msgtype`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageType {
    Text,
    Emote,
    Notice,
    Image,
    Video,
    File,
    Location,
    Audio,
}

impl MessageType {
    pub fn as_str(self) -> &'static str {
        match self {
            MessageType::Text => MSGTYPE_TEXT,
            MessageType::Emote => MSGTYPE_EMOTE,
            MessageType::Notice => MSGTYPE_NOTICE,
            MessageType::Image => MSGTYPE_IMAGE,
            MessageType::Video => MSGTYPE_VIDEO,
            MessageType::File => MSGTYPE_FILE,
            MessageType::Location => MSGTYPE_LOCATION,
            MessageType::Audio => MSGTYPE_AUDIO,
        }
    }

    /// Returns `None` for msgtypes we don't know how to decode.
    pub fn from_tag(msgtype: &str) -> Option<MessageType> {
        let t = match msgtype {
            MSGTYPE_TEXT => MessageType::Text,
            MSGTYPE_EMOTE => MessageType::Emote,
            MSGTYPE_NOTICE => MessageType::Notice,
            MSGTYPE_IMAGE => MessageType::Image,
            MSGTYPE_VIDEO => MessageType::Video,
            MSGTYPE_FILE => MessageType::File,
            MSGTYPE_LOCATION => MessageType::Location,
            MSGTYPE_AUDIO => MessageType::Audio,
            _ => return None,
        };

        Some(t)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    Text(TextMessage),
    Emote(TextMessage),
    Notice(TextMessage),
    Image(ImageMessage),
    Video(VideoMessage),
    File(FileMessage),
    Location(LocationMessage),
    Audio(AudioMessage),
}

impl Message {
    pub fn msgtype(&self) -> MessageType {
        match self {
            Message::Text(_) => MessageType::Text,
            Message::Emote(_) => MessageType::Emote,
            Message::Notice(_) => MessageType::Notice,
            Message::Image(_) => MessageType::Image,
            Message::Video(_) => MessageType::Video,
            Message::File(_) => MessageType::File,
            Message::Location(_) => MessageType::Location,
            Message::Audio(_) => MessageType::Audio,
        }
    }

    pub fn body(&self) -> &str {
        match self {
            Message::Text(m) | Message::Emote(m) | Message::Notice(m) => &m.body,
            Message::Image(m) => &m.body,
            Message::Video(m) => &m.body,
            Message::File(m) => &m.body,
            Message::Location(m) => &m.body,
            Message::Audio(m) => &m.body,
        }
    }

    pub(crate) fn from_value(
        msgtype: MessageType,
        value: Value,
    ) -> Result<Message, serde_json::Error> {
        let message = match msgtype {
            MessageType::Text => Message::Text(serde_json::from_value(value)?),
            MessageType::Emote => {
                Message::Emote(serde_json::from_value(value)?)
            }
            MessageType::Notice => {
                Message::Notice(serde_json::from_value(value)?)
            }
            MessageType::Image => {
                Message::Image(serde_json::from_value(value)?)
            }
            MessageType::Video => {
                Message::Video(serde_json::from_value(value)?)
            }
            MessageType::File => Message::File(serde_json::from_value(value)?),
            MessageType::Location => {
                Message::Location(serde_json::from_value(value)?)
            }
            MessageType::Audio => {
                Message::Audio(serde_json::from_value(value)?)
            }
        };

        Ok(message)
    }

    /// Serializes the payload and stamps the `msgtype` for this variant.
    ///
    /// Text and emote bodies are rederived from `formatted_body` when one is
    /// set.
    pub(crate) fn to_value(&self) -> Result<Value, serde_json::Error> {
        let mut value = match self {
            Message::Text(m) | Message::Emote(m) => {
                serde_json::to_value(m.with_derived_body())?
            }
            Message::Notice(m) => serde_json::to_value(m)?,
            Message::Image(m) => serde_json::to_value(m)?,
            Message::Video(m) => serde_json::to_value(m)?,
            Message::File(m) => serde_json::to_value(m)?,
            Message::Location(m) => serde_json::to_value(m)?,
            Message::Audio(m) => serde_json::to_value(m)?,
        };

        if let Value::Object(ref mut obj) = value {
            obj.insert(
                "msgtype".to_string(),
                Value::String(self.msgtype().as_str().to_string()),
            );
        }

        Ok(value)
    }
}

/// Shared by `m.text`, `m.emote` and `m.notice`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextMessage {
    pub body: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub formatted_body: Option<String>,
}

impl TextMessage {
    pub fn plain(body: impl Into<String>) -> TextMessage {
        TextMessage {
            body: body.into(),
            format: None,
            formatted_body: None,
        }
    }

    /// A message whose body will be generated from `html` when sent.
    pub fn html(html: impl Into<String>) -> TextMessage {
        TextMessage {
            body: String::new(),
            format: Some(FORMAT_HTML.to_string()),
            formatted_body: Some(html.into()),
        }
    }

    /// The plain text fallback for `formatted_body`, if there is one.
    pub fn derived_body(&self) -> Option<String> {
        let formatted = self.formatted_body.as_ref()?;

        match self.format.as_deref() {
            Some(FORMAT_HTML) => Some(html::to_plain_text(formatted)),
            Some(_) => Some(formatted.clone()),
            None => None,
        }
    }

    fn with_derived_body(&self) -> TextMessage {
        let mut message = self.clone();
        if let Some(body) = self.derived_body() {
            message.body = body;
        }
        message
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ImageInfo {
    #[serde(rename = "h", default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u64>,
    #[serde(rename = "w", default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mimetype: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageMessage {
    pub body: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub info: Option<ImageInfo>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct VideoInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mimetype: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail_info: Option<ImageInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
    #[serde(rename = "h", default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u64>,
    #[serde(rename = "w", default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u64>,
    /// Milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoMessage {
    pub body: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub info: Option<VideoInfo>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FileInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mimetype: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail_info: Option<ImageInfo>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileMessage {
    pub body: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub info: Option<FileInfo>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LocationInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail_info: Option<ImageInfo>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationMessage {
    pub body: String,
    pub geo_uri: String,
    // Older clients sent `location_info`.
    #[serde(
        default,
        alias = "location_info",
        skip_serializing_if = "Option::is_none"
    )]
    pub info: Option<LocationInfo>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AudioInfo {
    /// Milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mimetype: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioMessage {
    pub body: String,
    pub url: String,
    #[serde(
        default,
        alias = "audio_info",
        skip_serializing_if = "Option::is_none"
    )]
    pub info: Option<AudioInfo>,
}
