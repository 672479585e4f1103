//! Events delivered outside the room timeline: typing notifications, read
//! receipts and presence.

use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Typing {
    pub user_ids: Vec<String>,
}

/// Content of `m.receipt`: event ID -> receipts for that event.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Receipt(pub BTreeMap<String, EventReceipts>);

impl Receipt {
    /// Iterates over `(event_id, user_id, ts)` for every read receipt.
    pub fn read_receipts(&self) -> impl Iterator<Item = (&str, &str, u64)> {
        self.0.iter().flat_map(|(event_id, receipts)| {
            receipts.read.iter().map(move |(user_id, r)| {
                (event_id as &str, user_id as &str, r.ts)
            })
        })
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EventReceipts {
    #[serde(rename = "m.read", default)]
    pub read: BTreeMap<String, ReadReceipt>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadReceipt {
    pub ts: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Presence {
    pub presence: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub displayname: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_active_ago: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currently_active: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
}
