use std::collections::BTreeMap;

use super::message::ImageInfo;

/// Content of `m.room.aliases`. Also used for `m.room.guest_access` and
/// `m.direct`, so every field has to tolerate being absent.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RoomAliases {
    #[serde(default)]
    pub aliases: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RoomCanonicalAlias {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomCreate {
    pub creator: String,
    #[serde(
        rename = "m.federate",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub federate: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub room_version: Option<String>,
}

impl RoomCreate {
    /// Rooms federate unless the creator said otherwise.
    pub fn federates(&self) -> bool {
        self.federate.unwrap_or(true)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomJoinRules {
    pub join_rule: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomMember {
    pub membership: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub displayname: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_direct: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub third_party_invite: Option<MemberThirdPartyInvite>,
}

impl RoomMember {
    pub fn new(membership: impl Into<String>) -> RoomMember {
        RoomMember {
            membership: membership.into(),
            avatar_url: None,
            displayname: None,
            is_direct: None,
            third_party_invite: None,
        }
    }
}

/// The invite a membership was derived from, if any.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberThirdPartyInvite {
    pub display_name: String,
    pub signed: serde_json::Map<String, serde_json::Value>,
}

const DEFAULT_STATE_LEVEL: i64 = 50;

/// Content of `m.room.power_levels`. Fields left out on the wire fall back to
/// the protocol defaults via the accessor methods.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RoomPowerLevels {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ban: Option<i64>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub events: BTreeMap<String, i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub events_default: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invite: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kick: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redact: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state_default: Option<i64>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub users: BTreeMap<String, i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub users_default: Option<i64>,
}

impl RoomPowerLevels {
    pub fn user_level(&self, user_id: &str) -> i64 {
        self.users
            .get(user_id)
            .copied()
            .unwrap_or_else(|| self.users_default.unwrap_or(0))
    }

    /// Level needed to send an event of the given type.
    pub fn event_level(&self, event_type: &str, is_state: bool) -> i64 {
        if let Some(level) = self.events.get(event_type) {
            return *level;
        }

        if is_state {
            self.state_default.unwrap_or(DEFAULT_STATE_LEVEL)
        } else {
            self.events_default.unwrap_or(0)
        }
    }

    pub fn ban_level(&self) -> i64 {
        self.ban.unwrap_or(DEFAULT_STATE_LEVEL)
    }

    pub fn kick_level(&self) -> i64 {
        self.kick.unwrap_or(DEFAULT_STATE_LEVEL)
    }

    pub fn redact_level(&self) -> i64 {
        self.redact.unwrap_or(DEFAULT_STATE_LEVEL)
    }

    pub fn invite_level(&self) -> i64 {
        self.invite.unwrap_or(0)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RoomRedaction {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomMessageFeedback {
    pub target_event_id: String,
    #[serde(rename = "type")]
    pub feedback_type: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomName {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomTopic {
    pub topic: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomAvatar {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub info: Option<ImageInfo>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RoomPinnedEvents {
    pub pinned: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomHistoryVisibility {
    pub history_visibility: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomThirdPartyInvite {
    pub display_name: String,
    pub key_validity_url: String,
    pub public_key: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub public_keys: Vec<PublicKey>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublicKey {
    pub public_key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_validity_url: Option<String>,
}
