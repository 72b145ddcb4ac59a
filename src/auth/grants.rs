//! Permission grants embedded in an access token.

use serde_derive::{Deserialize, Serialize};

fn is_false(value: &bool) -> bool {
    !*value
}

/// Room permissions, serialized under the `video` claim.
///
/// Only set fields are emitted, matching what the platform expects.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct VideoGrant {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub room: Option<String>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub room_join: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub can_publish: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub can_subscribe: Option<bool>,
}

impl VideoGrant {
    /// Join `room` with microphone publishing and subscription to the other
    /// participants (the voice agent) enabled.
    pub fn join_and_talk(room: impl Into<String>) -> Self {
        Self {
            room: Some(room.into()),
            room_join: true,
            can_publish: Some(true),
            can_subscribe: Some(true),
        }
    }

    pub fn allows_join(&self, room: &str) -> bool {
        self.room_join && self.room.as_deref() == Some(room)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_and_talk_serializes_all_flags() {
        let grant = VideoGrant::join_and_talk("test-room-22");
        let value = serde_json::to_value(&grant).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "room": "test-room-22",
                "roomJoin": true,
                "canPublish": true,
                "canSubscribe": true,
            })
        );
    }

    #[test]
    fn unset_fields_are_omitted() {
        let value = serde_json::to_value(VideoGrant::default()).unwrap();
        assert_eq!(value, serde_json::json!({}));
    }

    #[test]
    fn join_is_scoped_to_one_room() {
        let grant = VideoGrant::join_and_talk("a");
        assert!(grant.allows_join("a"));
        assert!(!grant.allows_join("b"));
        assert!(!VideoGrant::default().allows_join("a"));
    }
}
