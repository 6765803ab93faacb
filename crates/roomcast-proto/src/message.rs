//! Message payload records.
//!
//! These are the user-visible payloads the server fans out to a room: chat
//! text, shared map links, and the room roster. All of them are ephemeral;
//! the server constructs, forwards, and discards them.

use serde::{Deserialize, Serialize};

/// A chat message as delivered to room members.
///
/// `username` is the sender's registered name, or `Admin` for
/// server-authored notices (welcome, joined, left).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    /// Sender's registered username.
    pub username: String,

    /// Message body, forwarded verbatim.
    pub text: String,

    /// Creation time in Unix milliseconds since epoch (UTC).
    pub created_at: u64,
}

/// A shared geolocation as delivered to room members.
///
/// `url` is a map link encoding the sender's coordinates; clients render it
/// as a hyperlink rather than raw numbers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationMessage {
    /// Sender's registered username.
    pub username: String,

    /// Map link of the form `https://google.com/maps?q=<lat>,<lon>`.
    pub url: String,

    /// Creation time in Unix milliseconds since epoch (UTC).
    pub created_at: u64,
}

/// Roster of a single room, recomputed from the registry on every
/// join/leave and broadcast to the whole room.
///
/// Users appear in registry insertion order. The order carries no meaning
/// for clients but is deterministic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomSnapshot {
    /// Room name.
    pub room: String,

    /// Current occupants, in insertion order.
    pub users: Vec<RoomUser>,
}

/// A single roster entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomUser {
    /// The occupant's username.
    pub username: String,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn message_uses_camel_case_field_names() {
        let message = Message {
            username: "alice".to_owned(),
            text: "hi".to_owned(),
            created_at: 1_234_567_890,
        };

        let value = serde_json::to_value(&message).unwrap();
        assert_eq!(
            value,
            json!({ "username": "alice", "text": "hi", "createdAt": 1_234_567_890_u64 })
        );
    }

    #[test]
    fn location_message_round_trip() {
        let original = LocationMessage {
            username: "bob".to_owned(),
            url: "https://google.com/maps?q=51.5,-0.12".to_owned(),
            created_at: 42,
        };

        let encoded = serde_json::to_string(&original).unwrap();
        let decoded: LocationMessage = serde_json::from_str(&encoded).unwrap();

        assert_eq!(original, decoded);
    }

    #[test]
    fn room_snapshot_lists_users_in_order() {
        let snapshot = RoomSnapshot {
            room: "lobby".to_owned(),
            users: vec![
                RoomUser { username: "alice".to_owned() },
                RoomUser { username: "bob".to_owned() },
            ],
        };

        let value = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(
            value,
            json!({
                "room": "lobby",
                "users": [{ "username": "alice" }, { "username": "bob" }],
            })
        );
    }
}
