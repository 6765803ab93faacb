//! Chat event envelopes.
//!
//! [`ClientEvent`] covers everything a client may send; [`ServerEvent`]
//! covers everything the server delivers. Both are internally tagged with a
//! `"type"` field so a frame like `{"type":"sendMessage","text":"hi"}`
//! deserializes directly into the matching variant.
//!
//! Acknowledgements are an explicit [`ServerEvent::Ack`] frame rather than a
//! transport-level callback: the server emits one ack per client request,
//! after all resulting sends have been issued, carrying an error string when
//! the request was rejected.

use serde::{Deserialize, Serialize};

use crate::message::{LocationMessage, Message, RoomSnapshot};

/// Events sent by clients.
///
/// Disconnects are transport-level (socket close) and have no envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ClientEvent {
    /// Request to join a room under a username.
    Join {
        /// Requested username, unique within the room after trimming.
        username: String,
        /// Room to join.
        room: String,
    },

    /// Send a text message to the sender's room.
    SendMessage {
        /// Message body.
        text: String,
    },

    /// Share the sender's coordinates with the room.
    SendLocation {
        /// Latitude in degrees.
        latitude: f64,
        /// Longitude in degrees.
        longitude: f64,
    },
}

/// Events delivered by the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ServerEvent {
    /// A chat message (user-authored or an `Admin` notice).
    Message(Message),

    /// A shared geolocation link.
    LocationMessage(LocationMessage),

    /// Updated roster for the recipient's room.
    RoomData(RoomSnapshot),

    /// Acknowledgement of the client's most recent request.
    Ack {
        /// Human-readable rejection reason; absent on success.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        error: Option<String>,
    },
}
