//! Roomcast wire protocol.
//!
//! JSON-encoded chat events exchanged with clients over a WebSocket. Every
//! frame is a single JSON object carrying a `"type"` field that names the
//! event; the remaining fields are the event payload. Field names are
//! camelCase on the wire (`createdAt`), matching what the browser client
//! renders.
//!
//! We chose JSON over a binary encoding because the peer is a browser: the
//! client consumes frames with `JSON.parse` and needs no codec. Throughput
//! is bounded by typing speed, not encoding cost.
//!
//! # Invariants
//!
//! Each event variant maps to exactly one `"type"` tag. Round-trip encoding
//! must produce identical values.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod event;
mod message;

pub use event::{ClientEvent, ServerEvent};
pub use message::{LocationMessage, Message, RoomSnapshot, RoomUser};
