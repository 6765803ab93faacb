//! Presence/broadcast controller.
//!
//! The connection-lifecycle state machine: connect → join → active →
//! disconnect. Each inbound [`ChatEvent`] is processed to completion and
//! yields an ordered list of [`ChatAction`]s; the runtime executes them in
//! order and owns all actual I/O. Broadcast targets are named by room, not
//! enumerated, so the runtime resolves membership against the registry at
//! execution time, after the mutation that triggered the broadcast has been
//! committed.
//!
//! Errors never escape as faults: every rejection becomes the error string
//! of a [`ChatAction::Ack`] to the originating connection.

use std::collections::HashSet;

use roomcast_proto::{RoomSnapshot, RoomUser, ServerEvent};

use crate::{
    env::Environment,
    error::ChatError,
    messages,
    registry::{ConnectionId, UserRegistry},
};

/// Username attached to server-authored notices.
const ADMIN_USERNAME: &str = "Admin";

/// Session events consumed by the controller.
///
/// Produced by the transport layer: one `Connected` when a socket is
/// accepted, one `Disconnected` when it closes, and one event per decoded
/// client frame in between.
#[derive(Debug, Clone)]
pub enum ChatEvent {
    /// A connection was accepted by the transport.
    Connected {
        /// The new connection.
        connection: ConnectionId,
    },

    /// The client asked to join a room.
    Join {
        /// Originating connection.
        connection: ConnectionId,
        /// Requested username (trimmed by the registry).
        username: String,
        /// Requested room (trimmed by the registry).
        room: String,
    },

    /// The client sent a text message to its room.
    Message {
        /// Originating connection.
        connection: ConnectionId,
        /// Message body.
        text: String,
    },

    /// The client shared its coordinates with its room.
    Location {
        /// Originating connection.
        connection: ConnectionId,
        /// Latitude in degrees.
        latitude: f64,
        /// Longitude in degrees.
        longitude: f64,
    },

    /// The connection closed (by peer or error).
    Disconnected {
        /// The closed connection.
        connection: ConnectionId,
    },
}

/// Actions the controller asks the runtime to execute, in order.
#[derive(Debug, Clone, PartialEq)]
pub enum ChatAction {
    /// Deliver an event to a single connection.
    Send {
        /// Target connection.
        connection: ConnectionId,
        /// Event to deliver.
        event: ServerEvent,
    },

    /// Deliver an event to every connection in a room.
    ///
    /// The runtime resolves membership via
    /// [`ChatController::connections_in_room`] when it executes the action.
    Broadcast {
        /// Target room.
        room: String,
        /// Event to deliver.
        event: ServerEvent,
        /// Connection to skip (the sender, for join notices).
        exclude: Option<ConnectionId>,
    },

    /// Acknowledge the client request that produced this action list.
    ///
    /// Always ordered after the sends it confirms: acknowledgement means
    /// "accepted and processed", not "delivered to peers".
    Ack {
        /// Originating connection.
        connection: ConnectionId,
        /// Rejection reason; `None` on success.
        error: Option<String>,
    },

    /// Emit a log line (runtime maps this onto its logging facility).
    Log {
        /// Severity.
        level: LogLevel,
        /// Message to log.
        message: String,
    },
}

/// Log levels for controller actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug information.
    Debug,
    /// Informational message.
    Info,
    /// Warning.
    Warn,
}

/// The connection-lifecycle state machine.
///
/// Owns the [`UserRegistry`]; a connection is *joined* exactly when the
/// registry has an entry for it. The separate connection set tracks
/// transport-level presence for connections that have not (yet) joined.
pub struct ChatController<E: Environment> {
    /// Transport-level connections, joined or not.
    connections: HashSet<ConnectionId>,
    /// Joined users.
    registry: UserRegistry,
    /// Environment (wall clock for message timestamps).
    env: E,
}

impl<E: Environment> ChatController<E> {
    /// Creates a controller with an empty registry.
    pub fn new(env: E) -> Self {
        Self { connections: HashSet::new(), registry: UserRegistry::new(), env }
    }

    /// Processes a session event and returns the actions to execute.
    ///
    /// This is the single entry point for the state machine. The call
    /// mutates shared state and must run as an atomic unit: callers hold
    /// one lock across this call and the execution of the returned actions.
    pub fn process_event(&mut self, event: ChatEvent) -> Vec<ChatAction> {
        match event {
            ChatEvent::Connected { connection } => self.handle_connected(connection),
            ChatEvent::Join { connection, username, room } => {
                self.handle_join(connection, &username, &room)
            },
            ChatEvent::Message { connection, text } => self.handle_message(connection, &text),
            ChatEvent::Location { connection, latitude, longitude } => {
                self.handle_location(connection, latitude, longitude)
            },
            ChatEvent::Disconnected { connection } => self.handle_disconnected(connection),
        }
    }

    /// Connections currently joined to `room`, in insertion order.
    ///
    /// Used by the runtime to resolve [`ChatAction::Broadcast`] targets.
    pub fn connections_in_room(&self, room: &str) -> Vec<ConnectionId> {
        self.registry.users_in_room(room).map(|user| user.id).collect()
    }

    /// Number of transport-level connections (joined or not).
    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    /// Number of joined users across all rooms.
    pub fn user_count(&self) -> usize {
        self.registry.len()
    }

    fn handle_connected(&mut self, connection: ConnectionId) -> Vec<ChatAction> {
        self.connections.insert(connection);

        vec![ChatAction::Log {
            level: LogLevel::Info,
            message: format!("new WebSocket connection {connection}"),
        }]
    }

    fn handle_join(
        &mut self,
        connection: ConnectionId,
        username: &str,
        room: &str,
    ) -> Vec<ChatAction> {
        // A user's room and username are immutable for the connection's
        // lifetime; a second join is rejected, not re-validated.
        if self.registry.get_user(connection).is_some() {
            return vec![ChatAction::Ack {
                connection,
                error: Some(ChatError::AlreadyJoined.to_string()),
            }];
        }

        let user = match self.registry.add_user(connection, username, room) {
            Ok(user) => user,
            Err(err) => {
                return vec![ChatAction::Ack { connection, error: Some(err.to_string()) }];
            },
        };

        // Order matters: the joining user sees their own welcome before
        // anyone is told about them, and the roster update goes out last so
        // it reflects the committed membership.
        vec![
            ChatAction::Log {
                level: LogLevel::Info,
                message: format!("{} joined room {} ({connection})", user.username, user.room),
            },
            ChatAction::Send {
                connection,
                event: ServerEvent::Message(messages::generate_message(
                    &self.env,
                    ADMIN_USERNAME,
                    "Welcome!",
                )),
            },
            ChatAction::Broadcast {
                room: user.room.clone(),
                event: ServerEvent::Message(messages::generate_message(
                    &self.env,
                    ADMIN_USERNAME,
                    &format!("{} has joined!", user.username),
                )),
                exclude: Some(connection),
            },
            ChatAction::Broadcast {
                room: user.room.clone(),
                event: ServerEvent::RoomData(self.room_snapshot(&user.room)),
                exclude: None,
            },
            ChatAction::Ack { connection, error: None },
        ]
    }

    fn handle_message(&mut self, connection: ConnectionId, text: &str) -> Vec<ChatAction> {
        let Some(user) = self.registry.get_user(connection) else {
            return Self::reject_unjoined(connection, "message");
        };

        vec![
            ChatAction::Broadcast {
                room: user.room.clone(),
                event: ServerEvent::Message(messages::generate_message(
                    &self.env,
                    &user.username,
                    text,
                )),
                exclude: None,
            },
            ChatAction::Ack { connection, error: None },
        ]
    }

    fn handle_location(
        &mut self,
        connection: ConnectionId,
        latitude: f64,
        longitude: f64,
    ) -> Vec<ChatAction> {
        let Some(user) = self.registry.get_user(connection) else {
            return Self::reject_unjoined(connection, "location");
        };

        vec![
            ChatAction::Broadcast {
                room: user.room.clone(),
                event: ServerEvent::LocationMessage(messages::generate_location_message(
                    &self.env,
                    &user.username,
                    latitude,
                    longitude,
                )),
                exclude: None,
            },
            ChatAction::Ack { connection, error: None },
        ]
    }

    fn handle_disconnected(&mut self, connection: ConnectionId) -> Vec<ChatAction> {
        self.connections.remove(&connection);

        // Idempotent: a connection that never joined (or already
        // disconnected) produces no broadcasts.
        let Some(user) = self.registry.remove_user(connection) else {
            return Vec::new();
        };

        vec![
            ChatAction::Log {
                level: LogLevel::Info,
                message: format!("{} left room {} ({connection})", user.username, user.room),
            },
            ChatAction::Broadcast {
                room: user.room.clone(),
                event: ServerEvent::Message(messages::generate_message(
                    &self.env,
                    ADMIN_USERNAME,
                    &format!("{} has left", user.username),
                )),
                exclude: None,
            },
            ChatAction::Broadcast {
                room: user.room.clone(),
                event: ServerEvent::RoomData(self.room_snapshot(&user.room)),
                exclude: None,
            },
        ]
    }

    /// Rejection for message/location events from unjoined connections.
    ///
    /// Should not occur under correct client behavior; must not fault.
    fn reject_unjoined(connection: ConnectionId, kind: &str) -> Vec<ChatAction> {
        vec![
            ChatAction::Log {
                level: LogLevel::Warn,
                message: format!("{kind} event from unjoined connection {connection}"),
            },
            ChatAction::Ack { connection, error: Some(ChatError::UnknownUser.to_string()) },
        ]
    }

    /// Fresh roster for `room`, recomputed from the registry.
    fn room_snapshot(&self, room: &str) -> RoomSnapshot {
        let users = self
            .registry
            .users_in_room(room)
            .map(|user| RoomUser { username: user.username.clone() })
            .collect();

        RoomSnapshot { room: room.to_owned(), users }
    }
}

impl<E: Environment> std::fmt::Debug for ChatController<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatController")
            .field("connection_count", &self.connections.len())
            .field("user_count", &self.registry.len())
            .finish()
    }
}
