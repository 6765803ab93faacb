//! In-memory user registry.
//!
//! The registry is the single shared mutable collection of the service: the
//! set of all live users, keyed by connection identity, partitioned into
//! rooms by name. It enforces per-room username uniqueness and hands out
//! clones rather than aliases into its own storage.
//!
//! Storage is a plain insertion-ordered `Vec`: room rosters must come back
//! in a deterministic order, population is small, and every operation is
//! O(number of users) by design. Callers serialize access through one lock;
//! each method is a complete atomic unit.

use std::fmt;

use crate::error::ChatError;

/// Opaque per-connection identity assigned by the transport layer.
///
/// Unique per live connection and stable for its lifetime. The registry
/// treats it as the primary key; nothing in the core inspects the inner
/// value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(u64);

impl ConnectionId {
    /// Wraps a transport-assigned identifier.
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

/// A live chat participant.
///
/// Created when a connection completes the join protocol, destroyed on
/// disconnect. Username and room are stored post-trim and never mutate for
/// the life of the connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    /// Connection identity (primary key).
    pub id: ConnectionId,
    /// Display name, unique within `room`.
    pub username: String,
    /// Room the user joined.
    pub room: String,
}

/// The set of all live users, process-wide.
///
/// # Invariants
///
/// - No two users share a `(room, username)` pair (exact match, post-trim,
///   case-sensitive)
/// - No two users share a `ConnectionId`, regardless of room; the
///   controller rejects a second join before calling [`Self::add_user`]
#[derive(Debug, Default)]
pub struct UserRegistry {
    users: Vec<User>,
}

impl UserRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates and stores a new user, returning a clone of the stored
    /// record.
    ///
    /// Both strings are trimmed of surrounding whitespace first. Fails with
    /// [`ChatError::Validation`] if either is empty after trimming, and
    /// with [`ChatError::DuplicateName`] if the `(room, username)` pair is
    /// already occupied. No case folding is applied: names differing only
    /// in case are distinct users.
    pub fn add_user(
        &mut self,
        id: ConnectionId,
        username: &str,
        room: &str,
    ) -> Result<User, ChatError> {
        let username = username.trim();
        let room = room.trim();

        if username.is_empty() || room.is_empty() {
            return Err(ChatError::Validation);
        }

        if self.users.iter().any(|user| user.room == room && user.username == username) {
            return Err(ChatError::DuplicateName);
        }

        let user = User { id, username: username.to_owned(), room: room.to_owned() };
        self.users.push(user.clone());

        Ok(user)
    }

    /// Removes and returns the user owning `id`.
    ///
    /// Safe to call for connections that never joined: returns `None`
    /// without touching the registry.
    pub fn remove_user(&mut self, id: ConnectionId) -> Option<User> {
        let index = self.users.iter().position(|user| user.id == id)?;
        Some(self.users.remove(index))
    }

    /// The user owning `id`, if any. Pure lookup.
    pub fn get_user(&self, id: ConnectionId) -> Option<&User> {
        self.users.iter().find(|user| user.id == id)
    }

    /// All users whose room equals `room`, in insertion order.
    pub fn users_in_room<'a>(&'a self, room: &'a str) -> impl Iterator<Item = &'a User> + 'a {
        self.users.iter().filter(move |user| user.room == room)
    }

    /// Total number of live users.
    pub fn len(&self) -> usize {
        self.users.len()
    }

    /// Whether the registry has no users.
    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}
