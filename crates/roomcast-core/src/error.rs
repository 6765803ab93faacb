//! Chat error taxonomy.

/// Errors surfaced to clients through acknowledgements.
///
/// Every variant is recoverable at the controller boundary: it becomes the
/// error string of an `ack` frame to the originating connection and never
/// terminates the connection or affects other clients. The `Display`
/// strings are the exact texts clients render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ChatError {
    /// Username or room was empty after trimming.
    #[error("Username and room are required")]
    Validation,

    /// The `(room, username)` pair is already occupied by a live user.
    #[error("That username is in use!")]
    DuplicateName,

    /// Operation referenced a connection with no registry entry.
    ///
    /// Defensive case: does not occur under correct client behavior, but a
    /// message from an unjoined connection must not fault the process.
    #[error("No user found for this connection")]
    UnknownUser,

    /// A second join attempt from a connection that already joined a room.
    ///
    /// A user's room and username are immutable for the connection's
    /// lifetime; reconnect to switch rooms.
    #[error("Already joined a room")]
    AlreadyJoined,
}
