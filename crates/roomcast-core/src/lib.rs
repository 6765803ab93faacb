//! Roomcast chat core.
//!
//! Room-scoped presence and broadcast logic with no I/O attached. The
//! [`ChatController`] consumes session events (connect, join, message,
//! location, disconnect), mutates the in-memory [`UserRegistry`], and
//! returns a list of [`ChatAction`]s for a runtime to execute. The runtime
//! decides what "send to a connection" means; the core decides who receives
//! what, and in what order.
//!
//! # Components
//!
//! - [`UserRegistry`]: who is in which room, with duplicate-name arbitration
//! - [`messages`]: timestamped message construction
//! - [`ChatController`]: the connection-lifecycle state machine
//! - [`Environment`]: time and randomness abstraction for deterministic
//!   tests

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod controller;
mod env;
mod error;
pub mod messages;
mod registry;

pub use controller::{ChatAction, ChatController, ChatEvent, LogLevel};
pub use env::Environment;
pub use error::ChatError;
pub use registry::{ConnectionId, User, UserRegistry};
