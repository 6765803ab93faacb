//! Message factory.
//!
//! Pure constructors for the payload records the controller broadcasts.
//! The only ambient input is the wall clock, taken from an
//! [`Environment`] so tests can fix it.

use roomcast_proto::{LocationMessage, Message};

use crate::env::Environment;

/// Builds a chat message stamped with the current wall-clock time.
pub fn generate_message(env: &impl Environment, username: &str, text: &str) -> Message {
    Message {
        username: username.to_owned(),
        text: text.to_owned(),
        created_at: env.wall_clock_millis(),
    }
}

/// Builds a location message whose URL encodes the given coordinates.
pub fn generate_location_message(
    env: &impl Environment,
    username: &str,
    latitude: f64,
    longitude: f64,
) -> LocationMessage {
    LocationMessage {
        username: username.to_owned(),
        url: map_link(latitude, longitude),
        created_at: env.wall_clock_millis(),
    }
}

/// Map link for a latitude/longitude pair.
pub fn map_link(latitude: f64, longitude: f64) -> String {
    format!("https://google.com/maps?q={latitude},{longitude}")
}
