//! Production Environment implementation using system time and RNG.
//!
//! `SystemEnv` is the production implementation of the [`Environment`]
//! trait: real wall-clock time and OS cryptographic randomness. Behavior is
//! non-deterministic by design; tests substitute fixed clocks instead.

use roomcast_core::Environment;

/// Production environment using the system clock and OS RNG.
///
/// # Panics
///
/// Panics if the OS RNG fails or the system clock reads before the Unix
/// epoch. Both indicate OS-level breakage the server cannot operate under.
#[derive(Clone, Default)]
pub struct SystemEnv;

impl SystemEnv {
    /// Creates a new system environment.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Environment for SystemEnv {
    #[allow(clippy::expect_used)]
    fn wall_clock_millis(&self) -> u64 {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .expect("invariant: system clock is after Unix epoch (1970-01-01)")
            .as_millis() as u64
    }

    #[allow(clippy::expect_used)]
    fn random_bytes(&self, buffer: &mut [u8]) {
        getrandom::fill(buffer)
            .expect("invariant: OS RNG failure is unrecoverable - cannot assign connection ids");
    }
}
