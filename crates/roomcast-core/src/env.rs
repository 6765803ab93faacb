//! Environment abstraction for deterministic testing.
//!
//! Decouples chat logic from system resources (wall clock, randomness).
//! Production uses real system time and OS randomness; tests substitute
//! fixed clocks so message timestamps are predictable.

/// Abstract environment providing wall-clock time and randomness.
///
/// # Invariants
///
/// - `wall_clock_millis()` never goes backwards within a single execution
/// - `random_bytes()` uses cryptographically secure entropy in production
pub trait Environment: Clone + Send + Sync + 'static {
    /// Current wall-clock time in Unix milliseconds since epoch (UTC).
    ///
    /// Stamped onto every outbound message as `createdAt`.
    fn wall_clock_millis(&self) -> u64;

    /// Fills the provided buffer with random bytes.
    fn random_bytes(&self, buffer: &mut [u8]);

    /// Generates a random `u64`.
    ///
    /// Convenience for common use cases like assigning connection
    /// identifiers.
    fn random_u64(&self) -> u64 {
        let mut bytes = [0u8; 8];
        self.random_bytes(&mut bytes);
        u64::from_be_bytes(bytes)
    }
}
