//! Server error types.

/// Errors that can occur while starting or running the server.
///
/// Chat-level rejections never appear here: they are converted to `ack`
/// frames at the controller boundary. This type covers startup and
/// listener-level failures only.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Configuration error (invalid port, unusable public directory).
    ///
    /// Fatal: fix the configuration and restart.
    #[error("configuration error: {0}")]
    Config(String),

    /// I/O error from the TCP listener or HTTP server.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}
