//! Roomcast production server.
//!
//! Production runtime wrapping [`roomcast_core`]'s action-based logic with
//! real I/O: Axum WebSocket transport, Tokio async runtime, system wall
//! clock with OS randomness. The [`ChatController`] stays free of I/O; this
//! crate decodes client frames into events, feeds them to the controller,
//! and executes the returned actions over per-connection channels.
//!
//! # Components
//!
//! - [`Server`]: binds the listener and runs the accept loop
//! - `transport`: WebSocket upgrade, per-connection read/write tasks
//! - `executor`: turns [`ChatAction`]s into outbound frames
//! - [`SystemEnv`]: production environment (real clock, OS RNG)
//!
//! [`ChatController`]: roomcast_core::ChatController
//! [`ChatAction`]: roomcast_core::ChatAction

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod error;
mod executor;
mod system_env;
mod transport;

use std::{collections::HashMap, net::SocketAddr, path::PathBuf, sync::Arc};

use axum::{Router, extract::ws};
pub use error::ServerError;
use roomcast_core::{ChatController, ConnectionId};
pub use system_env::SystemEnv;
use tokio::{
    net::TcpListener,
    sync::{Mutex, RwLock, mpsc},
};

/// Shared state for all connections.
///
/// The controller lock serializes event processing: each event and the
/// execution of its actions happen under one acquisition, so broadcast
/// membership is always resolved against committed registry state. Sends go
/// through per-connection unbounded channels and never block while the lock
/// is held.
pub(crate) struct SharedState {
    /// The chat state machine and its registry.
    pub(crate) controller: Mutex<ChatController<SystemEnv>>,
    /// Per-connection outbound channels, drained by one writer task each
    /// (preserves per-connection delivery order).
    pub(crate) senders: RwLock<HashMap<ConnectionId, mpsc::UnboundedSender<ws::Message>>>,
    /// Environment for connection id generation.
    pub(crate) env: SystemEnv,
}

/// Server configuration for the production runtime.
#[derive(Debug, Clone)]
pub struct ServerRuntimeConfig {
    /// Port to listen on (`0` picks an ephemeral port).
    pub port: u16,
    /// Directory with the static browser client.
    pub public_dir: PathBuf,
}

impl Default for ServerRuntimeConfig {
    fn default() -> Self {
        Self { port: 3000, public_dir: PathBuf::from("public") }
    }
}

/// Production Roomcast server.
///
/// Wraps the chat controller with WebSocket transport and static asset
/// serving.
pub struct Server {
    listener: TcpListener,
    app: Router,
}

impl Server {
    /// Creates the shared state and binds the TCP listener.
    pub async fn bind(config: ServerRuntimeConfig) -> Result<Self, ServerError> {
        let env = SystemEnv::new();
        let state = Arc::new(SharedState {
            controller: Mutex::new(ChatController::new(env.clone())),
            senders: RwLock::new(HashMap::new()),
            env,
        });

        if !config.public_dir.is_dir() {
            tracing::warn!(
                "public directory {} not found - static client will 404",
                config.public_dir.display()
            );
        }

        let app = transport::router(state, &config.public_dir);
        let listener = TcpListener::bind(SocketAddr::from(([0, 0, 0, 0], config.port))).await?;

        Ok(Self { listener, app })
    }

    /// Local address the server is bound to.
    pub fn local_addr(&self) -> Result<SocketAddr, ServerError> {
        Ok(self.listener.local_addr()?)
    }

    /// Runs the server, accepting connections and processing events.
    ///
    /// This method runs until the process is shut down or an error occurs.
    pub async fn run(self) -> Result<(), ServerError> {
        axum::serve(self.listener, self.app).await?;
        Ok(())
    }
}
