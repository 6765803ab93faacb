//! Roomcast server binary.
//!
//! # Usage
//!
//! ```bash
//! # Start on the default port
//! roomcast-server
//!
//! # Port from the environment (deployment convention), client elsewhere
//! PORT=8080 roomcast-server --public-dir ./public
//! ```

use std::path::PathBuf;

use clap::Parser;
use roomcast_server::{Server, ServerRuntimeConfig};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Roomcast chat server
#[derive(Parser, Debug)]
#[command(name = "roomcast-server")]
#[command(about = "Room-scoped chat server with WebSocket transport")]
#[command(version)]
struct Args {
    /// Port to listen on
    #[arg(short, long, env = "PORT", default_value_t = 3000)]
    port: u16,

    /// Directory with the static browser client
    #[arg(long, default_value = "public")]
    public_dir: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    tracing_subscriber::registry().with(fmt::layer()).with(filter).init();

    tracing::info!("Roomcast server starting");

    let config = ServerRuntimeConfig { port: args.port, public_dir: args.public_dir };
    let server = Server::bind(config).await?;

    tracing::info!("Server is up and running on {}", server.local_addr()?);

    server.run().await?;

    Ok(())
}
