//! Relay serve command
//!
//! Runs the relay server in the foreground: WebSocket relay at /ws,
//! health API, and the embedded landing page. The process runs until
//! externally terminated.

use std::time::Duration;

use anyhow::Result;
use clap::Args;
use relay_server::{RelayServer, ServerConfig};
use tracing::info;

/// Arguments for the serve command
#[derive(Debug, Args)]
pub struct ServeArgs {
    /// Host to bind to
    #[arg(long)]
    pub host: Option<String>,

    /// Port to listen on (overrides the PORT environment variable)
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Seconds between periodic server messages to each device
    #[arg(long)]
    pub keepalive_secs: Option<u64>,
}

/// Run the serve command
pub async fn run(args: ServeArgs) -> Result<()> {
    let mut config = ServerConfig::from_env();
    if let Some(host) = args.host {
        config.host = host;
    }
    if let Some(port) = args.port {
        config.port = port;
    }
    if let Some(secs) = args.keepalive_secs {
        config.keepalive_interval = Duration::from_secs(secs);
    }

    info!("Starting relay server on {}", config.addr());
    RelayServer::new(config).run().await?;
    Ok(())
}
