//! echo-relay server entry point.
//!
//! Binds the configured port and serves WebSocket echo sessions until
//! Ctrl-C or SIGTERM.

use tracing_subscriber::EnvFilter;

use echo_relay::config::RelayConfig;
use echo_relay::server::RelayServer;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load configuration
    let config = RelayConfig::from_env()?;
    tracing::info!(addr = %config.listen_addr(), "starting echo-relay");

    // Bind before serving so a busy port aborts startup
    let server = RelayServer::bind(&config).await?;

    server.run().await?;

    Ok(())
}
