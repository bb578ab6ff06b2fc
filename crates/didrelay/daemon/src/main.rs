//! didrelay daemon - DIDComm connection router
//!
//! The daemon provides:
//! - Acceptance policy for connection and mediation requests
//! - Connection lifecycle tracking
//! - Out-of-band invitation creation over HTTP

use clap::Parser;
use didrelay_daemon::config::DaemonConfig;
use didrelay_daemon::error::{DaemonError, DaemonResult};
use didrelay_daemon::server::Server;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// didrelay daemon CLI
#[derive(Parser)]
#[command(name = "didrelayd")]
#[command(about = "didrelay - DIDComm connection router", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "DIDRELAY_CONFIG")]
    config: Option<String>,

    /// Listen address
    #[arg(short, long, env = "DIDRELAY_LISTEN_ADDR")]
    listen: Option<String>,

    /// Protocol role (responder or inviter)
    #[arg(short, long, env = "DIDRELAY_ROLE")]
    role: Option<String>,

    /// Log level
    #[arg(long, env = "DIDRELAY_LOG_LEVEL")]
    log_level: Option<String>,

    /// Enable JSON logging
    #[arg(long, env = "DIDRELAY_LOG_JSON")]
    json: bool,
}

#[tokio::main]
async fn main() -> DaemonResult<()> {
    let cli = Cli::parse();

    // Load configuration
    let mut config = DaemonConfig::load(cli.config.as_deref())
        .map_err(|e| DaemonError::Config(e.to_string()))?;

    // Override with CLI args
    if let Some(listen) = &cli.listen {
        config.server.listen_addr = listen
            .parse()
            .map_err(|e| DaemonError::Config(format!("Invalid listen address: {}", e)))?;
    }
    if let Some(role) = &cli.role {
        config.dispatcher.role = role.parse().map_err(DaemonError::Config)?;
    }
    if let Some(level) = cli.log_level {
        config.logging.level = level;
    }
    config.logging.json |= cli.json;

    // Initialize tracing
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| config.logging.level.clone().into());

    if config.logging.json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        listen = %config.server.listen_addr,
        role = %config.dispatcher.role,
        "Starting didrelay"
    );

    // Create and run server
    let server = Server::new(config)?;
    server.run().await
}
