//! api-relay: single-entry HTTP relay for named upstream APIs.
//!
//! Requests shaped `/proxy/{name}/{remainder...}` are rewritten against the
//! named backend's base URL and relayed transparently, streaming the
//! response back without buffering.

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_relay::config::{load_config, ProxyConfig};
use api_relay::http::HttpServer;
use api_relay::lifecycle::Shutdown;

#[derive(Parser)]
#[command(name = "api-relay")]
#[command(about = "Prefix-dispatch reverse proxy for named upstream APIs", long_about = None)]
struct Cli {
    /// Port to listen on (overrides the config file).
    #[arg(short, long)]
    port: Option<u16>,

    /// Path to a TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "api_relay=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let mut config = match cli.config {
        Some(path) => match load_config(&path) {
            Ok(config) => config,
            Err(e) => {
                tracing::error!(path = %path.display(), error = %e, "Failed to load configuration");
                std::process::exit(1);
            }
        },
        None => ProxyConfig::default().with_default_backends(),
    };

    if let Some(port) = cli.port {
        config.listener.bind_address = match config.listener.bind_address.parse::<SocketAddr>() {
            Ok(mut addr) => {
                addr.set_port(port);
                addr.to_string()
            }
            Err(_) => format!("0.0.0.0:{}", port),
        };
    }

    tracing::info!(
        bind_address = %config.listener.bind_address,
        backends = config.backends.len(),
        "Configuration loaded"
    );

    // A bind failure is fatal; everything past this point is per-request.
    let listener = match TcpListener::bind(&config.listener.bind_address).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!(
                bind_address = %config.listener.bind_address,
                error = %e,
                "Failed to bind listener"
            );
            std::process::exit(1);
        }
    };

    let server = match HttpServer::new(&config) {
        Ok(server) => server,
        Err(e) => {
            tracing::error!(error = %e, "Failed to initialize server");
            std::process::exit(1);
        }
    };

    let shutdown = Shutdown::new();
    if let Err(e) = server.run(listener, shutdown.subscribe()).await {
        tracing::error!(error = %e, "Server error");
        std::process::exit(1);
    }

    tracing::info!("Shutdown complete");
}
