use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::info;

use livestat_registry::{config::DEFAULT_LISTEN_ADDR, ServerConfig, StatusServer};

/// Livestat - minimal live-status board server
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Master token required by mutating requests
    #[arg(long, env = "MASTER_TOKEN", hide_env_values = true)]
    token: String,

    /// Snapshot file path; omit to disable persistence
    #[arg(long, env = "LIVESTAT_SNAPSHOT", value_name = "FILE")]
    snapshot: Option<PathBuf>,

    /// Address to listen on
    #[arg(long, env = "LIVESTAT_LISTEN", default_value = DEFAULT_LISTEN_ADDR)]
    listen: String,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    initialize_logging(args.debug);

    info!("Starting livestat server");
    if args.snapshot.is_none() {
        info!("No snapshot path configured, persistence disabled");
    }

    let mut config = ServerConfig::new(args.token).with_listen_addr(args.listen);
    if let Some(path) = args.snapshot {
        config = config.with_snapshot_path(path);
    }

    let server = StatusServer::new(config).await;

    tokio::select! {
        result = server.run() => {
            result.map_err(|e| anyhow::anyhow!("Server failed: {}", e))?;
        }
        _ = shutdown_signal() => {
            info!("Shutting down");
        }
    }

    Ok(())
}

fn initialize_logging(debug: bool) {
    let level = if debug { "debug" } else { "info" };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level)),
        )
        .with_target(false)
        .init();
}

async fn shutdown_signal() {
    use tokio::signal;

    #[cfg(unix)]
    {
        let mut sigterm = signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to create SIGTERM handler");
        let mut sigint = signal::unix::signal(signal::unix::SignalKind::interrupt())
            .expect("Failed to create SIGINT handler");

        tokio::select! {
            _ = sigterm.recv() => {
                info!("Received SIGTERM signal");
            }
            _ = sigint.recv() => {
                info!("Received SIGINT signal");
            }
        }
    }

    #[cfg(windows)]
    {
        let _ = signal::ctrl_c().await;
        info!("Received Ctrl+C signal");
    }
}
