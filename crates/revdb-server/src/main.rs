//! revdb-server - REST API server binary.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use revdb_core::{Compactor, VersionedStore};
use revdb_server::{create_server, AppState, ServerConfig};
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "revdb-server")]
#[command(about = "Versioned application record store over YAML-over-HTTP")]
struct Args {
    #[command(subcommand)]
    command: Option<Command>,

    /// Port to listen on
    #[arg(short, long)]
    port: Option<u16>,

    /// Address to bind
    #[arg(long)]
    host: Option<String>,

    /// Config file (.toml, .json, .yaml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable verbose debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the server version
    Version,
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

/// First signal starts a graceful shutdown; a second one exits immediately.
async fn watch_signals(shutdown: CancellationToken) {
    shutdown_signal().await;
    info!("Shutdown signal received, draining requests and stopping compaction");
    shutdown.cancel();

    shutdown_signal().await;
    warn!("Second shutdown signal received, exiting immediately");
    std::process::exit(1);
}

fn load_config(args: &Args) -> Result<ServerConfig> {
    let config = match &args.config {
        Some(path) => ServerConfig::from_file(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => ServerConfig::default(),
    };
    let mut config = config.merge_env()?;

    if let Some(port) = args.port {
        config.port = port;
    }
    if let Some(host) = &args.host {
        config.host = host.clone();
    }
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    if let Some(Command::Version) = args.command {
        println!("v{}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing
    let default_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .init();

    let config = load_config(&args)?;

    let store = Arc::new(VersionedStore::new());
    let shutdown = CancellationToken::new();
    tokio::spawn(watch_signals(shutdown.clone()));

    let compactor = Compactor::spawn(store.clone(), config.compaction, shutdown.clone());

    let state = AppState::new(store, config.rate_limiter());
    let app = create_server(state);

    let (host, port) = config.bind_addr();
    let listener = tokio::net::TcpListener::bind((host, port))
        .await
        .with_context(|| format!("failed to bind {}:{}", host, port))?;
    let addr = listener.local_addr()?;
    info!(
        %addr,
        rate_per_second = config.rate_per_second,
        burst = config.burst,
        "Starting revdb-server"
    );

    // Serve with graceful shutdown
    let server_shutdown = shutdown.clone();
    axum::serve(listener, app)
        .with_graceful_shutdown(async move { server_shutdown.cancelled().await })
        .await?;

    // covers the server exiting on its own as well as a signal
    shutdown.cancel();
    compactor.shutdown().await;

    info!("Server stopped cleanly");
    Ok(())
}
