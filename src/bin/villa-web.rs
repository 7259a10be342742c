//! Villa Showcase admin API server
//!
//! Serves the REST API used by the gallery admin panel together with the
//! uploaded media files.
//!
//! # Usage
//!
//! ```bash
//! # Start with default settings (host and port from config.toml)
//! villa-web
//!
//! # Specify port and data directory
//! villa-web --port 8080 --data-dir ~/villa-data
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use villa_showcase::config::Config;
use villa_showcase::web;

/// Villa Showcase Web Server - REST API for the gallery admin panel
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Port to listen on (overrides [server].port)
    #[arg(short, long)]
    port: Option<u16>,

    /// Host to bind to (overrides [server].host)
    #[arg(long)]
    host: Option<String>,

    /// Data directory holding records, media and the admin session.
    /// Defaults to [storage].data_dir, then `data/` in the config directory:
    /// - Linux: ~/.config/VillaShowcase/data/
    /// - macOS: ~/Library/Application Support/VillaShowcase/data/
    /// - Windows: %APPDATA%\VillaShowcase\data\
    #[arg(short, long)]
    data_dir: Option<PathBuf>,

    /// Config file (defaults to the platform config directory)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize tracing
    let filter = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = match &args.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
    .context("Failed to load configuration")?;

    let data_dir = match args.data_dir {
        Some(path) => path,
        None => config.data_dir()?,
    };
    info!("Data directory: {}", data_dir.display());

    let host = args.host.unwrap_or_else(|| config.server.host.clone());
    let port = args.port.unwrap_or(config.server.port);
    let addr: SocketAddr = format!("{host}:{port}")
        .parse()
        .with_context(|| format!("Invalid listen address: {host}:{port}"))?;

    web::run_server(config, &data_dir, addr).await
}
