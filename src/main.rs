//! In-memory video CRUD API server.
//!
//! # Architecture Overview
//!
//! ```text
//!   Client ──▶ http server ──┬──▶ /hometask_01/api  (basic)  ──▶ store v1
//!                            ├──▶ /hometask_02/api  (typed)  ──▶ store v2
//!                            └──▶ /hometask_03/api  (strict) ──▶ store v3
//!
//!   Cross-cutting: config · observability · security · lifecycle
//! ```

use clap::Parser;
use std::path::PathBuf;
use tokio::net::TcpListener;

use video_api::lifecycle::{signals::shutdown_signal, startup::resolve_config, Shutdown};
use video_api::observability::{logging, metrics};
use video_api::HttpServer;

#[derive(Parser)]
#[command(name = "video-api")]
#[command(about = "In-memory video CRUD API", long_about = None)]
struct Args {
    /// Path to a TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let port = std::env::var("PORT").ok();
    let config = resolve_config(args.config.as_deref(), port.as_deref())?;

    logging::init_logging(&config.observability.log_level);
    tracing::info!("video-api v{} starting", env!("CARGO_PKG_VERSION"));

    tracing::info!(
        bind_address = %config.listener.bind_address,
        versions = config.versions.len(),
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        // Address already checked by config validation.
        if let Ok(addr) = config.observability.metrics_address.parse() {
            metrics::init_metrics(addr);
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Server running");

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        shutdown_signal().await;
        shutdown.trigger();
    });

    HttpServer::new(config).run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
