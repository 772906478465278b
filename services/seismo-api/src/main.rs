//! Seismogram API Server
//!
//! Serves synthetic seismograms from a precomputed database over HTTP.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

use seismo_api::config::ServiceConfig;
use seismo_api::state::AppState;

/// Seismogram API Server
#[derive(Parser, Debug)]
#[command(name = "seismo-api")]
#[command(about = "HTTP server for synthetic seismograms from a precomputed database")]
struct Args {
    /// Root directory of the database
    #[arg(env = "SEISMO_DATABASE")]
    database: String,

    /// Listen address
    #[arg(short, long, default_value = "0.0.0.0:8765", env = "SEISMO_LISTEN_ADDR")]
    listen: String,

    /// Path of the YAML service config
    #[arg(short, long, default_value = "config/seismo.yaml", env = "SEISMO_CONFIG")]
    config: String,

    /// Log level
    #[arg(long, default_value = "info", env = "RUST_LOG")]
    log_level: String,

    /// Number of worker threads
    #[arg(long, env = "SEISMO_WORKER_THREADS")]
    worker_threads: Option<usize>,
}

fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();

    // Build runtime with configured threads
    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();

    if let Some(threads) = args.worker_threads {
        runtime_builder.worker_threads(threads);
    }

    let runtime = runtime_builder
        .build()
        .context("Failed to create Tokio runtime")?;

    runtime.block_on(run_server(args))
}

async fn run_server(args: Args) -> Result<()> {
    // Initialize tracing
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_level(true)
        .json()
        .init();

    let prometheus = metrics_exporter_prometheus::PrometheusBuilder::new()
        .install_recorder()
        .context("Failed to install Prometheus recorder")?;

    info!(database = %args.database, "Starting seismogram API server");

    let config = ServiceConfig::load(&args.config)?;

    // A database that cannot be opened is fatal
    let state = match AppState::open(&args.database, config) {
        Ok(state) => Arc::new(state),
        Err(e) => {
            error!("Failed to open database: {:#}", e);
            std::process::exit(1);
        }
    };

    let app = seismo_api::router(state, prometheus);

    let addr: SocketAddr = args
        .listen
        .parse()
        .with_context(|| format!("Invalid listen address: {}", args.listen))?;

    info!("Seismogram API listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, app).await.context("Server failed")?;

    Ok(())
}
