//! `armada` – serves a robot fleet over HTTP.
//!
//! 1. Loads `~/.armada/config.toml` (or `--config <path>`), applies `ARMADA_*`
//!    environment overrides, then command-line flags.
//! 2. Builds the demo fleet and starts it (connections, then devices).
//! 3. Serves the fleet API until **Ctrl-C**, then stops the server and halts
//!    the fleet.

mod config;
mod fleet;

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use armada_api::ApiServer;
use armada_types::ArmadaError;
use clap::Parser;
use tracing::{error, info, warn};

#[derive(Debug, Parser)]
#[command(name = "armada", version, about = "Serve a robot fleet over HTTP")]
struct Cli {
    /// Configuration file (defaults to `~/.armada/config.toml`).
    #[arg(long)]
    config: Option<PathBuf>,
    /// Bind address, overriding the configuration.
    #[arg(long)]
    host: Option<String>,
    /// Bind port, overriding the configuration.
    #[arg(long, short)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> ExitCode {
    // ── Structured logging ────────────────────────────────────────────────
    // RUST_LOG selects the filter (default "info"); ARMADA_LOG_FORMAT=json
    // switches to newline-delimited JSON.
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    if std::env::var("ARMADA_LOG_FORMAT").as_deref() == Ok("json") {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(true)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(true)
            .compact()
            .init();
    }

    match run(Cli::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "armada exited with an error");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), ArmadaError> {
    // ── Configuration ─────────────────────────────────────────────────────
    let path = cli.config.unwrap_or_else(config::config_path);
    let mut cfg = config::resolve(&path)?;
    if let Some(host) = cli.host {
        cfg.api.host = host;
    }
    if let Some(port) = cli.port {
        cfg.api.port = port;
    }
    info!(path = %path.display(), config = ?cfg.api, "configuration resolved");

    // ── Fleet ─────────────────────────────────────────────────────────────
    let master = Arc::new(fleet::demo());
    if let Err(e) = master.start() {
        warn!(error = %e, "fleet started with errors");
    }

    // ── API server ────────────────────────────────────────────────────────
    let handle = match ApiServer::new(Arc::clone(&master), cfg.api).start().await {
        Ok(handle) => handle,
        Err(e) => {
            if let Err(halt) = master.halt() {
                warn!(error = %halt, "fleet halted with errors");
            }
            return Err(e);
        }
    };

    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for Ctrl-C; shutting down");
    }
    info!("Ctrl-C received; initiating graceful shutdown");

    handle.stop().await;
    master.halt()
}
