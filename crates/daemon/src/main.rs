// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Blockwatch Daemon (bwd)
//!
//! Boots the control plane — supervisor, log hub, interaction channel, auth
//! gate — and holds it until shutdown. The HTTP transport layer mounts on
//! top of the wired [`ControlPlane`]; it is not part of this repository.

use bw_daemon::{Config, ControlPlane};
use std::path::PathBuf;
use tracing::{error, info};

/// Default config location, overridable with BW_CONFIG.
const DEFAULT_CONFIG_PATH: &str = "config/blockwatch.toml";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    if let Some(arg) = std::env::args().nth(1) {
        match arg.as_str() {
            "--version" | "-V" | "-v" => {
                println!("bwd {}", env!("CARGO_PKG_VERSION"));
                return Ok(());
            }
            "--help" | "-h" | "help" => {
                println!("bwd {}", env!("CARGO_PKG_VERSION"));
                println!("Blockwatch Daemon - supervises the game server for the web control plane");
                println!();
                println!("USAGE:");
                println!("    bwd");
                println!();
                println!("Reads its config from config/blockwatch.toml (override with");
                println!("BW_CONFIG). A missing config file is created with defaults on");
                println!("first boot.");
                println!();
                println!("OPTIONS:");
                println!("    -h, --help       Print help information");
                println!("    -v, --version    Print version information");
                return Ok(());
            }
            _ => {
                eprintln!("error: unexpected argument '{arg}'");
                eprintln!("Usage: bwd [--help | --version]");
                std::process::exit(1);
            }
        }
    }

    let config_path = std::env::var("BW_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH));
    let config = Config::load_or_init(&config_path)?;

    setup_logging(&config.logging.filter);
    info!(config = %config_path.display(), "starting blockwatch daemon");

    let control_plane = match ControlPlane::startup(&config, &config_path).await {
        Ok(cp) => cp,
        Err(e) => {
            error!("failed to start control plane: {}", e);
            return Err(e.into());
        }
    };

    info!(
        host = %config.server.host,
        port = config.server.port,
        "control plane ready for transport wiring"
    );
    println!("READY");

    wait_for_shutdown().await;

    control_plane.shutdown().await;
    info!("daemon stopped");
    Ok(())
}

/// Block until SIGINT or (on Unix) SIGTERM.
#[cfg(unix)]
async fn wait_for_shutdown() {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sigterm = match signal(SignalKind::terminate()) {
        Ok(s) => s,
        Err(e) => {
            error!("failed to install SIGTERM handler: {}", e);
            let _ = tokio::signal::ctrl_c().await;
            return;
        }
    };

    tokio::select! {
        _ = tokio::signal::ctrl_c() => info!("received SIGINT, shutting down..."),
        _ = sigterm.recv() => info!("received SIGTERM, shutting down..."),
    }
}

#[cfg(not(unix))]
async fn wait_for_shutdown() {
    let _ = tokio::signal::ctrl_c().await;
    info!("received interrupt, shutting down...");
}

fn setup_logging(filter: &str) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer())
        .init();
}
