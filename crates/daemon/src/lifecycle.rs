// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Control-plane wiring: construction at boot, teardown at shutdown.
//!
//! Every component is an explicitly constructed, owned instance handed to
//! the transport layer — no module-level singletons. One control plane
//! exists per running daemon, preserving the "one supervisor per server"
//! semantics.

use crate::config::{Config, TomlCredentialStore};
use bw_auth::{AuthGate, RateLimiter};
use bw_core::SystemClock;
use bw_server::{InteractionChannel, LogHub, ProcessSupervisor};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::{info, warn};

/// How often the rate limiter sweeps expired identities.
pub const CLEANUP_INTERVAL: Duration = Duration::from_secs(10 * 60);

/// Auth gate with the daemon's concrete store and clock.
pub type Gate = AuthGate<TomlCredentialStore, SystemClock>;

/// Lifecycle errors
#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error(transparent)]
    Config(#[from] crate::config::ConfigError),

    #[error("config has an empty token signing secret")]
    NoSigningSecret,
}

/// The wired core, owned by the daemon and borrowed by the transport layer.
pub struct ControlPlane {
    pub log_hub: LogHub,
    pub interaction: InteractionChannel,
    pub supervisor: Arc<ProcessSupervisor>,
    pub auth: Gate,
    pub rate_limiter: RateLimiter,
    cleanup_task: JoinHandle<()>,
}

impl ControlPlane {
    /// Construct and wire all core instances from config.
    ///
    /// A configured install dir that does not exist is a warning, not a
    /// failure: operators can activate a server version later, and `start`
    /// reports `NotConfigured` until they do.
    pub async fn startup(config: &Config, config_path: &Path) -> Result<Self, LifecycleError> {
        if config.auth.token_secret.is_empty() {
            return Err(LifecycleError::NoSigningSecret);
        }

        let log_hub = LogHub::new();
        let interaction = InteractionChannel::new();
        let supervisor = Arc::new(ProcessSupervisor::with_executable(
            log_hub.clone(),
            interaction.clone(),
            config.game.executable.clone(),
        ));

        supervisor
            .set_install_dir(validated_install_dir(config.game.install_dir.as_deref()))
            .await;

        let rate_limiter = RateLimiter::new();
        let auth = AuthGate::new(
            config.auth.token_secret.as_bytes(),
            config.auth.password_hash.clone(),
            TomlCredentialStore::new(config_path),
            rate_limiter.clone(),
            SystemClock,
        );

        let cleanup_task = rate_limiter.spawn_cleanup(CLEANUP_INTERVAL);

        info!("control plane wired");
        Ok(Self {
            log_hub,
            interaction,
            supervisor,
            auth,
            rate_limiter,
            cleanup_task,
        })
    }

    /// Tear down: stop a running child, drop log subscribers, and cancel
    /// background housekeeping. Safe to call with nothing running.
    pub async fn shutdown(&self) {
        info!("control plane shutting down");

        if self.supervisor.status().await.is_running() {
            if let Err(err) = self.supervisor.stop().await {
                warn!(error = %err, "failed to stop game server during shutdown");
            }
        }
        self.log_hub.stop_capture();
        self.log_hub.disconnect_all();
        self.cleanup_task.abort();

        info!("control plane stopped");
    }
}

/// Resolve the configured install dir, dropping it with a warning when the
/// directory is missing on disk.
fn validated_install_dir(configured: Option<&Path>) -> Option<PathBuf> {
    let dir = configured?;
    if dir.is_dir() {
        info!(install_dir = %dir.display(), "game server install dir configured");
        Some(dir.to_path_buf())
    } else {
        warn!(
            install_dir = %dir.display(),
            "configured install dir does not exist; activate a server version to enable start"
        );
        None
    }
}

#[cfg(test)]
#[path = "lifecycle_tests.rs"]
mod tests;
