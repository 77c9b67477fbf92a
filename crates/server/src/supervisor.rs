// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Lifecycle supervision of the game-server child process.
//!
//! Exactly one process handle is live at a time. All mutating operations and
//! status reads serialize on one async lock; the lock is held across the
//! kill/wait in `stop`, so `status` observes either the old running state or
//! the fully stopped one, never a half-torn-down process.

use crate::error::SupervisorError;
use crate::interaction::InteractionChannel;
use crate::log_hub::LogHub;
use bw_core::{LogLevel, ServerStatus};
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::{Child, Command};
use tokio::sync::Mutex;

/// Pause between the stop and start halves of a restart, giving the OS time
/// to release sockets and file locks held by the old process.
pub const RESTART_DELAY: Duration = Duration::from_secs(1);

/// Platform-specific name of the game-server executable inside the install
/// directory.
pub fn default_executable_name() -> &'static str {
    if cfg!(windows) {
        "bedrock_server.exe"
    } else {
        "bedrock_server"
    }
}

/// The one live supervised process.
struct ProcessHandle {
    child: Child,
    pid: u32,
    executable: PathBuf,
}

struct SupervisorState {
    install_dir: Option<PathBuf>,
    handle: Option<ProcessHandle>,
}

/// Owns the supervised process: the only component that spawns or kills it.
pub struct ProcessSupervisor {
    state: Mutex<SupervisorState>,
    executable_name: String,
    log_hub: LogHub,
    interaction: InteractionChannel,
}

impl ProcessSupervisor {
    pub fn new(log_hub: LogHub, interaction: InteractionChannel) -> Self {
        Self::with_executable(log_hub, interaction, default_executable_name())
    }

    pub fn with_executable(
        log_hub: LogHub,
        interaction: InteractionChannel,
        executable_name: impl Into<String>,
    ) -> Self {
        Self {
            state: Mutex::new(SupervisorState {
                install_dir: None,
                handle: None,
            }),
            executable_name: executable_name.into(),
            log_hub,
            interaction,
        }
    }

    /// Set or clear the install directory the executable is launched from.
    /// Operators activate a server version at runtime; until then `start`
    /// fails with `NotConfigured`.
    pub async fn set_install_dir(&self, dir: Option<PathBuf>) {
        let mut state = self.state.lock().await;
        state.install_dir = dir;
    }

    pub async fn install_dir(&self) -> Option<PathBuf> {
        self.state.lock().await.install_dir.clone()
    }

    /// Spawn the game server and wire its pipes.
    ///
    /// Output streams go to the log hub's capture readers; the input stream
    /// is bound to the interaction channel on platforms where forwarding is
    /// enabled.
    pub async fn start(&self) -> Result<ServerStatus, SupervisorError> {
        let mut state = self.state.lock().await;

        if let Some(handle) = state.handle.as_mut() {
            // A handle whose process exited on its own is stale, not running.
            match handle.child.try_wait() {
                Ok(None) => return Err(SupervisorError::AlreadyRunning),
                Ok(Some(_)) | Err(_) => state.handle = None,
            }
        }

        let install_dir = state
            .install_dir
            .clone()
            .ok_or(SupervisorError::NotConfigured)?;
        let executable = install_dir.join(&self.executable_name);
        if !executable.is_file() {
            return Err(SupervisorError::ExecutableMissing { path: executable });
        }

        let mut command = Command::new(&executable);
        command
            .current_dir(&install_dir)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        if self.interaction.is_enabled() {
            command.stdin(Stdio::piped());
        } else {
            command.stdin(Stdio::null());
        }

        let mut child = command.spawn().map_err(SupervisorError::Spawn)?;

        let (Some(stdout), Some(stderr)) = (child.stdout.take(), child.stderr.take()) else {
            let _ = child.start_kill();
            return Err(SupervisorError::Spawn(std::io::Error::other(
                "output pipes unavailable",
            )));
        };
        self.log_hub.start_capture(stdout, stderr);

        if self.interaction.is_enabled() {
            if let Some(stdin) = child.stdin.take() {
                self.interaction.bind(stdin).await;
            }
            self.log_hub
                .append(LogLevel::Info, "Server interaction enabled");
        }

        let pid = child.id().unwrap_or(0);
        state.handle = Some(ProcessHandle {
            child,
            pid,
            executable: executable.clone(),
        });

        self.log_hub
            .append(LogLevel::Info, "Server started successfully");
        tracing::info!(pid, install_dir = %install_dir.display(), "game server started");

        Ok(ServerStatus::running(pid))
    }

    /// Terminate the supervised process and tear down the wiring.
    ///
    /// Capture readers are signaled first; killing the process then closes
    /// its pipes, which unblocks any reader still parked on a pending line.
    pub async fn stop(&self) -> Result<(), SupervisorError> {
        let mut state = self.state.lock().await;

        let Some(handle) = state.handle.as_mut() else {
            return Err(SupervisorError::NotRunning);
        };

        self.log_hub.append(LogLevel::Info, "Stopping server...");
        self.log_hub.stop_capture();
        self.interaction.close().await;

        let pid = handle.pid;
        let executable = handle.executable.clone();
        // kill() delivers the signal and reaps the exit status.
        handle.child.kill().await.map_err(SupervisorError::Kill)?;
        state.handle = None;

        self.log_hub.append(LogLevel::Info, "Server stopped");
        tracing::info!(pid, executable = %executable.display(), "game server stopped");
        Ok(())
    }

    /// Stop (best-effort) then start again after a short delay.
    ///
    /// A failed stop — typically `NotRunning` — is logged and not
    /// propagated, so a restart from the stopped state still succeeds.
    pub async fn restart(&self) -> Result<ServerStatus, SupervisorError> {
        if let Err(err) = self.stop().await {
            self.log_hub.append(
                LogLevel::Warn,
                format!("Failed to stop server gracefully: {}", err),
            );
            tracing::warn!(error = %err, "best-effort stop before restart failed");
        }

        tokio::time::sleep(RESTART_DELAY).await;
        self.start().await
    }

    /// Point-in-time status. Probes liveness without blocking; a process
    /// that exited on its own transitions the supervisor to stopped here.
    pub async fn status(&self) -> ServerStatus {
        let mut state = self.state.lock().await;
        let Some(handle) = state.handle.as_mut() else {
            return ServerStatus::stopped();
        };

        match handle.child.try_wait() {
            Ok(None) => ServerStatus::running(handle.pid),
            Ok(Some(exit)) => {
                tracing::info!(pid = handle.pid, %exit, "game server exited on its own");
                state.handle = None;
                ServerStatus::stopped()
            }
            Err(err) => {
                tracing::warn!(error = %err, "liveness probe failed, treating as stopped");
                state.handle = None;
                ServerStatus::stopped()
            }
        }
    }
}

#[cfg(all(test, unix))]
#[path = "supervisor_tests.rs"]
mod tests;
