// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for process supervision and command interaction

use std::path::PathBuf;
use thiserror::Error;

/// Process-lifecycle errors returned by the supervisor.
#[derive(Debug, Error)]
pub enum SupervisorError {
    #[error("server is already running")]
    AlreadyRunning,

    #[error("server not running")]
    NotRunning,

    #[error("no server install directory is configured; download and activate a server version first")]
    NotConfigured,

    #[error("server executable not found at {path}; ensure the server version is properly installed")]
    ExecutableMissing { path: PathBuf },

    #[error("failed to spawn server process: {0}")]
    Spawn(std::io::Error),

    #[error("failed to stop server process: {0}")]
    Kill(std::io::Error),
}

/// Command-interaction errors: the validation taxonomy plus delivery
/// failures. Rejections name the violated rule so an operator can correct
/// the input without guessing.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("server interaction is not supported on this platform")]
    Disabled,

    #[error("server is not running or its input stream is unavailable")]
    NotBound,

    #[error("command cannot be empty")]
    Empty,

    #[error("command too long ({len} characters, max {max})")]
    TooLong { len: usize, max: usize },

    #[error("command '{command}' is not allowed through the control plane")]
    Forbidden { command: String },

    #[error("command contains forbidden character '{ch}'")]
    InjectionRisk { ch: char },

    #[error("failed to send command: {0}")]
    Write(std::io::Error),
}
