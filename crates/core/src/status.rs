// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Point-in-time status of the supervised game server.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle state as observed by the supervisor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServerState {
    Running,
    Stopped,
}

impl fmt::Display for ServerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServerState::Running => write!(f, "running"),
            ServerState::Stopped => write!(f, "stopped"),
        }
    }
}

/// Status payload returned to the transport layer.
///
/// `pid` is present only while the process is running and is omitted from
/// the serialized form otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerStatus {
    pub status: ServerState,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pid: Option<u32>,
}

impl ServerStatus {
    pub fn running(pid: u32) -> Self {
        Self {
            status: ServerState::Running,
            message: "Server is running".to_string(),
            pid: Some(pid),
        }
    }

    pub fn stopped() -> Self {
        Self {
            status: ServerState::Stopped,
            message: "Server not running".to_string(),
            pid: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.status == ServerState::Running
    }
}

#[cfg(test)]
#[path = "status_tests.rs"]
mod tests;
