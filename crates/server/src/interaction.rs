// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Operator command forwarding into the supervised process's input stream.
//!
//! Sends are fire-and-forget: the game server never correlates console
//! replies to individual commands, so every accepted write is recorded with
//! a static acknowledgement rather than a captured response.

use crate::error::CommandError;
use crate::validate::validate_command;
use bw_core::CommandRecord;
use chrono::Utc;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::io::{AsyncWrite, AsyncWriteExt};

/// Retained command-history depth.
pub const HISTORY_CAPACITY: usize = 100;

/// Static acknowledgement recorded for every accepted send.
const ACKNOWLEDGEMENT: &str = "Command sent";

type BoxedWriter = Box<dyn AsyncWrite + Send + Unpin>;

struct ChannelInner {
    enabled: bool,
    stdin: tokio::sync::Mutex<Option<BoxedWriter>>,
    history: Mutex<VecDeque<CommandRecord>>,
}

/// Clone-shareable owner of the write-end of the child's input stream.
#[derive(Clone)]
pub struct InteractionChannel {
    inner: Arc<ChannelInner>,
}

impl Default for InteractionChannel {
    fn default() -> Self {
        Self::new()
    }
}

impl InteractionChannel {
    /// Stdin forwarding is disabled on Windows, where the game server's
    /// input-stream handling is unstable.
    pub fn new() -> Self {
        Self::with_enabled(!cfg!(windows))
    }

    pub fn with_enabled(enabled: bool) -> Self {
        Self {
            inner: Arc::new(ChannelInner {
                enabled,
                stdin: tokio::sync::Mutex::new(None),
                history: Mutex::new(VecDeque::new()),
            }),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.inner.enabled
    }

    /// Bind the active input stream. The supervisor calls this with the
    /// freshly spawned child's stdin.
    pub async fn bind(&self, writer: impl AsyncWrite + Send + Unpin + 'static) {
        let mut stdin = self.inner.stdin.lock().await;
        *stdin = Some(Box::new(writer));
    }

    /// Release the bound stream, shutting it down best-effort. Tolerates
    /// being called with nothing bound.
    pub async fn close(&self) {
        let mut stdin = self.inner.stdin.lock().await;
        if let Some(mut writer) = stdin.take() {
            if let Err(err) = writer.shutdown().await {
                tracing::debug!(error = %err, "input stream shutdown failed");
            }
        }
    }

    pub async fn is_bound(&self) -> bool {
        self.inner.stdin.lock().await.is_some()
    }

    /// Validate a command and write it (plus a line terminator) to the bound
    /// input stream, recording the send in history.
    pub async fn send_command(&self, command: &str) -> Result<CommandRecord, CommandError> {
        if !self.inner.enabled {
            return Err(CommandError::Disabled);
        }
        validate_command(command)?;

        let mut stdin = self.inner.stdin.lock().await;
        let writer = stdin.as_mut().ok_or(CommandError::NotBound)?;
        writer
            .write_all(format!("{}\n", command).as_bytes())
            .await
            .map_err(CommandError::Write)?;
        writer.flush().await.map_err(CommandError::Write)?;
        drop(stdin);

        let record = CommandRecord {
            command: command.to_string(),
            response: ACKNOWLEDGEMENT.to_string(),
            timestamp: Utc::now(),
            success: true,
        };
        self.push_history(record.clone());

        tracing::info!(command, "command forwarded to game server");
        Ok(record)
    }

    fn push_history(&self, record: CommandRecord) {
        let mut history = self.inner.history.lock();
        if history.len() == HISTORY_CAPACITY {
            history.pop_front();
        }
        history.push_back(record);
    }

    /// The most recent `limit` records in send order; `0` means all.
    pub fn history(&self, limit: usize) -> Vec<CommandRecord> {
        let history = self.inner.history.lock();
        let skip = if limit == 0 {
            0
        } else {
            history.len().saturating_sub(limit)
        };
        history.iter().skip(skip).cloned().collect()
    }

    pub fn clear_history(&self) {
        self.inner.history.lock().clear();
    }
}

#[cfg(test)]
#[path = "interaction_tests.rs"]
mod tests;
