// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory console log buffer with live fan-out.
//!
//! Two concurrent reader tasks (one per output stream of the supervised
//! process) feed captured lines into a bounded ring buffer and push each new
//! entry to every live subscriber. Delivery to a given subscriber preserves
//! production order; no total order exists across the stdout and stderr
//! readers.

use bw_core::{LogEntry, LogLevel};
use chrono::Utc;
use parking_lot::Mutex;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::sync::{mpsc, oneshot};

/// Ring-buffer capacity: the most recent entries kept for late subscribers.
pub const DEFAULT_CAPACITY: usize = 1000;

/// Entries included in the snapshot handed to a new subscriber.
pub const SNAPSHOT_LIMIT: usize = 100;

/// Per-subscriber channel depth. A subscriber that falls this far behind is
/// treated as failed and removed rather than stalling delivery to others.
const SUBSCRIBER_BUFFER: usize = 256;

/// Live log feed for one subscriber.
///
/// Dropping the subscription closes its channel; the next push notices and
/// removes the registration.
pub struct Subscription {
    id: u64,
    receiver: mpsc::Receiver<LogEntry>,
}

impl Subscription {
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Next pushed entry, or `None` once unsubscribed.
    pub async fn recv(&mut self) -> Option<LogEntry> {
        self.receiver.recv().await
    }
}

struct CaptureGuard {
    stop_stdout: oneshot::Sender<()>,
    stop_stderr: oneshot::Sender<()>,
}

struct HubInner {
    capacity: usize,
    buffer: Mutex<VecDeque<LogEntry>>,
    subscribers: Mutex<HashMap<u64, mpsc::Sender<LogEntry>>>,
    next_subscriber_id: AtomicU64,
    capture: Mutex<Option<CaptureGuard>>,
}

/// Clone-shareable handle to the log buffer and subscriber set.
#[derive(Clone)]
pub struct LogHub {
    inner: Arc<HubInner>,
}

impl Default for LogHub {
    fn default() -> Self {
        Self::new()
    }
}

impl LogHub {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            inner: Arc::new(HubInner {
                capacity,
                buffer: Mutex::new(VecDeque::with_capacity(capacity.min(DEFAULT_CAPACITY))),
                subscribers: Mutex::new(HashMap::new()),
                next_subscriber_id: AtomicU64::new(0),
                capture: Mutex::new(None),
            }),
        }
    }

    /// Append an entry and push it to every live subscriber.
    ///
    /// Capture readers call this for each line; the supervisor also appends
    /// its own lifecycle entries here. Buffer insert and fan-out happen
    /// under the buffer lock so a concurrent `subscribe` sees each entry in
    /// either its snapshot or its feed, never both.
    pub fn append(&self, level: LogLevel, message: impl Into<String>) {
        let entry = LogEntry::new(level, message, Utc::now());
        let mut buffer = self.inner.buffer.lock();
        if buffer.len() == self.inner.capacity {
            buffer.pop_front();
        }
        buffer.push_back(entry.clone());
        self.broadcast(entry);
    }

    fn broadcast(&self, entry: LogEntry) {
        let mut subscribers = self.inner.subscribers.lock();
        subscribers.retain(|id, tx| match tx.try_send(entry.clone()) {
            Ok(()) => true,
            Err(err) => {
                tracing::debug!(subscriber = id, error = %err, "removing log subscriber");
                false
            }
        });
    }

    /// Register a subscriber, returning a snapshot of the most recent
    /// entries (up to [`SNAPSHOT_LIMIT`]) together with the live feed.
    ///
    /// Snapshot and registration happen under the buffer lock, so no entry
    /// is lost or duplicated between the two.
    pub fn subscribe(&self) -> (Vec<LogEntry>, Subscription) {
        let buffer = self.inner.buffer.lock();
        let skip = buffer.len().saturating_sub(SNAPSHOT_LIMIT);
        let snapshot: Vec<LogEntry> = buffer.iter().skip(skip).cloned().collect();

        let id = self.inner.next_subscriber_id.fetch_add(1, Ordering::Relaxed);
        let (tx, receiver) = mpsc::channel(SUBSCRIBER_BUFFER);
        self.inner.subscribers.lock().insert(id, tx);
        drop(buffer);

        tracing::debug!(subscriber = id, "log subscriber registered");
        (snapshot, Subscription { id, receiver })
    }

    /// Remove a subscriber. Failed pushes remove subscribers on their own;
    /// this is for orderly disconnects.
    pub fn unsubscribe(&self, id: u64) {
        if self.inner.subscribers.lock().remove(&id).is_some() {
            tracing::debug!(subscriber = id, "log subscriber removed");
        }
    }

    /// Drop every subscriber (teardown).
    pub fn disconnect_all(&self) {
        self.inner.subscribers.lock().clear();
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.subscribers.lock().len()
    }

    /// The most recent `limit` entries in production order; `0` means all
    /// buffered entries.
    pub fn recent(&self, limit: usize) -> Vec<LogEntry> {
        let buffer = self.inner.buffer.lock();
        let skip = if limit == 0 {
            0
        } else {
            buffer.len().saturating_sub(limit)
        };
        buffer.iter().skip(skip).cloned().collect()
    }

    /// Clear the buffer. Subscribers stay registered.
    pub fn clear(&self) {
        self.inner.buffer.lock().clear();
    }

    /// Begin capturing from a process's output streams.
    ///
    /// Any capture already active is stopped first, so re-entry (a restart)
    /// never leaks reader tasks. One reader task is spawned per stream:
    /// stdout lines become INFO entries, stderr lines ERROR entries.
    pub fn start_capture<O, E>(&self, stdout: O, stderr: E)
    where
        O: AsyncRead + Send + Unpin + 'static,
        E: AsyncRead + Send + Unpin + 'static,
    {
        self.stop_capture();

        let (stop_stdout, stdout_rx) = oneshot::channel();
        let (stop_stderr, stderr_rx) = oneshot::channel();
        *self.inner.capture.lock() = Some(CaptureGuard {
            stop_stdout,
            stop_stderr,
        });

        tokio::spawn(capture_stream(
            self.clone(),
            stdout,
            LogLevel::Info,
            stdout_rx,
        ));
        tokio::spawn(capture_stream(
            self.clone(),
            stderr,
            LogLevel::Error,
            stderr_rx,
        ));
    }

    /// Signal both reader tasks to terminate.
    ///
    /// Returns once signaled, without waiting for task exit. A reader parked
    /// on a read that never completes is unblocked when the supervisor kills
    /// the process and its pipes close. No-op when not capturing.
    pub fn stop_capture(&self) {
        if let Some(guard) = self.inner.capture.lock().take() {
            let _ = guard.stop_stdout.send(());
            let _ = guard.stop_stderr.send(());
        }
    }

    /// Whether a capture session is currently registered.
    pub fn is_capturing(&self) -> bool {
        self.inner.capture.lock().is_some()
    }
}

/// Read lines from one output stream until EOF, read error, or stop signal.
async fn capture_stream<R>(
    hub: LogHub,
    stream: R,
    level: LogLevel,
    mut stop_rx: oneshot::Receiver<()>,
) where
    R: AsyncRead + Send + Unpin + 'static,
{
    let mut lines = BufReader::new(stream).lines();
    loop {
        tokio::select! {
            _ = &mut stop_rx => {
                tracing::debug!(%level, "capture reader stopped");
                break;
            }
            line = lines.next_line() => match line {
                Ok(Some(line)) => {
                    if !line.is_empty() {
                        hub.append(level, line);
                    }
                }
                Ok(None) => {
                    tracing::debug!(%level, "capture stream closed");
                    break;
                }
                Err(err) => {
                    hub.append(LogLevel::Error, format!("Log capture error: {}", err));
                    break;
                }
            },
        }
    }
}

#[cfg(test)]
#[path = "log_hub_tests.rs"]
mod tests;
