// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Sliding-window login rate limiting.
//!
//! Failed attempts accumulate per caller identity (the transport passes the
//! client IP) within a rolling window; hitting the threshold blocks the
//! identity for a fixed duration. A successful login clears all state for
//! the identity, including an active block.

use bw_core::{Clock, SystemClock};
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

/// Tuning knobs for the limiter.
#[derive(Debug, Clone, Copy)]
pub struct RateLimiterConfig {
    /// Failed attempts before blocking.
    pub max_attempts: u32,
    /// Rolling span during which failures accumulate.
    pub window: Duration,
    /// How long an identity stays blocked after hitting the threshold.
    pub block: Duration,
}

impl Default for RateLimiterConfig {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            window: Duration::from_secs(5 * 60),
            block: Duration::from_secs(5 * 60),
        }
    }
}

#[derive(Debug, Clone)]
struct AttemptState {
    count: u32,
    last_attempt: DateTime<Utc>,
    blocked_until: Option<DateTime<Utc>>,
}

/// Clone-shareable failed-attempt tracker.
#[derive(Clone)]
pub struct RateLimiter<C: Clock + Clone = SystemClock> {
    attempts: Arc<Mutex<HashMap<String, AttemptState>>>,
    config: RateLimiterConfig,
    clock: C,
}

impl RateLimiter<SystemClock> {
    pub fn new() -> Self {
        Self::with_clock(RateLimiterConfig::default(), SystemClock)
    }
}

impl Default for RateLimiter<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock + Clone> RateLimiter<C> {
    pub fn with_clock(config: RateLimiterConfig, clock: C) -> Self {
        Self {
            attempts: Arc::new(Mutex::new(HashMap::new())),
            config,
            clock,
        }
    }

    /// True while the identity has hit the threshold and its block has not
    /// yet lapsed.
    pub fn is_blocked(&self, identity: &str) -> bool {
        let attempts = self.attempts.lock();
        let Some(state) = attempts.get(identity) else {
            return false;
        };
        match state.blocked_until {
            Some(until) => self.clock.now() < until && state.count >= self.config.max_attempts,
            None => false,
        }
    }

    /// Record a failed attempt, resetting the counter first if the window
    /// has lapsed since the previous one. Reaching the threshold sets the
    /// block-until timestamp.
    pub fn record_failed_attempt(&self, identity: &str) {
        let now = self.clock.now();
        let window = chrono_window(self.config.window);
        let mut attempts = self.attempts.lock();

        let state = attempts.entry(identity.to_string()).or_insert(AttemptState {
            count: 0,
            last_attempt: now,
            blocked_until: None,
        });

        if state.count > 0 && now - state.last_attempt > window {
            // New window: the stale block is cleared before the count resets.
            state.blocked_until = None;
            state.count = 0;
        }

        state.count += 1;
        state.last_attempt = now;

        if state.count >= self.config.max_attempts {
            state.blocked_until = Some(now + chrono_window(self.config.block));
            tracing::warn!(identity, count = state.count, "login identity blocked");
        }
    }

    /// Clear all state for the identity, including any active block.
    pub fn record_successful_attempt(&self, identity: &str) {
        self.attempts.lock().remove(identity);
    }

    /// Attempts left before the identity is blocked.
    pub fn remaining_attempts(&self, identity: &str) -> u32 {
        let now = self.clock.now();
        let attempts = self.attempts.lock();
        let Some(state) = attempts.get(identity) else {
            return self.config.max_attempts;
        };

        let window_lapsed = now - state.last_attempt > chrono_window(self.config.window);
        let block_lapsed = state.blocked_until.is_none_or(|until| now >= until);
        if window_lapsed && block_lapsed {
            return self.config.max_attempts;
        }

        self.config.max_attempts.saturating_sub(state.count)
    }

    /// Time left on an active block, or zero.
    pub fn block_time_remaining(&self, identity: &str) -> Duration {
        let now = self.clock.now();
        let attempts = self.attempts.lock();
        attempts
            .get(identity)
            .and_then(|state| state.blocked_until)
            .filter(|until| *until > now)
            .and_then(|until| (until - now).to_std().ok())
            .unwrap_or(Duration::ZERO)
    }

    /// Drop identities whose window and block have both lapsed. Returns the
    /// number removed.
    pub fn cleanup_expired(&self) -> usize {
        let now = self.clock.now();
        let window = chrono_window(self.config.window);
        let mut attempts = self.attempts.lock();
        let before = attempts.len();
        attempts.retain(|_, state| {
            let window_active = now - state.last_attempt <= window;
            let block_active = state.blocked_until.is_some_and(|until| now < until);
            window_active || block_active
        });
        before - attempts.len()
    }

    /// Number of tracked identities (diagnostics and tests).
    pub fn tracked_identities(&self) -> usize {
        self.attempts.lock().len()
    }

    /// Spawn the periodic cleanup sweep.
    ///
    /// Runs independently of request traffic so the attempts map stays
    /// bounded even under sustained distinct-identity attack traffic. Abort
    /// the returned handle at shutdown.
    pub fn spawn_cleanup(&self, every: Duration) -> tokio::task::JoinHandle<()> {
        let limiter = self.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every);
            // First tick completes immediately; skip it so the first sweep
            // happens one full interval after startup.
            ticker.tick().await;
            loop {
                ticker.tick().await;
                let removed = limiter.cleanup_expired();
                if removed > 0 {
                    tracing::debug!(removed, "rate limiter sweep removed expired identities");
                }
            }
        })
    }
}

fn chrono_window(d: Duration) -> chrono::Duration {
    chrono::Duration::from_std(d).unwrap_or_else(|_| chrono::Duration::seconds(i64::MAX / 2))
}

#[cfg(test)]
#[path = "rate_limiter_tests.rs"]
mod tests;
