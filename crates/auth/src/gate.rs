// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The authentication gate: password login, token issuance/validation, and
//! password changes.

use crate::error::AuthError;
use crate::password::{check_strength, hash_password, DEFAULT_PASSWORD};
use crate::rate_limiter::RateLimiter;
use crate::token::{self, SessionClaims};
use bw_core::{Clock, SystemClock};
use chrono::{DateTime, Duration, Utc};
use parking_lot::RwLock;
use subtle::ConstantTimeEq;

/// How long an issued session token stays valid.
pub const TOKEN_TTL_HOURS: i64 = 24;

/// Durable home of the password hash.
///
/// Implemented by the daemon's config file; tests use an in-memory fake.
/// The gate persists through this seam before swapping its in-memory value
/// so a crash between the two never loses a password change.
pub trait CredentialStore: Send + Sync {
    fn persist_password_hash(&self, hash: &str) -> std::io::Result<()>;
}

/// Successful login result.
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub token: String,
    pub expires_at: DateTime<Utc>,
    /// Set when the supplied password is the known default, prompting the
    /// transport to force a change.
    pub require_password_change: bool,
}

/// Verifies credentials and issues/validates session tokens.
///
/// Login attempts are gated by the [`RateLimiter`]: a blocked identity is
/// rejected before any credential check.
pub struct AuthGate<S: CredentialStore, C: Clock + Clone = SystemClock> {
    store: S,
    secret: Vec<u8>,
    password_hash: RwLock<String>,
    limiter: RateLimiter<C>,
    clock: C,
}

impl<S: CredentialStore, C: Clock + Clone> AuthGate<S, C> {
    pub fn new(
        secret: impl Into<Vec<u8>>,
        password_hash: impl Into<String>,
        store: S,
        limiter: RateLimiter<C>,
        clock: C,
    ) -> Self {
        Self {
            store,
            secret: secret.into(),
            password_hash: RwLock::new(password_hash.into()),
            limiter,
            clock,
        }
    }

    /// Exchange a password for a session token.
    ///
    /// `identity` is the opaque caller identity used for rate limiting
    /// (the transport passes the client IP).
    pub fn login(&self, identity: &str, password: &str) -> Result<LoginOutcome, AuthError> {
        if self.limiter.is_blocked(identity) {
            let retry_after = self.limiter.block_time_remaining(identity);
            return Err(AuthError::TooManyAttempts {
                retry_after_secs: retry_after.as_secs(),
            });
        }

        let supplied = hash_password(password);
        if !self.matches_stored(&supplied) {
            self.limiter.record_failed_attempt(identity);
            let remaining_attempts = self.limiter.remaining_attempts(identity);
            tracing::warn!(identity, remaining_attempts, "failed login attempt");
            return Err(AuthError::InvalidCredentials { remaining_attempts });
        }

        self.limiter.record_successful_attempt(identity);

        let now = self.clock.now();
        let expires_at = now + Duration::hours(TOKEN_TTL_HOURS);
        let claims = SessionClaims {
            authorized: true,
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };
        let token = token::sign(&claims, &self.secret)?;

        Ok(LoginOutcome {
            token,
            expires_at,
            require_password_change: supplied == hash_password(DEFAULT_PASSWORD),
        })
    }

    /// Check a token's signature and expiry, returning its claims.
    pub fn validate_token(&self, token: &str) -> Result<SessionClaims, AuthError> {
        token::verify(token, &self.secret, self.clock.now())
    }

    /// Replace the password, enforcing the strength policy and persisting
    /// the new hash durably before the in-memory swap.
    pub fn change_password(&self, current: &str, new: &str) -> Result<(), AuthError> {
        let mut stored = self.password_hash.write();

        let supplied = hash_password(current);
        if !constant_time_eq(&supplied, &stored) {
            return Err(AuthError::WrongCurrentPassword);
        }

        check_strength(new)?;

        let new_hash = hash_password(new);
        self.store
            .persist_password_hash(&new_hash)
            .map_err(|e| AuthError::Store(e.to_string()))?;
        *stored = new_hash;

        tracing::info!("password changed");
        Ok(())
    }

    fn matches_stored(&self, supplied_hash: &str) -> bool {
        let stored = self.password_hash.read();
        constant_time_eq(supplied_hash, &stored)
    }
}

fn constant_time_eq(a: &str, b: &str) -> bool {
    a.as_bytes().ct_eq(b.as_bytes()).into()
}

#[cfg(test)]
#[path = "gate_tests.rs"]
mod tests;
