// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for authentication and rate limiting

use thiserror::Error;

/// Errors returned to the transport layer by the auth gate.
///
/// Every variant maps to a protocol-level response; none is swallowed
/// internally. `InvalidCredentials` carries the remaining attempt count so
/// the caller can warn an operator approaching the block threshold without a
/// second rate-limiter query.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("invalid credentials")]
    InvalidCredentials { remaining_attempts: u32 },

    #[error("too many failed login attempts, retry after {retry_after_secs}s")]
    TooManyAttempts { retry_after_secs: u64 },

    #[error("current password is incorrect")]
    WrongCurrentPassword,

    #[error("password too weak: {reason}")]
    WeakPassword { reason: &'static str },

    #[error("malformed token")]
    Malformed,

    #[error("token signature mismatch")]
    BadSignature,

    #[error("token expired")]
    Expired,

    #[error("failed to persist credentials: {0}")]
    Store(String),
}
