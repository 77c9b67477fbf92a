// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Password hashing and strength policy.

use crate::error::AuthError;
use sha2::{Digest, Sha256};

/// The out-of-the-box password written into a freshly generated config.
/// Logins with it succeed but are flagged for a forced change.
pub const DEFAULT_PASSWORD: &str = "admin123";

/// Minimum accepted password length.
pub const MIN_PASSWORD_LENGTH: usize = 8;

const SYMBOLS: &str = "!@#$%^&*()_+-=[]{};':\"\\|,.<>/?~`";

/// SHA-256 hash of a password, hex-encoded.
///
/// Matches the stored format in the durable config file.
pub fn hash_password(password: &str) -> String {
    let digest = Sha256::digest(password.as_bytes());
    digest.iter().map(|b| format!("{:02x}", b)).collect()
}

/// Check a candidate password against the strength policy: at least
/// [`MIN_PASSWORD_LENGTH`] characters with one uppercase letter, one
/// lowercase letter, one digit, and one symbol.
pub fn check_strength(password: &str) -> Result<(), AuthError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword {
            reason: "must be at least 8 characters",
        });
    }
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        return Err(AuthError::WeakPassword {
            reason: "must contain an uppercase letter",
        });
    }
    if !password.chars().any(|c| c.is_ascii_lowercase()) {
        return Err(AuthError::WeakPassword {
            reason: "must contain a lowercase letter",
        });
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Err(AuthError::WeakPassword {
            reason: "must contain a digit",
        });
    }
    if !password.chars().any(|c| SYMBOLS.contains(c)) {
        return Err(AuthError::WeakPassword {
            reason: "must contain a symbol",
        });
    }
    Ok(())
}

#[cfg(test)]
#[path = "password_tests.rs"]
mod tests;
