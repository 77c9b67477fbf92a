// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Stateless signed session tokens.
//!
//! A token is `base64url(claims-json) + "." + base64url(hmac-sha256-tag)`,
//! signed over the encoded claims with the configured secret. Validity is a
//! pure function of signature and expiry; nothing is stored server-side.

use crate::error::AuthError;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Claims embedded in a session token. Unix-second timestamps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    pub authorized: bool,
    pub iat: i64,
    pub exp: i64,
}

fn mac_for(secret: &[u8]) -> Result<HmacSha256, AuthError> {
    HmacSha256::new_from_slice(secret).map_err(|_| AuthError::BadSignature)
}

/// Sign claims into a token string.
pub fn sign(claims: &SessionClaims, secret: &[u8]) -> Result<String, AuthError> {
    let payload = serde_json::to_vec(claims).map_err(|_| AuthError::Malformed)?;
    let encoded = URL_SAFE_NO_PAD.encode(payload);

    let mut mac = mac_for(secret)?;
    mac.update(encoded.as_bytes());
    let tag = URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes());

    Ok(format!("{}.{}", encoded, tag))
}

/// Verify a token's signature and expiry, returning the decoded claims.
///
/// The signature is checked (in constant time) before the claims are parsed,
/// so forged payloads are rejected without being interpreted.
pub fn verify(token: &str, secret: &[u8], now: DateTime<Utc>) -> Result<SessionClaims, AuthError> {
    let (encoded, tag) = token.split_once('.').ok_or(AuthError::Malformed)?;
    let tag = URL_SAFE_NO_PAD.decode(tag).map_err(|_| AuthError::Malformed)?;

    let mut mac = mac_for(secret)?;
    mac.update(encoded.as_bytes());
    mac.verify_slice(&tag).map_err(|_| AuthError::BadSignature)?;

    let payload = URL_SAFE_NO_PAD
        .decode(encoded)
        .map_err(|_| AuthError::Malformed)?;
    let claims: SessionClaims =
        serde_json::from_slice(&payload).map_err(|_| AuthError::Malformed)?;

    if now.timestamp() >= claims.exp {
        return Err(AuthError::Expired);
    }

    Ok(claims)
}

#[cfg(test)]
#[path = "token_tests.rs"]
mod tests;
