//! Credential lifecycle on a fresh system: default login, forced change,
//! strength policy, and durable persistence.

use crate::prelude::fresh_plane;
use bw_auth::AuthError;
use bw_daemon::Config;

const IP: &str = "203.0.113.7";

#[tokio::test]
async fn fresh_system_credential_lifecycle() {
    let t = fresh_plane().await;

    // Default password logs in but is flagged for a forced change.
    let outcome = t.plane.auth.login(IP, "admin123").unwrap();
    assert!(outcome.require_password_change);
    let claims = t.plane.auth.validate_token(&outcome.token).unwrap();
    assert!(claims.authorized);

    // A weak replacement is rejected and nothing is persisted.
    let err = t.plane.auth.change_password("admin123", "weak").unwrap_err();
    assert!(matches!(err, AuthError::WeakPassword { .. }));

    // A strong replacement is accepted...
    t.plane
        .auth
        .change_password("admin123", "Str0ng!Pass")
        .unwrap();

    // ...the old password stops working...
    assert!(matches!(
        t.plane.auth.login(IP, "admin123").unwrap_err(),
        AuthError::InvalidCredentials { .. }
    ));

    // ...the new one works without the forced-change flag...
    let outcome = t.plane.auth.login(IP, "Str0ng!Pass").unwrap();
    assert!(!outcome.require_password_change);

    // ...and the hash survived to the config file.
    let reloaded = Config::load_or_init(&t.config_path).unwrap();
    assert_eq!(
        reloaded.auth.password_hash,
        bw_auth::hash_password("Str0ng!Pass")
    );

    t.plane.shutdown().await;
}

#[tokio::test]
async fn repeated_failures_block_before_credential_checking() {
    let t = fresh_plane().await;

    for attempt in 1..=5 {
        let err = t.plane.auth.login(IP, "wrong-password").unwrap_err();
        if attempt < 5 {
            assert_eq!(
                err,
                AuthError::InvalidCredentials {
                    remaining_attempts: 5 - attempt
                }
            );
        }
    }

    // Sixth call: rejected up front, even with the correct password.
    let err = t.plane.auth.login(IP, "admin123").unwrap_err();
    assert!(matches!(err, AuthError::TooManyAttempts { .. }));

    // A different identity is unaffected.
    assert!(t.plane.auth.login("198.51.100.9", "admin123").is_ok());

    t.plane.shutdown().await;
}
