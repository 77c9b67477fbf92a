// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Safety validation for operator commands.
//!
//! Validation is pure and side-effect-free; [`InteractionChannel`] applies it
//! before any write reaches the supervised process's input stream.
//!
//! [`InteractionChannel`]: crate::interaction::InteractionChannel

use crate::error::CommandError;

/// Maximum accepted command length, in bytes.
pub const MAX_COMMAND_LENGTH: usize = 256;

/// Commands that terminate the process or escalate privileges. The
/// supervisor owns process lifecycle; these must go through its API, never
/// through the console.
const UNSAFE_COMMANDS: &[&str] = &[
    "stop",
    "restart",
    "shutdown",
    "exit",
    "quit",
    "reload",
    "op",
    "deop",
    "ban",
    "ban-ip",
    "pardon",
    "pardon-ip",
    "whitelist",
];

/// Shell metacharacters rejected outright to rule out injection.
const FORBIDDEN_CHARS: &[char] = &[';', '&', '|', '`', '$', '(', ')', '<', '>'];

/// Validate a candidate operator command against the safety policy.
pub fn validate_command(command: &str) -> Result<(), CommandError> {
    let trimmed = command.trim();
    if trimmed.is_empty() {
        return Err(CommandError::Empty);
    }

    if command.len() > MAX_COMMAND_LENGTH {
        return Err(CommandError::TooLong {
            len: command.len(),
            max: MAX_COMMAND_LENGTH,
        });
    }

    for unsafe_command in UNSAFE_COMMANDS {
        let is_prefixed = trimmed
            .strip_prefix(unsafe_command)
            .is_some_and(|rest| rest.starts_with(' '));
        if trimmed == *unsafe_command || is_prefixed {
            return Err(CommandError::Forbidden {
                command: (*unsafe_command).to_string(),
            });
        }
    }

    if let Some(ch) = command.chars().find(|c| FORBIDDEN_CHARS.contains(c)) {
        return Err(CommandError::InjectionRisk { ch });
    }

    Ok(())
}

#[cfg(test)]
#[path = "validate_tests.rs"]
mod tests;
