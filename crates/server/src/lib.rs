// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! bw-server: Supervision of the game-server child process.
//!
//! [`ProcessSupervisor`] owns the child's lifecycle; on start it wires the
//! process's output pipes into the [`LogHub`] (capture + fan-out to
//! subscribers) and its input pipe into the [`InteractionChannel`]
//! (validated operator commands). All three are handed to the transport
//! layer by the daemon's wiring.

pub mod error;
pub mod interaction;
pub mod log_hub;
pub mod supervisor;
pub mod validate;

pub use error::{CommandError, SupervisorError};
pub use interaction::InteractionChannel;
pub use log_hub::{LogHub, Subscription};
pub use supervisor::ProcessSupervisor;
pub use validate::validate_command;
