// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! History records for operator commands forwarded to the game server.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One accepted command send.
///
/// The supervised process never acknowledges individual commands on its
/// input stream, so `response` is a static acknowledgement and `success`
/// reflects only that the write completed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandRecord {
    pub command: String,
    pub response: String,
    pub timestamp: DateTime<Utc>,
    pub success: bool,
}
