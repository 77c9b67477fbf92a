// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use chrono::TimeZone;

fn fixed_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 14, 9, 26, 53).unwrap()
}

#[yare::parameterized(
    info  = { LogLevel::Info,  "\"INFO\"" },
    warn  = { LogLevel::Warn,  "\"WARN\"" },
    error = { LogLevel::Error, "\"ERROR\"" },
)]
fn level_serializes_uppercase(level: LogLevel, expected: &str) {
    assert_eq!(serde_json::to_string(&level).unwrap(), expected);
}

#[test]
fn entry_wire_shape() {
    let entry = LogEntry::new(LogLevel::Info, "Server started successfully", fixed_time());
    let json: serde_json::Value = serde_json::from_str(&serde_json::to_string(&entry).unwrap()).unwrap();
    assert_eq!(json["level"], "INFO");
    assert_eq!(json["message"], "Server started successfully");
    assert!(json["timestamp"].is_string());
}

#[test]
fn entry_roundtrip() {
    let entry = LogEntry::new(LogLevel::Error, "boom", fixed_time());
    let back: LogEntry = serde_json::from_str(&serde_json::to_string(&entry).unwrap()).unwrap();
    assert_eq!(back, entry);
}

#[test]
fn entry_display_includes_level_and_message() {
    let entry = LogEntry::new(LogLevel::Warn, "disk almost full", fixed_time());
    let rendered = entry.to_string();
    assert!(rendered.contains("[WARN]"), "got: {}", rendered);
    assert!(rendered.contains("disk almost full"), "got: {}", rendered);
}
