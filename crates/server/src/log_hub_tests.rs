// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use std::time::Duration;
use tokio::io::AsyncWriteExt;

fn messages(entries: &[LogEntry]) -> Vec<&str> {
    entries.iter().map(|e| e.message.as_str()).collect()
}

#[test]
fn buffer_never_exceeds_capacity() {
    let hub = LogHub::with_capacity(5);
    for i in 0..12 {
        hub.append(LogLevel::Info, format!("line {}", i));
    }
    let entries = hub.recent(0);
    assert_eq!(entries.len(), 5);
    // Oldest evicted first: only the most recent five remain.
    assert_eq!(
        messages(&entries),
        vec!["line 7", "line 8", "line 9", "line 10", "line 11"]
    );
}

#[test]
fn recent_returns_tail_in_production_order() {
    let hub = LogHub::with_capacity(10);
    for i in 0..6 {
        hub.append(LogLevel::Info, format!("line {}", i));
    }
    assert_eq!(messages(&hub.recent(2)), vec!["line 4", "line 5"]);
    assert_eq!(hub.recent(0).len(), 6);
    assert_eq!(hub.recent(100).len(), 6);
}

#[test]
fn clear_empties_buffer_but_keeps_subscribers() {
    let hub = LogHub::new();
    hub.append(LogLevel::Info, "before");
    let (_, _sub) = hub.subscribe();
    hub.clear();
    assert!(hub.recent(0).is_empty());
    assert_eq!(hub.subscriber_count(), 1);
}

#[tokio::test]
async fn snapshot_is_the_tail_at_subscribe_time() {
    let hub = LogHub::new();
    for i in 0..150 {
        hub.append(LogLevel::Info, format!("line {}", i));
    }
    let (snapshot, _sub) = hub.subscribe();
    assert_eq!(snapshot.len(), SNAPSHOT_LIMIT);
    assert_eq!(snapshot[0].message, "line 50");
    assert_eq!(snapshot[99].message, "line 149");
}

#[tokio::test]
async fn subscribers_receive_entries_in_order() {
    let hub = LogHub::new();
    let (snapshot, mut sub) = hub.subscribe();
    assert!(snapshot.is_empty());

    hub.append(LogLevel::Info, "first");
    hub.append(LogLevel::Error, "second");

    let first = sub.recv().await.unwrap();
    assert_eq!(first.message, "first");
    assert_eq!(first.level, LogLevel::Info);
    let second = sub.recv().await.unwrap();
    assert_eq!(second.message, "second");
    assert_eq!(second.level, LogLevel::Error);
}

#[tokio::test]
async fn dropped_subscriber_is_removed_on_next_push() {
    let hub = LogHub::new();
    let (_, sub) = hub.subscribe();
    let (_, mut live) = hub.subscribe();
    assert_eq!(hub.subscriber_count(), 2);

    drop(sub);
    hub.append(LogLevel::Info, "after drop");

    assert_eq!(hub.subscriber_count(), 1);
    // Delivery to the surviving subscriber is unaffected.
    assert_eq!(live.recv().await.unwrap().message, "after drop");
}

#[tokio::test]
async fn unsubscribe_closes_the_feed() {
    let hub = LogHub::new();
    let (_, mut sub) = hub.subscribe();
    hub.unsubscribe(sub.id());
    assert_eq!(hub.subscriber_count(), 0);
    assert!(sub.recv().await.is_none());
}

#[tokio::test]
async fn capture_tags_streams_with_severity() {
    let hub = LogHub::new();
    let (mut stdout_w, stdout_r) = tokio::io::duplex(256);
    let (mut stderr_w, stderr_r) = tokio::io::duplex(256);

    let (_, mut sub) = hub.subscribe();
    hub.start_capture(stdout_r, stderr_r);

    stdout_w.write_all(b"server up\n").await.unwrap();
    let entry = sub.recv().await.unwrap();
    assert_eq!(entry.level, LogLevel::Info);
    assert_eq!(entry.message, "server up");

    stderr_w.write_all(b"oh no\n").await.unwrap();
    let entry = sub.recv().await.unwrap();
    assert_eq!(entry.level, LogLevel::Error);
    assert_eq!(entry.message, "oh no");
}

#[tokio::test]
async fn capture_skips_blank_lines() {
    let hub = LogHub::new();
    let (mut stdout_w, stdout_r) = tokio::io::duplex(256);
    let (_stderr_w, stderr_r) = tokio::io::duplex(256);

    let (_, mut sub) = hub.subscribe();
    hub.start_capture(stdout_r, stderr_r);

    stdout_w.write_all(b"\n\nreal line\n").await.unwrap();
    assert_eq!(sub.recv().await.unwrap().message, "real line");
    assert_eq!(hub.recent(0).len(), 1);
}

#[tokio::test]
async fn stop_capture_halts_readers() {
    let hub = LogHub::new();
    let (mut stdout_w, stdout_r) = tokio::io::duplex(256);
    let (_stderr_w, stderr_r) = tokio::io::duplex(256);

    let (_, mut sub) = hub.subscribe();
    hub.start_capture(stdout_r, stderr_r);
    assert!(hub.is_capturing());

    stdout_w.write_all(b"before stop\n").await.unwrap();
    assert_eq!(sub.recv().await.unwrap().message, "before stop");

    hub.stop_capture();
    assert!(!hub.is_capturing());
    // Give the reader a moment to observe the signal, then write again.
    tokio::time::sleep(Duration::from_millis(50)).await;
    let _ = stdout_w.write_all(b"after stop\n").await;
    tokio::time::sleep(Duration::from_millis(50)).await;

    assert_eq!(hub.recent(0).len(), 1, "no capture after stop");
}

#[tokio::test]
async fn stop_capture_without_capture_is_a_no_op() {
    let hub = LogHub::new();
    hub.stop_capture();
    assert!(!hub.is_capturing());
}

#[tokio::test]
async fn restart_of_capture_stops_previous_readers() {
    let hub = LogHub::new();
    let (mut old_w, old_r) = tokio::io::duplex(256);
    let (_old_err_w, old_err_r) = tokio::io::duplex(256);
    hub.start_capture(old_r, old_err_r);

    let (mut new_w, new_r) = tokio::io::duplex(256);
    let (_new_err_w, new_err_r) = tokio::io::duplex(256);
    hub.start_capture(new_r, new_err_r);
    tokio::time::sleep(Duration::from_millis(50)).await;

    let _ = old_w.write_all(b"from old stream\n").await;
    new_w.write_all(b"from new stream\n").await.unwrap();
    tokio::time::sleep(Duration::from_millis(50)).await;

    assert_eq!(messages(&hub.recent(0)), vec!["from new stream"]);
}

#[tokio::test]
async fn closed_stream_ends_capture_reader() {
    let hub = LogHub::new();
    let (mut stdout_w, stdout_r) = tokio::io::duplex(256);
    let (_stderr_w, stderr_r) = tokio::io::duplex(256);
    hub.start_capture(stdout_r, stderr_r);

    stdout_w.write_all(b"last words\n").await.unwrap();
    drop(stdout_w);
    tokio::time::sleep(Duration::from_millis(50)).await;

    assert_eq!(messages(&hub.recent(0)), vec!["last words"]);
}
