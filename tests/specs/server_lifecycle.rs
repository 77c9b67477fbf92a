//! Process lifecycle end-to-end: start, live log streaming, command
//! forwarding, and teardown, against a real spawned stand-in process.

use crate::prelude::{fresh_plane, install_fake_server};
use bw_core::ServerState;
use std::time::Duration;

/// Stand-in that greets on stdout and echoes each stdin line back.
const ECHO_SERVER: &str = "echo \"Game server up\"\nwhile read line; do echo \"ack: $line\"; done";

#[tokio::test]
async fn start_send_command_stop_lifecycle() {
    let t = fresh_plane().await;
    install_fake_server(&t, ECHO_SERVER).await;

    assert_eq!(t.plane.supervisor.status().await.status, ServerState::Stopped);

    let (_, mut sub) = t.plane.log_hub.subscribe();

    let started = t.plane.supervisor.start().await.unwrap();
    assert_eq!(started.status, ServerState::Running);
    assert!(started.pid.unwrap() > 0);

    // The capture readers deliver the child's greeting.
    let mut messages = Vec::new();
    while let Ok(Some(entry)) =
        tokio::time::timeout(Duration::from_secs(5), sub.recv()).await
    {
        messages.push(entry.message.clone());
        if entry.message == "Game server up" {
            break;
        }
    }
    assert!(
        messages.iter().any(|m| m == "Game server up"),
        "got: {:?}",
        messages
    );

    // Forward a command; the child echoes it, proving the write landed.
    let record = t.plane.interaction.send_command("weather clear").await.unwrap();
    assert_eq!(record.command, "weather clear");
    assert!(record.success);

    let history = t.plane.interaction.history(1);
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].command, "weather clear");

    let echoed = tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            if let Some(entry) = sub.recv().await {
                if entry.message == "ack: weather clear" {
                    return entry;
                }
            }
        }
    })
    .await
    .unwrap();
    assert_eq!(echoed.level, bw_core::LogLevel::Info);

    t.plane.supervisor.stop().await.unwrap();
    assert_eq!(t.plane.supervisor.status().await.status, ServerState::Stopped);

    // History and log buffer survive the stop.
    assert_eq!(t.plane.interaction.history(1)[0].command, "weather clear");
    assert!(!t.plane.log_hub.recent(0).is_empty());

    t.plane.shutdown().await;
}

#[tokio::test]
async fn forbidden_command_never_reaches_the_server() {
    let t = fresh_plane().await;
    install_fake_server(&t, ECHO_SERVER).await;

    t.plane.supervisor.start().await.unwrap();
    assert!(t.plane.interaction.send_command("stop").await.is_err());
    assert!(t.plane.interaction.send_command("ls; rm -rf /").await.is_err());
    assert!(t.plane.interaction.history(0).is_empty());

    // The process is still up: the rejected commands were never written.
    assert_eq!(t.plane.supervisor.status().await.status, ServerState::Running);

    t.plane.shutdown().await;
}

#[tokio::test]
async fn restart_replaces_the_process() {
    let t = fresh_plane().await;
    install_fake_server(&t, ECHO_SERVER).await;

    let first = t.plane.supervisor.start().await.unwrap();
    let restarted = t.plane.supervisor.restart().await.unwrap();
    assert_eq!(restarted.status, ServerState::Running);
    assert_ne!(restarted.pid, first.pid);

    t.plane.shutdown().await;
}
