//! Shared helpers for control-plane specs.

use bw_daemon::{Config, ControlPlane};
use std::path::PathBuf;
use tempfile::TempDir;

/// A control plane wired against a fresh config in a tempdir.
pub struct TestPlane {
    pub dir: TempDir,
    pub config_path: PathBuf,
    pub plane: ControlPlane,
}

pub async fn fresh_plane() -> TestPlane {
    let dir = TempDir::new().unwrap();
    let config_path = dir.path().join("blockwatch.toml");
    let config = Config::load_or_init(&config_path).unwrap();
    let plane = ControlPlane::startup(&config, &config_path).await.unwrap();
    TestPlane {
        dir,
        config_path,
        plane,
    }
}

/// Write an executable game-server stand-in into the tempdir and point the
/// supervisor at it.
#[cfg(unix)]
pub async fn install_fake_server(plane: &TestPlane, script_body: &str) {
    use std::os::unix::fs::PermissionsExt;

    let install = plane.dir.path().join("server");
    std::fs::create_dir_all(&install).unwrap();
    let path = install.join("bedrock_server");
    std::fs::write(&path, format!("#!/bin/sh\n{}\n", script_body)).unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();

    plane.plane.supervisor.set_install_dir(Some(install)).await;
}
