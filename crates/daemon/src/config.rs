// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Durable TOML configuration.
//!
//! A missing config file is created on first boot with a freshly generated
//! signing secret and the hashed default password. Password changes are
//! persisted back here through [`TomlCredentialStore`].

use bw_auth::{hash_password, CredentialStore, DEFAULT_PASSWORD};
use bw_server::supervisor::default_executable_name;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors from config loading and persistence.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config at {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config at {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("failed to write config at {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Address the external transport collaborator binds to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSection {
    pub host: String,
    pub port: u16,
}

/// Credentials: the stored password hash and the token signing secret.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthSection {
    pub password_hash: String,
    pub token_secret: String,
}

/// Where the supervised game server lives.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameSection {
    /// Install directory holding the executable; absent until an operator
    /// activates a server version.
    pub install_dir: Option<PathBuf>,
    pub executable: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSection {
    /// Tracing env-filter directive, e.g. "info" or "bw_server=debug".
    pub filter: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerSection,
    pub auth: AuthSection,
    pub game: GameSection,
    pub logging: LoggingSection,
}

impl Config {
    /// Load the config file, creating it with generated defaults when absent.
    pub fn load_or_init(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            let config = Self::generate_default();
            config.save(path)?;
            tracing::info!(path = %path.display(), "created default config");
            return Ok(config);
        }

        let data = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&data).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Fresh defaults: random signing secret, hashed default password,
    /// platform executable name, no install dir yet.
    fn generate_default() -> Self {
        Self {
            server: ServerSection {
                host: "127.0.0.1".to_string(),
                port: 8080,
            },
            auth: AuthSection {
                password_hash: hash_password(DEFAULT_PASSWORD),
                token_secret: generate_secret(),
            },
            game: GameSection {
                install_dir: None,
                executable: default_executable_name().to_string(),
            },
            logging: LoggingSection {
                filter: "info".to_string(),
            },
        }
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let data = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| ConfigError::Write {
                path: path.to_path_buf(),
                source,
            })?;
        }
        std::fs::write(path, data).map_err(|source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// 32 random bytes, hex-encoded.
fn generate_secret() -> String {
    let bytes: [u8; 32] = rand::rng().random();
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

/// Persists password-hash changes into the config file.
///
/// Read-modify-write keeps operator edits to the other sections intact.
pub struct TomlCredentialStore {
    path: PathBuf,
}

impl TomlCredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl CredentialStore for TomlCredentialStore {
    fn persist_password_hash(&self, hash: &str) -> std::io::Result<()> {
        let data = std::fs::read_to_string(&self.path)?;
        let mut config: Config = toml::from_str(&data).map_err(std::io::Error::other)?;
        config.auth.password_hash = hash.to_string();
        let data = toml::to_string_pretty(&config).map_err(std::io::Error::other)?;
        std::fs::write(&self.path, data)
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
