//! Persistent store configuration.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

/// Configuration for a [`FjallStore`](crate::FjallStore), usually loaded from TOML.
///
/// ```toml
/// path = ".typed-kv"
/// keyspace = "prefs"
/// durability = "sync-data"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StoreConfig {
    /// Directory holding the database.
    pub path: PathBuf,

    /// Keyspace (within the database) holding the entries.
    #[serde(default = "default_keyspace")]
    pub keyspace: String,

    /// How hard each write is pushed to disk before it is acknowledged.
    #[serde(default)]
    pub durability: Durability,
}

/// When acknowledged writes are guaranteed to be on disk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Durability {
    /// Flush and fsync data and metadata after every write call.
    #[default]
    SyncAll,
    /// Flush and fsync data after every write call.
    SyncData,
    /// Flush to the OS buffers after every write call.
    Buffer,
    /// Leave persistence to the engine's background flushing.
    None,
}

fn default_keyspace() -> String {
    "entries".to_string()
}

impl StoreConfig {
    /// Configuration for a database at `path` with default settings.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            keyspace: default_keyspace(),
            durability: Durability::default(),
        }
    }

    /// Load configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_str(&content)
    }

    /// Parse configuration from a TOML string.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Use a different keyspace.
    pub fn with_keyspace(mut self, keyspace: impl Into<String>) -> Self {
        self.keyspace = keyspace.into();
        self
    }

    /// Use a different durability level.
    pub fn with_durability(mut self, durability: Durability) -> Self {
        self.durability = durability;
        self
    }
}

/// Configuration error.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// IO error reading the config file.
    #[error("failed to read config file '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    /// TOML parse error.
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}
