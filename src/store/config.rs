//! Record store configuration
//!
//! Two policies trade safety for speed:
//! - `SyncPolicy` decides when data and header reach the disk
//! - `ReadPolicy` decides whether reads reject corrupt containers

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default number of records per chunk for streaming reads and suffix shifts.
pub const DEFAULT_CHUNK_SIZE: u32 = 100_000;

/// When written data and the header are flushed to disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncPolicy {
    /// fsync after every write and rewrite the header after every mutation.
    /// The header on disk is never older than the last acknowledged append.
    #[default]
    Always,
    /// Keep the header in memory and flush it with one fsync on
    /// `flush()`, `clear()`, `close()` or drop. A crash loses cursor
    /// updates since the last flush.
    OnClose,
}

/// Whether reads verify checksums.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadPolicy {
    /// Return containers as stored; callers check `is_valid()` themselves.
    #[default]
    Raw,
    /// Fail the read with `CHECKSUM_MISMATCH` on the first invalid container.
    Verify,
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid config value: {0}")]
    Invalid(String),
}

/// Store configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// fsync cadence (default: always)
    #[serde(default)]
    pub sync_policy: SyncPolicy,

    /// Checksum enforcement on reads (default: raw)
    #[serde(default)]
    pub read_policy: ReadPolicy,

    /// Records per chunk (default: 100000)
    #[serde(default = "default_chunk_size")]
    pub chunk_size: u32,
}

fn default_chunk_size() -> u32 {
    DEFAULT_CHUNK_SIZE
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            sync_policy: SyncPolicy::default(),
            read_policy: ReadPolicy::default(),
            chunk_size: default_chunk_size(),
        }
    }
}

impl StoreConfig {
    /// Durable configuration: fsync everything, return raw containers.
    pub fn durable() -> Self {
        Self::default()
    }

    /// Throughput configuration: header flushed only on close.
    pub fn fast() -> Self {
        Self {
            sync_policy: SyncPolicy::OnClose,
            ..Self::default()
        }
    }

    /// Returns a copy that rejects corrupt containers on read.
    pub fn verified(mut self) -> Self {
        self.read_policy = ReadPolicy::Verify;
        self
    }

    /// Returns a copy with a different chunk size.
    pub fn with_chunk_size(mut self, chunk_size: u32) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    /// Parses a configuration from JSON. Missing fields take defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: StoreConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads a configuration from a JSON file.
    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            source: e,
        })?;
        Self::from_json_str(&content)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.chunk_size == 0 {
            return Err(ConfigError::Invalid("chunk_size must be greater than zero".into()));
        }
        Ok(())
    }

    /// True if every mutation is fsynced before returning.
    pub fn syncs_every_write(&self) -> bool {
        self.sync_policy == SyncPolicy::Always
    }

    /// True if reads reject invalid containers.
    pub fn verifies_reads(&self) -> bool {
        self.read_policy == ReadPolicy::Verify
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = StoreConfig::default();
        assert_eq!(config.sync_policy, SyncPolicy::Always);
        assert_eq!(config.read_policy, ReadPolicy::Raw);
        assert_eq!(config.chunk_size, DEFAULT_CHUNK_SIZE);
        assert!(config.syncs_every_write());
        assert!(!config.verifies_reads());
    }

    #[test]
    fn test_named_constructors() {
        assert_eq!(StoreConfig::fast().sync_policy, SyncPolicy::OnClose);
        assert!(StoreConfig::durable().verified().verifies_reads());
        assert_eq!(StoreConfig::default().with_chunk_size(7).chunk_size, 7);
    }

    #[test]
    fn test_from_json_partial() {
        let config = StoreConfig::from_json_str(r#"{"sync_policy": "on_close"}"#).unwrap();
        assert_eq!(config.sync_policy, SyncPolicy::OnClose);
        assert_eq!(config.read_policy, ReadPolicy::Raw);
        assert_eq!(config.chunk_size, DEFAULT_CHUNK_SIZE);
    }

    #[test]
    fn test_from_json_full() {
        let config = StoreConfig::from_json_str(
            r#"{"sync_policy": "always", "read_policy": "verify", "chunk_size": 64}"#,
        )
        .unwrap();
        assert_eq!(config, StoreConfig::durable().verified().with_chunk_size(64));
    }

    #[test]
    fn test_from_json_rejects_zero_chunk() {
        let err = StoreConfig::from_json_str(r#"{"chunk_size": 0}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_from_json_rejects_unknown_policy() {
        let err = StoreConfig::from_json_str(r#"{"sync_policy": "sometimes"}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_from_json_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("store.json");
        std::fs::write(&path, r#"{"read_policy": "verify"}"#).unwrap();

        let config = StoreConfig::from_json_file(&path).unwrap();
        assert!(config.verifies_reads());

        let missing = StoreConfig::from_json_file(&dir.path().join("missing.json")).unwrap_err();
        assert!(matches!(missing, ConfigError::Io { .. }));
    }

    #[test]
    fn test_serialize_round_trip() {
        let config = StoreConfig::fast().verified();
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("\"on_close\""));
        assert_eq!(StoreConfig::from_json_str(&json).unwrap(), config);
    }
}
