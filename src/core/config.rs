//! Adapter configuration
//!
//! A typed configuration with documented defaults. Values are layered as
//! defaults, then an optional JSON config file, then explicit overrides.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::core::error::ConfigError;

/// Default namespace (informational only)
pub const DEFAULT_NAMESPACE: &str = "browscap-json";

/// Configuration accepted by the file store adapter.
///
/// Field names follow the on-disk config surface: `dir`, `namespace`,
/// `cacheExpiration`, `readonly`, `cacheVersion`. Unknown keys are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AdapterConfig {
    /// Root directory for cache files. Required at adapter construction.
    pub dir: Option<PathBuf>,

    /// Cosmetic namespace
    pub namespace: String,

    /// Expiration in seconds; 0 means "unset, use the caller's value"
    pub cache_expiration: u64,

    /// Skip the writability check on the root directory
    pub readonly: bool,

    /// Informational cache format version
    pub cache_version: String,
}

impl Default for AdapterConfig {
    fn default() -> Self {
        Self {
            dir: None,
            namespace: DEFAULT_NAMESPACE.to_string(),
            cache_expiration: 0,
            readonly: false,
            cache_version: String::new(),
        }
    }
}

impl AdapterConfig {
    /// Default configuration rooted at `dir`
    pub fn with_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: Some(dir.into()),
            ..Default::default()
        }
    }

    /// Load a JSON config file. Missing fields take their defaults.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| ConfigError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Apply overrides field by field
    pub fn merge(mut self, overrides: ConfigOverrides) -> Self {
        if let Some(dir) = overrides.dir {
            self.dir = Some(dir);
        }
        if let Some(namespace) = overrides.namespace {
            self.namespace = namespace;
        }
        if let Some(expiration) = overrides.cache_expiration {
            self.cache_expiration = expiration;
        }
        if let Some(readonly) = overrides.readonly {
            self.readonly = readonly;
        }
        if let Some(version) = overrides.cache_version {
            self.cache_version = version;
        }
        self
    }
}

/// Partial configuration; `None` leaves the underlying value alone
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub dir: Option<PathBuf>,
    pub namespace: Option<String>,
    pub cache_expiration: Option<u64>,
    pub readonly: Option<bool>,
    pub cache_version: Option<String>,
}
