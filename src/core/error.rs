//! Fatal setup errors
//!
//! Everything here aborts construction. Per-operation misses and I/O
//! failures are reported through `bool`/`Option` returns instead.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    /// No root directory was configured
    #[error("the cache directory is missing or empty")]
    CacheDirMissing,

    /// The root directory did not exist and could not be created
    #[error("the cache directory {path:?} does not exist and could not be created")]
    CacheDirNotCreatable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The root directory exists but cannot be listed
    #[error("the cache directory {0:?} is not readable")]
    CacheDirNotReadable(PathBuf),

    /// The root directory exists but nothing can be created in it
    #[error("the cache directory {0:?} is not writable")]
    CacheDirNotWritable(PathBuf),

    #[error("failed to read config file {path:?}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path:?}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl ConfigError {
    /// Stable machine-readable code for this error
    pub fn code(&self) -> &'static str {
        match self {
            ConfigError::CacheDirMissing => "CACHE_DIR_MISSING",
            ConfigError::CacheDirNotCreatable { .. } => "CACHE_DIR_NOT_CREATABLE",
            ConfigError::CacheDirNotReadable(_) => "CACHE_DIR_NOT_READABLE",
            ConfigError::CacheDirNotWritable(_) => "CACHE_DIR_NOT_WRITABLE",
            ConfigError::ConfigRead { .. } => "CONFIG_READ_FAILED",
            ConfigError::ConfigParse { .. } => "CONFIG_PARSE_FAILED",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_stable() {
        assert_eq!(ConfigError::CacheDirMissing.code(), "CACHE_DIR_MISSING");
        assert_eq!(
            ConfigError::CacheDirNotReadable(PathBuf::from("/x")).code(),
            "CACHE_DIR_NOT_READABLE"
        );
        assert_eq!(
            ConfigError::CacheDirNotWritable(PathBuf::from("/x")).code(),
            "CACHE_DIR_NOT_WRITABLE"
        );
    }

    #[test]
    fn test_display_mentions_path() {
        let err = ConfigError::CacheDirNotWritable(PathBuf::from("/var/cache/browscap"));
        assert!(err.to_string().contains("/var/cache/browscap"));
    }
}
