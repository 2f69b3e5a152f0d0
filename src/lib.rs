//! browscap-cache - A file-backed, versioned JSON cache for browser-capability data
//!
//! ```no_run
//! use browscap_cache::{AdapterConfig, FileStoreAdapter, VersionedCacheProxy};
//! use serde_json::json;
//!
//! # fn main() -> Result<(), browscap_cache::ConfigError> {
//! let adapter = FileStoreAdapter::new(AdapterConfig::with_dir("/var/cache/browscap"))?;
//! let cache = VersionedCacheProxy::new(adapter);
//!
//! cache.set_item("browser.patterns", &json!(["*Firefox*"]), true);
//! if let Some(patterns) = cache.get_item("browser.patterns", true) {
//!     println!("{}", patterns);
//! }
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod core;

pub use crate::cache::{CacheAdapter, FileStoreAdapter, VersionedCacheProxy};
pub use crate::core::config::{AdapterConfig, ConfigOverrides};
pub use crate::core::error::ConfigError;
