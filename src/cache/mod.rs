//! Cache module - File-backed JSON store with a versioning proxy
//!
//! Provides:
//! - The storage adapter contract
//! - A file store adapter (one JSON document per key)
//! - Data-version metadata keys
//! - The versioned proxy wrapping values in a `content` envelope

pub mod adapter;
pub mod file;
pub mod meta;
pub mod proxy;

pub use adapter::CacheAdapter;
pub use file::FileStoreAdapter;
pub use proxy::VersionedCacheProxy;
