//! Storage adapter contract
//!
//! Any backend that can check, read, write and delete JSON values by string
//! key can sit beneath the versioned proxy.

use serde_json::Value;

/// Key-value storage backend for cache entries.
///
/// Soft failures (missing key, undecodable data, I/O errors) are reported
/// through the return values and never raised. A stored JSON `null` reads
/// back as `None`, the same as a missing key; wrap values in an envelope if
/// that distinction matters.
pub trait CacheAdapter {
    /// Whether an entry exists for `key`
    fn has_item(&self, key: &str) -> bool;

    /// Decoded value for `key`, or `None` if missing, undecodable or `null`
    fn get_item(&self, key: &str) -> Option<Value>;

    /// Store `value` under `key`, returning whether the write succeeded
    fn set_item(&self, key: &str, value: &Value) -> bool;

    /// Delete `key`, returning `false` if nothing was deleted
    fn remove_item(&self, key: &str) -> bool;

    /// Remove every entry
    fn flush(&self) -> bool;

    /// Bind an expiration duration. Backends may store it without enforcing it.
    fn set_expiration(&mut self, seconds: u64);

    /// Currently bound expiration duration in seconds
    fn expiration(&self) -> u64;
}
