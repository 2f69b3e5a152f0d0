//! Versioned cache proxy
//!
//! Sits on top of any [`CacheAdapter`] and adds two things:
//! - logical keys are suffixed with the current data version (`key.6000`)
//! - values are stored inside a `{"content": ...}` envelope so that a stored
//!   `null` can be told apart from a missing entry
//!
//! The data version, release date and type are read lazily from fixed
//! unversioned keys and kept for the lifetime of the proxy. They are never
//! refreshed, not even by [`VersionedCacheProxy::flush`]; build a new proxy
//! to pick up a new data release.

use once_cell::unsync::OnceCell;
use serde_json::{Map, Value};

use crate::cache::adapter::CacheAdapter;
use crate::cache::file::FileStoreAdapter;
use crate::cache::meta::{
    coerce_string, coerce_version, DEFAULT_EXPIRATION, RELEASE_DATE_KEY, TYPE_KEY, VERSION_KEY,
};

/// Envelope field holding the stored value
pub const CONTENT_FIELD: &str = "content";

pub struct VersionedCacheProxy<A = FileStoreAdapter> {
    adapter: A,
    version: OnceCell<i64>,
    release_date: OnceCell<String>,
    data_type: OnceCell<String>,
}

impl<A: CacheAdapter> VersionedCacheProxy<A> {
    /// Wrap `adapter`, binding the default ten-year expiration
    pub fn new(adapter: A) -> Self {
        Self::with_expiration(adapter, DEFAULT_EXPIRATION)
    }

    /// Wrap `adapter`, binding `seconds` as its expiration
    pub fn with_expiration(mut adapter: A, seconds: u64) -> Self {
        adapter.set_expiration(seconds);
        Self {
            adapter,
            version: OnceCell::new(),
            release_date: OnceCell::new(),
            data_type: OnceCell::new(),
        }
    }

    pub fn adapter(&self) -> &A {
        &self.adapter
    }

    pub fn into_inner(self) -> A {
        self.adapter
    }

    /// Current data version. A miss is not cached, so the next call retries.
    pub fn version(&self) -> Option<i64> {
        self.version
            .get_or_try_init(|| {
                self.get_item(VERSION_KEY, false)
                    .map(|value| coerce_version(&value))
                    .ok_or(())
            })
            .ok()
            .copied()
    }

    /// Release date of the current data
    pub fn release_date(&self) -> Option<String> {
        self.lazy_string(&self.release_date, RELEASE_DATE_KEY)
    }

    /// Type of the current data
    pub fn data_type(&self) -> Option<String> {
        self.lazy_string(&self.data_type, TYPE_KEY)
    }

    /// Key handed to the adapter for `key`.
    ///
    /// With `with_version` and no resolvable version this yields `"{key}."`,
    /// a separate namespace for unversioned data rather than an error.
    pub fn physical_key(&self, key: &str, with_version: bool) -> String {
        if !with_version {
            return key.to_string();
        }
        match self.version() {
            Some(version) => format!("{}.{}", key, version),
            None => format!("{}.", key),
        }
    }

    /// Stored content for `key`; `Some(Value::Null)` is a stored `null`
    pub fn get_item(&self, key: &str, with_version: bool) -> Option<Value> {
        let key = self.physical_key(key, with_version);
        if !self.adapter.has_item(&key) {
            return None;
        }

        match self.adapter.get_item(&key)? {
            Value::Object(mut envelope) => envelope.remove(CONTENT_FIELD),
            _ => None,
        }
    }

    pub fn set_item(&self, key: &str, content: &Value, with_version: bool) -> bool {
        let mut envelope = Map::new();
        envelope.insert(CONTENT_FIELD.to_string(), content.clone());
        let key = self.physical_key(key, with_version);
        self.adapter.set_item(&key, &Value::Object(envelope))
    }

    pub fn has_item(&self, key: &str, with_version: bool) -> bool {
        let key = self.physical_key(key, with_version);
        self.adapter.has_item(&key)
    }

    pub fn remove_item(&self, key: &str, with_version: bool) -> bool {
        let key = self.physical_key(key, with_version);
        self.adapter.remove_item(&key)
    }

    /// Flush the adapter. Cached version metadata is kept.
    pub fn flush(&self) -> bool {
        self.adapter.flush()
    }

    fn lazy_string(&self, cell: &OnceCell<String>, key: &str) -> Option<String> {
        cell.get_or_try_init(|| {
            self.get_item(key, false)
                .as_ref()
                .and_then(coerce_string)
                .ok_or(())
        })
        .ok()
        .cloned()
    }
}
