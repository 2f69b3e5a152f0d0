//! Key to path mapping
//!
//! Every cache key maps to exactly one file: `{root}/{key}.json`. Keys are
//! not escaped here; callers are responsible for filesystem-safe keys.

use once_cell::sync::Lazy;
use regex::Regex;
use std::path::{Path, PathBuf};

/// Extension of every cache entry file
pub const ENTRY_EXTENSION: &str = "json";

static SAFE_KEY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_.\-]+$").expect("Invalid SAFE_KEY_RE regex"));

/// Physical path of a cache key under `root`
pub fn key_path(root: &Path, key: &str) -> PathBuf {
    root.join(format!("{}.{}", key, ENTRY_EXTENSION))
}

/// Recover the cache key from an entry path relative to the root
pub fn path_key(relative: &Path) -> Option<String> {
    let name = relative.to_string_lossy().replace('\\', "/");
    name.strip_suffix(".json")
        .filter(|key| !key.is_empty())
        .map(str::to_string)
}

/// Check whether a key can be used as a single file name without escaping
pub fn is_safe_key(key: &str) -> bool {
    SAFE_KEY_RE.is_match(key) && key != "." && key != ".."
}
