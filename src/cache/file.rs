//! File store adapter - one pretty-printed JSON document per key
//!
//! Layout:
//! ```text
//! root/
//! ├── browscap.version.json
//! ├── browscap.releaseDate.json
//! ├── browser.6000.json
//! └── ...
//! ```

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use serde_json::Value;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, trace};
use walkdir::WalkDir;

use crate::cache::adapter::CacheAdapter;
use crate::core::config::AdapterConfig;
use crate::core::error::ConfigError;
use crate::core::paths::{key_path, path_key};

/// Indentation used for every written document
const INDENT: &[u8] = b"    ";

/// A stored entry as seen on disk
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntryInfo {
    pub key: String,
    pub size: u64,
    pub modified: Option<DateTime<Utc>>,
}

/// Cache adapter storing each key as `{root}/{key}.json`
#[derive(Debug, Clone)]
pub struct FileStoreAdapter {
    root: PathBuf,
    namespace: String,
    cache_version: String,
    readonly: bool,
    expiration: u64,
}

impl FileStoreAdapter {
    /// Validate (or create) the root directory and build the adapter.
    ///
    /// If `dir` names an existing regular file, its parent directory is used
    /// instead. Fails if no directory is configured, if it cannot be created,
    /// if it cannot be listed, or (unless `readonly`) if it is not writable.
    pub fn new(config: AdapterConfig) -> Result<Self, ConfigError> {
        let dir = config
            .dir
            .filter(|dir| !dir.as_os_str().is_empty())
            .ok_or(ConfigError::CacheDirMissing)?;

        let root = resolve_root(dir)?;

        if fs::read_dir(&root).is_err() {
            return Err(ConfigError::CacheDirNotReadable(root));
        }

        if !config.readonly && !is_writable(&root) {
            return Err(ConfigError::CacheDirNotWritable(root));
        }

        debug!(root = %root.display(), readonly = config.readonly, "cache directory ready");

        Ok(Self {
            root,
            namespace: config.namespace,
            cache_version: config.cache_version,
            readonly: config.readonly,
            expiration: config.cache_expiration,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn cache_version(&self) -> &str {
        &self.cache_version
    }

    pub fn is_readonly(&self) -> bool {
        self.readonly
    }

    /// Physical file backing `key`
    pub fn path_for(&self, key: &str) -> PathBuf {
        key_path(&self.root, key)
    }

    /// All stored keys, sorted
    pub fn keys(&self) -> Vec<String> {
        self.entries().into_iter().map(|entry| entry.key).collect()
    }

    /// All stored entries with size and modification time, sorted by key
    pub fn entries(&self) -> Vec<EntryInfo> {
        let mut entries: Vec<EntryInfo> = WalkDir::new(&self.root)
            .min_depth(1)
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
            .filter_map(|entry| {
                let relative = entry.path().strip_prefix(&self.root).ok()?;
                let key = path_key(relative)?;
                let metadata = entry.metadata().ok()?;
                Some(EntryInfo {
                    key,
                    size: metadata.len(),
                    modified: metadata.modified().ok().map(DateTime::<Utc>::from),
                })
            })
            .collect();

        entries.sort_by(|a, b| a.key.cmp(&b.key));
        entries
    }

    fn write_entry(&self, path: &Path, value: &Value) -> io::Result<()> {
        let parent = path.parent().unwrap_or(&self.root);
        if !parent.is_dir() {
            create_dir(parent)?;
        }

        let mut buffer = Vec::new();
        let mut serializer = Serializer::with_formatter(&mut buffer, PrettyFormatter::with_indent(INDENT));
        value.serialize(&mut serializer)?;
        buffer.push(b'\n');

        // Write beside the target and rename over it
        let mut temp = tempfile::NamedTempFile::new_in(parent)?;
        temp.write_all(&buffer)?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(temp.path(), fs::Permissions::from_mode(0o644))?;
        }
        temp.persist(path).map_err(|e| e.error)?;
        Ok(())
    }
}

impl CacheAdapter for FileStoreAdapter {
    fn has_item(&self, key: &str) -> bool {
        self.path_for(key).is_file()
    }

    fn get_item(&self, key: &str) -> Option<Value> {
        let path = self.path_for(key);
        if !path.is_file() {
            return None;
        }

        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) => {
                debug!(path = %path.display(), error = %e, "failed to read cache entry");
                return None;
            }
        };

        match serde_json::from_str::<Value>(&content) {
            Ok(Value::Null) => None,
            Ok(value) => Some(value),
            Err(e) => {
                debug!(path = %path.display(), error = %e, "cache entry is not valid JSON");
                None
            }
        }
    }

    fn set_item(&self, key: &str, value: &Value) -> bool {
        let path = self.path_for(key);
        trace!(path = %path.display(), "writing cache entry");
        match self.write_entry(&path, value) {
            Ok(()) => true,
            Err(e) => {
                debug!(path = %path.display(), error = %e, "failed to write cache entry");
                false
            }
        }
    }

    fn remove_item(&self, key: &str) -> bool {
        let path = self.path_for(key);
        trace!(path = %path.display(), "removing cache entry");
        fs::remove_file(&path).is_ok()
    }

    fn flush(&self) -> bool {
        debug!(root = %self.root.display(), "flushing cache directory");
        match fs::remove_dir_all(&self.root) {
            Ok(()) => true,
            Err(e) => {
                debug!(root = %self.root.display(), error = %e, "failed to flush cache directory");
                false
            }
        }
    }

    fn set_expiration(&mut self, seconds: u64) {
        self.expiration = seconds;
    }

    fn expiration(&self) -> u64 {
        self.expiration
    }
}

/// Resolve the configured path to a directory, creating it if needed
fn resolve_root(dir: PathBuf) -> Result<PathBuf, ConfigError> {
    let root = if dir.is_file() {
        let parent = match dir.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        debug!(file = %dir.display(), root = %parent.display(), "cache dir points at a file, using its parent");
        parent
    } else {
        dir
    };

    if !root.is_dir() {
        debug!(root = %root.display(), "creating cache directory");
        create_dir(&root).map_err(|source| ConfigError::CacheDirNotCreatable {
            path: root.clone(),
            source,
        })?;
    }

    Ok(root)
}

fn create_dir(path: &Path) -> io::Result<()> {
    let mut builder = fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(0o777);
    }
    builder.create(path)
}

fn is_writable(dir: &Path) -> bool {
    tempfile::Builder::new()
        .prefix(".write-probe")
        .tempfile_in(dir)
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    fn adapter_in(dir: &Path) -> FileStoreAdapter {
        FileStoreAdapter::new(AdapterConfig::with_dir(dir)).unwrap()
    }

    #[test]
    fn test_round_trip() {
        let temp = tempdir().unwrap();
        let adapter = adapter_in(temp.path());

        let value = json!({"browser": "Firefox", "version": 115, "tags": ["a", "b"]});
        assert!(adapter.set_item("browser", &value));
        assert_eq!(adapter.get_item("browser"), Some(value));
    }

    #[test]
    fn test_overwrite() {
        let temp = tempdir().unwrap();
        let adapter = adapter_in(temp.path());

        assert!(adapter.set_item("k", &json!(1)));
        assert!(adapter.set_item("k", &json!(2)));
        assert_eq!(adapter.get_item("k"), Some(json!(2)));
    }

    #[test]
    fn test_get_missing() {
        let temp = tempdir().unwrap();
        let adapter = adapter_in(temp.path());
        assert_eq!(adapter.get_item("missing"), None);
    }

    #[test]
    fn test_null_reads_as_missing() {
        let temp = tempdir().unwrap();
        let adapter = adapter_in(temp.path());

        assert!(adapter.set_item("nothing", &Value::Null));
        assert!(adapter.has_item("nothing"));
        assert_eq!(adapter.get_item("nothing"), None);
    }

    #[test]
    fn test_false_is_not_missing() {
        let temp = tempdir().unwrap();
        let adapter = adapter_in(temp.path());

        assert!(adapter.set_item("flag", &json!(false)));
        assert_eq!(adapter.get_item("flag"), Some(json!(false)));
    }

    #[test]
    fn test_invalid_json_reads_as_missing() {
        let temp = tempdir().unwrap();
        let adapter = adapter_in(temp.path());

        fs::write(temp.path().join("broken.json"), "{\"content\": ").unwrap();
        assert!(adapter.has_item("broken"));
        assert_eq!(adapter.get_item("broken"), None);
    }

    #[test]
    fn test_file_format() {
        let temp = tempdir().unwrap();
        let adapter = adapter_in(temp.path());

        let value = json!({"url": "http://browscap.org/stream", "name": "Bücher"});
        assert!(adapter.set_item("doc", &value));

        let raw = fs::read_to_string(temp.path().join("doc.json")).unwrap();
        assert!(raw.ends_with("}\n"));
        assert!(raw.contains("http://browscap.org/stream"));
        assert!(raw.contains("Bücher"));
        assert!(raw.contains("\n    \"name\""));
    }

    #[test]
    fn test_has_and_remove() {
        let temp = tempdir().unwrap();
        let adapter = adapter_in(temp.path());

        assert!(!adapter.remove_item("k"));
        assert!(!adapter.has_item("k"));

        assert!(adapter.set_item("k", &json!("v")));
        assert!(adapter.has_item("k"));

        assert!(adapter.remove_item("k"));
        assert!(!adapter.has_item("k"));
        assert!(!adapter.remove_item("k"));
    }

    #[test]
    fn test_flush_removes_root() {
        let temp = tempdir().unwrap();
        let root = temp.path().join("cache");
        let adapter = adapter_in(&root);

        let keys = ["a", "b", "browscap.version"];
        for key in keys {
            assert!(adapter.set_item(key, &json!(key)));
        }

        assert!(adapter.flush());
        assert!(!root.exists());
        for key in keys {
            assert!(!adapter.has_item(key));
        }
    }

    #[test]
    fn test_write_after_flush_recreates_root() {
        let temp = tempdir().unwrap();
        let root = temp.path().join("cache");
        let adapter = adapter_in(&root);

        assert!(adapter.flush());
        assert!(adapter.set_item("k", &json!(1)));
        assert_eq!(adapter.get_item("k"), Some(json!(1)));
    }

    #[test]
    fn test_flush_missing_root_fails() {
        let temp = tempdir().unwrap();
        let root = temp.path().join("cache");
        let adapter = adapter_in(&root);

        assert!(adapter.flush());
        assert!(!adapter.flush());
    }

    #[test]
    fn test_missing_dir() {
        let err = FileStoreAdapter::new(AdapterConfig::default()).unwrap_err();
        assert!(matches!(err, ConfigError::CacheDirMissing));

        let err = FileStoreAdapter::new(AdapterConfig::with_dir("")).unwrap_err();
        assert!(matches!(err, ConfigError::CacheDirMissing));
    }

    #[test]
    fn test_creates_missing_dir() {
        let temp = tempdir().unwrap();
        let root = temp.path().join("a").join("b").join("cache");

        let adapter = adapter_in(&root);
        assert!(root.is_dir());
        assert_eq!(adapter.root(), root.as_path());
    }

    #[test]
    fn test_file_path_uses_parent() {
        let temp = tempdir().unwrap();
        let file = temp.path().join("browscap.ini");
        fs::write(&file, "[GJK_Browscap_Version]").unwrap();

        let adapter = adapter_in(&file);
        assert_eq!(adapter.root(), temp.path());
    }

    #[test]
    fn test_uncreatable_dir() {
        let temp = tempdir().unwrap();
        let blocker = temp.path().join("blocker");
        fs::write(&blocker, "x").unwrap();

        let err = FileStoreAdapter::new(AdapterConfig::with_dir(blocker.join("cache"))).unwrap_err();
        assert_eq!(err.code(), "CACHE_DIR_NOT_CREATABLE");
    }

    #[cfg(unix)]
    #[test]
    fn test_unreadable_dir() {
        use std::os::unix::fs::PermissionsExt;

        let temp = tempdir().unwrap();
        let root = temp.path().join("locked");
        fs::create_dir(&root).unwrap();
        fs::set_permissions(&root, fs::Permissions::from_mode(0o000)).unwrap();

        // Privileged users can still list the directory
        if fs::read_dir(&root).is_ok() {
            fs::set_permissions(&root, fs::Permissions::from_mode(0o755)).unwrap();
            return;
        }

        let result = FileStoreAdapter::new(AdapterConfig::with_dir(&root));
        fs::set_permissions(&root, fs::Permissions::from_mode(0o755)).unwrap();

        let err = result.unwrap_err();
        assert!(matches!(err, ConfigError::CacheDirNotReadable(_)));
    }

    #[cfg(unix)]
    #[test]
    fn test_unwritable_dir_allowed_when_readonly() {
        use std::os::unix::fs::PermissionsExt;

        let temp = tempdir().unwrap();
        let root = temp.path().join("ro");
        fs::create_dir(&root).unwrap();
        fs::set_permissions(&root, fs::Permissions::from_mode(0o555)).unwrap();

        let writable = is_writable(&root);
        let strict = FileStoreAdapter::new(AdapterConfig::with_dir(&root));
        let relaxed = FileStoreAdapter::new(AdapterConfig {
            readonly: true,
            ..AdapterConfig::with_dir(&root)
        });
        fs::set_permissions(&root, fs::Permissions::from_mode(0o755)).unwrap();

        assert!(relaxed.is_ok());
        if !writable {
            let err = strict.unwrap_err();
            assert!(matches!(err, ConfigError::CacheDirNotWritable(_)));
        }
    }

    #[test]
    fn test_expiration_from_config() {
        let temp = tempdir().unwrap();
        let mut adapter = FileStoreAdapter::new(AdapterConfig {
            cache_expiration: 3600,
            ..AdapterConfig::with_dir(temp.path())
        })
        .unwrap();

        assert_eq!(adapter.expiration(), 3600);
        adapter.set_expiration(60);
        assert_eq!(adapter.expiration(), 60);
    }

    #[test]
    fn test_entries_sorted_and_filtered() {
        let temp = tempdir().unwrap();
        let adapter = adapter_in(temp.path());

        assert!(adapter.set_item("b.1", &json!(1)));
        assert!(adapter.set_item("a", &json!({"x": 1})));
        fs::write(temp.path().join("readme.txt"), "ignored").unwrap();

        assert_eq!(adapter.keys(), vec!["a".to_string(), "b.1".to_string()]);

        let entries = adapter.entries();
        assert!(entries.iter().all(|e| e.size > 0 && e.modified.is_some()));
    }
}
