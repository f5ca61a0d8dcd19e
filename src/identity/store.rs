//! Key-value property stores for launcher state.
//!
//! # Responsibilities
//! - Read and write string properties addressed by `(env, key)`
//! - Persist them in a user-scoped TOML file (`FileStore`)
//! - Provide an in-memory fake with failure injection (`MemoryStore`)
//!
//! # File Layout
//! ```text
//! <config dir>/<namespace>/<filename>.toml
//!
//! [env.default]
//! cluster-id = "5b0c..."
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised by property stores.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("no user configuration directory available")]
    NoConfigDir,

    #[error("store I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("store file is not valid TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to serialize store: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// A string property store addressed by environment and key.
pub trait PropertyStore {
    /// Read a property. `Ok(None)` when it has never been written.
    fn read(&self, env: &str, key: &str) -> Result<Option<String>, StoreError>;

    /// Write (or overwrite) a property.
    fn write(&self, env: &str, key: &str, value: &str) -> Result<(), StoreError>;
}

#[derive(Debug, Default, Deserialize, Serialize)]
struct StoreFile {
    #[serde(default)]
    env: BTreeMap<String, BTreeMap<String, String>>,
}

/// Property store backed by a TOML file in the user configuration directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    /// Open `<user config dir>/<namespace>/<filename>.toml`, creating it if needed.
    pub fn open(namespace: &str, filename: &str) -> Result<Self, StoreError> {
        let root = dirs::config_dir().ok_or(StoreError::NoConfigDir)?;
        Self::open_in(&root, namespace, filename)
    }

    /// Open a store rooted at an explicit directory.
    pub fn open_in(root: &Path, namespace: &str, filename: &str) -> Result<Self, StoreError> {
        let dir = root.join(namespace);
        fs::create_dir_all(&dir)?;

        let path = dir.join(format!("{filename}.toml"));
        if !path.exists() {
            fs::write(&path, "")?;
            tracing::debug!(path = %path.display(), "Created property store");
        }

        let store = Self { path };
        // Surface a corrupt file at open time rather than on first read.
        store.load()?;
        Ok(store)
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<StoreFile, StoreError> {
        let content = fs::read_to_string(&self.path)?;
        Ok(toml::from_str(&content)?)
    }
}

impl PropertyStore for FileStore {
    fn read(&self, env: &str, key: &str) -> Result<Option<String>, StoreError> {
        let file = self.load()?;
        Ok(file.env.get(env).and_then(|props| props.get(key)).cloned())
    }

    fn write(&self, env: &str, key: &str, value: &str) -> Result<(), StoreError> {
        let mut file = self.load()?;
        file.env
            .entry(env.to_string())
            .or_default()
            .insert(key.to_string(), value.to_string());

        let content = toml::to_string_pretty(&file)?;
        let tmp = self.path.with_extension("toml.tmp");
        fs::write(&tmp, content)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

#[derive(Debug, Default)]
struct MemoryInner {
    values: BTreeMap<(String, String), String>,
    writes: usize,
    fail_reads: bool,
    fail_writes: bool,
}

/// In-memory property store. Clones share state.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<MemoryInner>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a property without counting it as a write.
    pub fn with_value(self, env: &str, key: &str, value: &str) -> Self {
        self.lock()
            .values
            .insert((env.to_string(), key.to_string()), value.to_string());
        self
    }

    /// Make every read fail.
    pub fn failing_reads(self) -> Self {
        self.lock().fail_reads = true;
        self
    }

    /// Make every write fail.
    pub fn failing_writes(self) -> Self {
        self.lock().fail_writes = true;
        self
    }

    /// Number of successful writes so far.
    pub fn writes(&self) -> usize {
        self.lock().writes
    }

    /// Current value, bypassing failure injection.
    pub fn get(&self, env: &str, key: &str) -> Option<String> {
        self.lock()
            .values
            .get(&(env.to_string(), key.to_string()))
            .cloned()
    }

    fn lock(&self) -> MutexGuard<'_, MemoryInner> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl PropertyStore for MemoryStore {
    fn read(&self, env: &str, key: &str) -> Result<Option<String>, StoreError> {
        let inner = self.lock();
        if inner.fail_reads {
            return Err(StoreError::Unavailable("read failure injected".into()));
        }
        Ok(inner.values.get(&(env.to_string(), key.to_string())).cloned())
    }

    fn write(&self, env: &str, key: &str, value: &str) -> Result<(), StoreError> {
        let mut inner = self.lock();
        if inner.fail_writes {
            return Err(StoreError::Unavailable("write failure injected".into()));
        }
        inner
            .values
            .insert((env.to_string(), key.to_string()), value.to_string());
        inner.writes += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_store_creates_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open_in(dir.path(), "temporalio", "version-info").unwrap();

        assert!(store.path().exists());
        assert_eq!(store.path(), dir.path().join("temporalio").join("version-info.toml"));
        assert_eq!(store.read("default", "cluster-id").unwrap(), None);
    }

    #[test]
    fn file_store_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open_in(dir.path(), "ns", "props").unwrap();
        store.write("default", "cluster-id", "abc").unwrap();
        store.write("staging", "cluster-id", "xyz").unwrap();

        let reopened = FileStore::open_in(dir.path(), "ns", "props").unwrap();
        assert_eq!(reopened.read("default", "cluster-id").unwrap().as_deref(), Some("abc"));
        assert_eq!(reopened.read("staging", "cluster-id").unwrap().as_deref(), Some("xyz"));
        assert_eq!(reopened.read("default", "other").unwrap(), None);
    }

    #[test]
    fn file_store_rejects_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("ns")).unwrap();
        std::fs::write(dir.path().join("ns").join("props.toml"), "env = 3 = 4").unwrap();

        let err = FileStore::open_in(dir.path(), "ns", "props").unwrap_err();
        assert!(matches!(err, StoreError::Parse(_)));
    }

    #[test]
    fn memory_store_counts_writes() {
        let store = MemoryStore::new().with_value("default", "k", "seed");
        assert_eq!(store.writes(), 0);
        assert_eq!(store.read("default", "k").unwrap().as_deref(), Some("seed"));

        store.write("default", "k", "new").unwrap();
        assert_eq!(store.writes(), 1);
        assert_eq!(store.get("default", "k").as_deref(), Some("new"));
    }

    #[test]
    fn memory_store_failure_injection() {
        let store = MemoryStore::new().failing_reads().failing_writes();
        assert!(store.read("default", "k").is_err());
        assert!(store.write("default", "k", "v").is_err());
        assert_eq!(store.writes(), 0);
    }
}
