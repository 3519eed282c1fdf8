//! Durable JSON storage over a pluggable byte-level backend.
//!
//! Keys are `/`-separated segments chosen by the caller; the backend owns
//! their mapping to physical locations. The default backend keeps one
//! `<key>.json` file per key under a root directory.

use crate::error::Result;
use serde::{de::DeserializeOwned, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::warn;

/// Byte-level storage port behind the typed store.
pub trait StorageBackend: Send + Sync {
    /// Raw bytes stored under `key`, or `None` if the key is absent.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Store `bytes` under `key`, creating missing intermediate locations.
    fn put(&self, key: &str, bytes: &[u8]) -> Result<()>;

    /// Names of keys directly under `prefix`, with the prefix stripped,
    /// sorted. An unknown prefix yields an empty list.
    fn list(&self, prefix: &str) -> Result<Vec<String>>;

    /// Make the namespace under `prefix` exist, so it shows up as empty
    /// rather than unknown. Idempotent.
    fn ensure_prefix(&self, prefix: &str) -> Result<()>;
}

/// Backend mapping each key to `<root>/<key>.json`.
pub struct FsBackend {
    root: PathBuf,
}

impl FsBackend {
    /// Open a backend rooted at `root`, creating the directory if needed.
    pub fn new(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    fn file_path(&self, key: &str) -> PathBuf {
        self.root.join(format!("{}.json", key))
    }
}

impl StorageBackend for FsBackend {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        match fs::read(self.file_path(key)) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn put(&self, key: &str, bytes: &[u8]) -> Result<()> {
        let path = self.file_path(key);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        // write-then-rename, so a concurrent reader only ever sees a whole
        // file, never a truncated one
        let tmp = self.root.join(format!("{}.json.tmp", key));
        fs::write(&tmp, bytes)?;
        fs::rename(&tmp, path)?;
        Ok(())
    }

    fn list(&self, prefix: &str) -> Result<Vec<String>> {
        let mut names = Vec::new();
        let entries = match fs::read_dir(self.root.join(prefix)) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(names),
            Err(e) => return Err(e.into()),
        };
        for entry in entries {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().into_owned();
            if let Some(stem) = name.strip_suffix(".json") {
                names.push(stem.to_string());
            }
        }
        names.sort();
        Ok(names)
    }

    fn ensure_prefix(&self, prefix: &str) -> Result<()> {
        fs::create_dir_all(self.root.join(prefix))?;
        Ok(())
    }
}

/// Typed JSON view over a backend.
///
/// Read-path failures (missing key, empty value, corrupt JSON, I/O error)
/// degrade to the caller's fallback; write-path failures surface as errors.
#[derive(Clone)]
pub struct FileStore {
    backend: Arc<dyn StorageBackend>,
}

impl FileStore {
    pub fn new(backend: Arc<dyn StorageBackend>) -> Self {
        Self { backend }
    }

    /// The value stored under `key`, or `fallback` when nothing usable is
    /// there.
    pub fn read<T: DeserializeOwned>(&self, key: &str, fallback: T) -> T {
        let bytes = match self.backend.get(key) {
            Ok(Some(bytes)) if !bytes.is_empty() => bytes,
            Ok(_) => return fallback,
            Err(e) => {
                warn!(key, error = %e, "storage read failed, using fallback");
                return fallback;
            }
        };
        match serde_json::from_slice(&bytes) {
            Ok(value) => value,
            Err(e) => {
                warn!(key, error = %e, "corrupt record store, using fallback");
                fallback
            }
        }
    }

    /// Persist `value` under `key` as pretty-printed JSON.
    pub fn write<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(value)?;
        self.backend.put(key, &bytes)
    }

    pub fn list(&self, prefix: &str) -> Result<Vec<String>> {
        self.backend.list(prefix)
    }

    pub fn ensure_prefix(&self, prefix: &str) -> Result<()> {
        self.backend.ensure_prefix(prefix)
    }
}
