//! Durable key-value storage used by the favorites store.
//!
//! `FileStore` keeps one file per key under a data directory; `MemoryStore`
//! is process-local and lets tests inject read/write failures.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;

use travelboard_core::error::PersistenceError;

/// String key-value storage.
pub trait KeyValueStore: Send + Sync {
    /// Read `key`; `Ok(None)` when nothing was stored under it.
    fn get(&self, key: &str) -> Result<Option<String>, PersistenceError>;

    /// Overwrite `key` with `value`.
    fn set(&self, key: &str, value: &str) -> Result<(), PersistenceError>;
}

/// Directory-backed store: each key lives in `<root>/<sanitized key>.json`.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// File backing `key`.
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(format!("{}.json", sanitize_key(key)))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        let path = self.path_for(key);
        match fs::read_to_string(&path) {
            Ok(data) => Ok(Some(data)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(PersistenceError::Read {
                key: key.to_string(),
                message: format!("{}: {err}", path.display()),
            }),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), PersistenceError> {
        let write_err = |message: String| PersistenceError::Write {
            key: key.to_string(),
            message,
        };
        fs::create_dir_all(&self.root)
            .map_err(|e| write_err(format!("create {}: {e}", self.root.display())))?;

        // Write to a sibling temp file first so readers never see a torn snapshot.
        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value).map_err(|e| write_err(format!("{}: {e}", tmp.display())))?;
        fs::rename(&tmp, &path).map_err(|e| write_err(format!("{}: {e}", path.display())))
    }
}

fn sanitize_key(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    for ch in key.chars() {
        if ch.is_ascii_alphanumeric() || ch == '-' || ch == '_' || ch == '.' {
            out.push(ch);
        } else {
            out.push('_');
        }
    }
    let trimmed = out.trim_matches(|c| c == '_' || c == '.');
    if trimmed.is_empty() {
        "store".to_string()
    } else {
        trimmed.to_string()
    }
}

/// In-memory store with optional failure injection.
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
    fail_reads: Mutex<bool>,
    fail_writes: Mutex<bool>,
    writes: Mutex<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate `key`.
    pub fn with_entry(self, key: &str, value: &str) -> Self {
        lock(&self.entries).insert(key.to_string(), value.to_string());
        self
    }

    /// Make every `get` fail.
    pub fn with_failing_reads(self) -> Self {
        *lock(&self.fail_reads) = true;
        self
    }

    /// Toggle write failures.
    pub fn set_fail_writes(&self, fail: bool) {
        *lock(&self.fail_writes) = fail;
    }

    /// Raw stored value, bypassing failure injection.
    pub fn raw(&self, key: &str) -> Option<String> {
        lock(&self.entries).get(key).cloned()
    }

    /// Number of successful writes.
    pub fn write_count(&self) -> usize {
        *lock(&self.writes)
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        if *lock(&self.fail_reads) {
            return Err(PersistenceError::Read {
                key: key.to_string(),
                message: "storage unavailable".into(),
            });
        }
        Ok(lock(&self.entries).get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), PersistenceError> {
        if *lock(&self.fail_writes) {
            return Err(PersistenceError::Write {
                key: key.to_string(),
                message: "quota exceeded".into(),
            });
        }
        lock(&self.entries).insert(key.to_string(), value.to_string());
        *lock(&self.writes) += 1;
        Ok(())
    }
}

pub(crate) fn lock<T>(m: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    match m.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}
