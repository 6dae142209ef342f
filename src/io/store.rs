use std::collections::HashMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use tempfile::NamedTempFile;

use crate::model::task::Task;
use crate::ops::task_ops::{self, IdGenerator};

/// Key under which the whole task list is stored
pub const STORAGE_KEY: &str = "TODO_LIST";

/// Error type for store operations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("could not read {path}: {source}")]
    Read {
        path: PathBuf,
        source: io::Error,
    },
    #[error("could not write {path}: {source}")]
    Write {
        path: PathBuf,
        source: io::Error,
    },
    #[error("stored value for {key} is not a valid task list: {source}")]
    Corrupt {
        key: String,
        /// The unparseable blob, kept so it can be set aside
        raw: String,
        source: serde_json::Error,
    },
    #[error("could not serialize task list: {0}")]
    Serialize(#[from] serde_json::Error),
}

// ---------------------------------------------------------------------------
// Key-value backends
// ---------------------------------------------------------------------------

/// A durable string-to-string medium. Knows nothing about tasks.
pub trait KeyValueStore: Send {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// One file per key: `<dir>/<key>.json`
#[derive(Debug, Clone)]
pub struct FileKv {
    dir: PathBuf,
}

impl FileKv {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        FileKv { dir: dir.into() }
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl KeyValueStore for FileKv {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let path = self.path_for(key);
        match fs::read_to_string(&path) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StoreError::Read { path, source: e }),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        let path = self.path_for(key);
        fs::create_dir_all(&self.dir)
            .and_then(|()| atomic_write(&path, value.as_bytes()))
            .map_err(|e| StoreError::Write { path, source: e })
    }
}

/// In-memory backend. Clones share the same entries, so a test can keep a
/// handle while another copy is owned by the saver thread.
#[derive(Debug, Clone, Default)]
pub struct MemoryKv {
    entries: Arc<Mutex<HashMap<String, String>>>,
    fail_writes: bool,
}

impl MemoryKv {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose every `set` fails
    pub fn failing() -> Self {
        MemoryKv {
            fail_writes: true,
            ..Self::default()
        }
    }

    pub fn keys(&self) -> Vec<String> {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        let mut keys: Vec<String> = entries.keys().cloned().collect();
        keys.sort();
        keys
    }
}

impl KeyValueStore for MemoryKv {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        if self.fail_writes {
            return Err(StoreError::Write {
                path: PathBuf::from(format!("memory:{}", key)),
                source: io::Error::other("writes disabled"),
            });
        }
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Write `content` to `path` atomically using a temp file + rename.
pub fn atomic_write(path: &Path, content: &[u8]) -> io::Result<()> {
    let dir = path.parent().unwrap_or(Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content)?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Task store
// ---------------------------------------------------------------------------

/// The persisted task list: a JSON array stored under [`STORAGE_KEY`].
#[derive(Debug)]
pub struct TaskStore<K> {
    kv: K,
}

impl<K: KeyValueStore> TaskStore<K> {
    pub fn new(kv: K) -> Self {
        TaskStore { kv }
    }

    pub fn kv(&self) -> &K {
        &self.kv
    }

    /// Read the stored list. A missing or blank value is an empty list.
    /// Repeated ids are reissued so every id is unique once loaded.
    pub fn load(&self) -> Result<Vec<Task>, StoreError> {
        let raw = match self.kv.get(STORAGE_KEY)? {
            Some(raw) if !raw.trim().is_empty() => raw,
            _ => return Ok(Vec::new()),
        };
        let tasks: Vec<Task> =
            serde_json::from_str(&raw).map_err(|source| StoreError::Corrupt {
                key: STORAGE_KEY.to_string(),
                raw,
                source,
            })?;
        let unique = task_ops::dedupe_ids(&tasks, &mut IdGenerator::new());
        if unique != tasks {
            tracing::warn!("stored task list had duplicate ids; reissued them");
        }
        Ok(unique)
    }

    /// Load for reading only. Failures degrade to an empty list and are
    /// logged; a corrupt blob is left where it is.
    pub fn load_readonly(&self) -> Vec<Task> {
        self.load().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "could not load tasks, showing an empty list");
            Vec::new()
        })
    }

    /// Load, degrading every failure to an empty list.
    ///
    /// A corrupt blob is copied to `TODO_LIST.corrupt-<timestamp>` first, so
    /// the next save doesn't destroy the only copy.
    pub fn load_or_empty(&mut self) -> Vec<Task> {
        match self.load() {
            Ok(tasks) => {
                tracing::info!(count = tasks.len(), "loaded tasks");
                tasks
            }
            Err(StoreError::Corrupt { key, raw, source }) => {
                let aside = format!(
                    "{}.corrupt-{}",
                    key,
                    chrono::Utc::now().format("%Y%m%dT%H%M%S")
                );
                tracing::warn!(error = %source, "stored task list is corrupt, starting empty");
                match self.kv.set(&aside, &raw) {
                    Ok(()) => tracing::warn!(key = %aside, "corrupt task list preserved"),
                    Err(e) => tracing::warn!(error = %e, "could not preserve corrupt task list"),
                }
                Vec::new()
            }
            Err(e) => {
                tracing::warn!(error = %e, "could not load tasks, starting empty");
                Vec::new()
            }
        }
    }

    /// Serialize the whole list and overwrite the stored value
    pub fn save(&mut self, tasks: &[Task]) -> Result<(), StoreError> {
        let json = serde_json::to_string(tasks)?;
        self.kv.set(STORAGE_KEY, &json)
    }
}
