use serde_json::{Map, Value};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::KeyValueStore;
use crate::error::StoreError;
use crate::lock::StoreLock;

const STORE_FILE: &str = "store.json";
const LOCK_FILE: &str = "store.lock";
const LOCK_TIMEOUT: Duration = Duration::from_secs(5);

/// A store persisted as a single JSON object file under a data directory.
///
/// The whole map is loaded on open. Every write rewrites the file through a
/// temp file and rename while holding the directory's exclusive lock.
#[derive(Debug)]
pub struct FileStore {
    dir: PathBuf,
    values: Map<String, Value>,
}

impl FileStore {
    /// Open (or lazily create) the store in `dir`.
    ///
    /// A missing file yields an empty store. An unreadable or corrupt file is
    /// also treated as empty; the first write replaces it.
    #[must_use]
    pub fn open(dir: &Path) -> Self {
        let path = dir.join(STORE_FILE);
        let values = match fs::read_to_string(&path) {
            Ok(content) => match serde_json::from_str::<Value>(&content) {
                Ok(Value::Object(map)) => map,
                Ok(_) => {
                    tracing::warn!(path = %path.display(), "store file is not a JSON object; starting empty");
                    Map::new()
                }
                Err(err) => {
                    tracing::warn!(path = %path.display(), error = %err, "store file is corrupt; starting empty");
                    Map::new()
                }
            },
            Err(err) if err.kind() == io::ErrorKind::NotFound => Map::new(),
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "store file is unreadable; starting empty");
                Map::new()
            }
        };

        tracing::debug!(dir = %dir.display(), keys = values.len(), "opened file store");
        Self {
            dir: dir.to_path_buf(),
            values,
        }
    }

    /// Path of the JSON file backing this store.
    #[must_use]
    pub fn path(&self) -> PathBuf {
        self.dir.join(STORE_FILE)
    }

    fn io_error(&self, source: io::Error) -> StoreError {
        StoreError::Io {
            path: self.path(),
            source,
        }
    }

    fn flush(&self) -> Result<(), StoreError> {
        fs::create_dir_all(&self.dir).map_err(|e| self.io_error(e))?;
        let _lock = StoreLock::acquire(&self.dir.join(LOCK_FILE), LOCK_TIMEOUT)?;

        let encoded = serde_json::to_vec_pretty(&self.values).map_err(|source| StoreError::Encode {
            name: STORE_FILE.to_string(),
            source,
        })?;

        let mut tmp = tempfile::NamedTempFile::new_in(&self.dir).map_err(|e| self.io_error(e))?;
        tmp.write_all(&encoded).map_err(|e| self.io_error(e))?;
        tmp.as_file().sync_all().map_err(|e| self.io_error(e))?;
        tmp.persist(self.path()).map_err(|e| self.io_error(e.error))?;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, name: &str) -> Option<Value> {
        self.values.get(name).cloned()
    }

    fn set(&mut self, name: &str, value: Value) -> Result<(), StoreError> {
        self.values.insert(name.to_string(), value);
        self.flush()
    }

    fn remove(&mut self, name: &str) -> Result<(), StoreError> {
        if self.values.remove(name).is_some() {
            self.flush()?;
        }
        Ok(())
    }

    fn keys(&self) -> Vec<String> {
        self.values.keys().cloned().collect()
    }
}
