use crate::error::ErrorCode;
use fs2::FileExt;
use std::{
    fs::{self, File, OpenOptions},
    io,
    path::{Path, PathBuf},
    thread,
    time::{Duration, Instant},
};

const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Failure to take the store's write lock.
#[derive(Debug, thiserror::Error)]
pub enum LockError {
    /// Another holder kept the lock past the timeout.
    #[error("store lock at {} still held after {waited:?}", path.display())]
    Timeout { path: PathBuf, waited: Duration },

    #[error("cannot open store lock: {0}")]
    Io(#[from] io::Error),
}

impl LockError {
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::Timeout { .. } => ErrorCode::LockContention,
            Self::Io(_) => ErrorCode::StoreWriteFailed,
        }
    }
}

/// Exclusive lock held while `store.json` is rewritten; unlocked on drop.
///
/// Only individual writes are serialized. Two processes that both load,
/// mutate and save still race and the last save wins.
#[derive(Debug)]
pub struct StoreLock {
    file: File,
    path: PathBuf,
}

impl StoreLock {
    /// Take the lock on `path`, creating it and its directory if needed,
    /// retrying until `timeout` has passed.
    pub fn acquire(path: &Path, timeout: Duration) -> Result<Self, LockError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new()
            .create(true)
            .read(true)
            .write(true)
            .truncate(false)
            .open(path)?;

        let start = Instant::now();
        while file.try_lock_exclusive().is_err() {
            let waited = start.elapsed();
            if waited >= timeout {
                return Err(LockError::Timeout {
                    path: path.to_path_buf(),
                    waited,
                });
            }
            thread::sleep(POLL_INTERVAL);
        }

        Ok(Self {
            file,
            path: path.to_path_buf(),
        })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for StoreLock {
    fn drop(&mut self) {
        if let Err(err) = self.file.unlock() {
            tracing::warn!(path = %self.path.display(), error = %err, "failed to unlock store");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{LockError, StoreLock};
    use crate::error::{ErrorCode, StoreError};
    use std::time::Duration;
    use tempfile::TempDir;

    #[test]
    fn creates_missing_directory() -> Result<(), LockError> {
        let dir = TempDir::new()?;
        let path = dir.path().join("nested/store.lock");
        let lock = StoreLock::acquire(&path, Duration::from_millis(50))?;
        assert_eq!(lock.path(), path.as_path());
        assert!(path.exists());
        Ok(())
    }

    #[test]
    fn second_holder_times_out() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("store.lock");
        let _held = StoreLock::acquire(&path, Duration::from_millis(50)).unwrap();

        let err = StoreLock::acquire(&path, Duration::from_millis(20)).unwrap_err();
        assert!(matches!(&err, LockError::Timeout { path: p, waited } if *p == path && *waited >= Duration::from_millis(20)));
        assert_eq!(err.code(), ErrorCode::LockContention);
        assert!(err.to_string().starts_with("store lock at "));
        assert!(err.to_string().contains("still held after"));
    }

    #[test]
    fn dropping_the_guard_frees_the_lock() -> Result<(), LockError> {
        let dir = TempDir::new()?;
        let path = dir.path().join("store.lock");
        drop(StoreLock::acquire(&path, Duration::from_millis(50))?);
        let _again = StoreLock::acquire(&path, Duration::from_millis(50))?;
        Ok(())
    }

    #[test]
    fn io_failure_reports_a_write_code_through_store_error() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only");
        let err = LockError::from(io);
        assert_eq!(err.code(), ErrorCode::StoreWriteFailed);
        assert_eq!(err.to_string(), "cannot open store lock: read-only");

        let store: StoreError = err.into();
        assert_eq!(store.code(), ErrorCode::StoreWriteFailed);
        assert!(store.to_string().starts_with("lock error: cannot open store lock"));
    }
}
