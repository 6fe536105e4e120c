//! store::file_store
//!
//! File-based state storage.
//!
//! # Design
//!
//! - State lives in a TOML file, by default at
//!   `<user data dir>/nudge/state.toml`
//! - All writes are atomic (write to temp file, sync, then rename)
//! - Each read-modify-write holds an OS-level exclusive lock on a sibling
//!   `state.lock` file, so two processes cannot interleave partial updates
//!
//! # Example
//!
//! ```ignore
//! use nudge::store::{FileStateStore, StateStore};
//!
//! let store = FileStateStore::new()?;
//! store.set_last_check(chrono::Utc::now())?;
//! ```

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::PathBuf;

use fs2::FileExt;

use super::traits::{PersistedState, StateStore, StoreError};

/// File-based state storage.
///
/// This is the default store wired up by the CLI. Dropping the lock handle
/// releases the OS lock even if an operation panics.
#[derive(Debug)]
pub struct FileStateStore {
    /// Path to the state file.
    path: PathBuf,
}

impl FileStateStore {
    /// Create a store at the default location,
    /// `<user data dir>/nudge/state.toml`.
    ///
    /// # Errors
    ///
    /// Returns an error if the user data directory cannot be determined.
    pub fn new() -> Result<Self, StoreError> {
        let base = dirs::data_dir()
            .ok_or_else(|| StoreError::ReadError("cannot determine user data directory".into()))?;
        Ok(Self {
            path: base.join("nudge").join("state.toml"),
        })
    }

    /// Create a store at a custom path. Primarily useful for testing.
    pub fn with_path(path: PathBuf) -> Self {
        Self { path }
    }

    /// Path to the state file.
    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    /// Acquire the exclusive state lock.
    ///
    /// Non-blocking: if another process holds the lock, fails immediately
    /// with `Locked`. The lock is released when the returned handle drops.
    fn lock(&self) -> Result<File, StoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| StoreError::WriteError(format!("cannot create directory: {}", e)))?;
        }

        let lock_path = self.path.with_extension("lock");
        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&lock_path)
            .map_err(|e| StoreError::WriteError(format!("cannot open lock file: {}", e)))?;

        file.try_lock_exclusive().map_err(|_| StoreError::Locked)?;
        Ok(file)
    }

    /// Read the state file without locking.
    fn read_state(&self) -> Result<PersistedState, StoreError> {
        if !self.path.exists() {
            return Ok(PersistedState::default());
        }

        let content = fs::read_to_string(&self.path)
            .map_err(|e| StoreError::ReadError(format!("cannot read state file: {}", e)))?;

        toml::from_str(&content)
            .map_err(|e| StoreError::ReadError(format!("cannot parse state file: {}", e)))
    }

    /// Write the state file atomically.
    fn write_state(&self, state: &PersistedState) -> Result<(), StoreError> {
        let content = toml::to_string(state)
            .map_err(|e| StoreError::WriteError(format!("cannot serialize state: {}", e)))?;

        let temp_path = self.path.with_extension("tmp");
        {
            let mut file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(&temp_path)
                .map_err(|e| StoreError::WriteError(format!("cannot create temp file: {}", e)))?;

            file.write_all(content.as_bytes())
                .map_err(|e| StoreError::WriteError(format!("cannot write state: {}", e)))?;

            file.sync_all()
                .map_err(|e| StoreError::WriteError(format!("cannot sync to disk: {}", e)))?;
        }

        fs::rename(&temp_path, &self.path)
            .map_err(|e| StoreError::WriteError(format!("cannot rename temp file: {}", e)))?;

        Ok(())
    }

    /// Locked read-modify-write of the state file.
    fn update<F>(&self, mutate: F) -> Result<(), StoreError>
    where
        F: FnOnce(&mut PersistedState),
    {
        let _lock = self.lock()?;
        let mut state = self.read_state()?;
        mutate(&mut state);
        self.write_state(&state)
    }
}

impl StateStore for FileStateStore {
    fn load(&self) -> Result<PersistedState, StoreError> {
        self.read_state()
    }

    fn set_last_check(&self, at: chrono::DateTime<chrono::Utc>) -> Result<(), StoreError> {
        self.update(|state| state.last_check = Some(at))
    }

    fn set_skipped_version(
        &self,
        version: &crate::version::SemanticVersion,
    ) -> Result<(), StoreError> {
        self.update(|state| state.skipped_version = Some(version.clone()))
    }

    fn clear_skipped_version(&self) -> Result<(), StoreError> {
        self.update(|state| state.skipped_version = None)
    }
}
