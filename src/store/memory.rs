//! store::memory
//!
//! In-memory state storage for tests.
//!
//! # Design
//!
//! Clones share state through an `Arc<Mutex<...>>`, mirroring how the mock
//! fetcher shares its queue, so a test can hand the store to the engine and
//! keep a handle for assertions. Write failures can be injected to exercise
//! the engine's store-error path.

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};

use super::traits::{PersistedState, StateStore, StoreError};
use crate::version::SemanticVersion;

/// In-memory state store for tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryStateStore {
    inner: Arc<Mutex<MemoryInner>>,
}

#[derive(Debug, Default)]
struct MemoryInner {
    state: PersistedState,
    fail_writes: bool,
}

impl MemoryStateStore {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// A store seeded with `state`.
    pub fn with_state(state: PersistedState) -> Self {
        let store = Self::new();
        store.inner.lock().unwrap().state = state;
        store
    }

    /// Make every subsequent write fail with a `WriteError`.
    pub fn fail_writes(&self, fail: bool) {
        self.inner.lock().unwrap().fail_writes = fail;
    }

    fn write<F>(&self, mutate: F) -> Result<(), StoreError>
    where
        F: FnOnce(&mut PersistedState),
    {
        let mut inner = self.inner.lock().unwrap();
        if inner.fail_writes {
            return Err(StoreError::WriteError("mock: write failure injected".into()));
        }
        mutate(&mut inner.state);
        Ok(())
    }
}

impl StateStore for MemoryStateStore {
    fn load(&self) -> Result<PersistedState, StoreError> {
        Ok(self.inner.lock().unwrap().state.clone())
    }

    fn set_last_check(&self, at: DateTime<Utc>) -> Result<(), StoreError> {
        self.write(|state| state.last_check = Some(at))
    }

    fn set_skipped_version(&self, version: &SemanticVersion) -> Result<(), StoreError> {
        self.write(|state| state.skipped_version = Some(version.clone()))
    }

    fn clear_skipped_version(&self) -> Result<(), StoreError> {
        self.write(|state| state.skipped_version = None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn starts_empty() {
        let store = MemoryStateStore::new();
        assert_eq!(store.load().unwrap(), PersistedState::default());
    }

    #[test]
    fn clones_share_state() {
        let store = MemoryStateStore::new();
        let handle = store.clone();

        let at = Utc.with_ymd_and_hms(2026, 8, 4, 12, 0, 0).unwrap();
        store.set_last_check(at).unwrap();

        assert_eq!(handle.last_check().unwrap(), Some(at));
    }

    #[test]
    fn seeded_state_is_visible() {
        let version = SemanticVersion::parse("1.2.1").unwrap();
        let store = MemoryStateStore::with_state(PersistedState {
            last_check: None,
            skipped_version: Some(version.clone()),
        });

        assert_eq!(store.skipped_version().unwrap(), Some(version));
    }

    #[test]
    fn injected_write_failure() {
        let store = MemoryStateStore::new();
        store.fail_writes(true);

        let at = Utc.with_ymd_and_hms(2026, 8, 4, 12, 0, 0).unwrap();
        let err = store.set_last_check(at).unwrap_err();
        assert!(matches!(err, StoreError::WriteError(_)));

        // Reads still work, and nothing was written.
        assert_eq!(store.load().unwrap(), PersistedState::default());
    }
}
