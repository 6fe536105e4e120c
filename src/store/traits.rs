//! store::traits
//!
//! State storage trait definition.
//!
//! # Design
//!
//! The `StateStore` trait is the persistence seam for the two values the
//! engine remembers between check cycles: the last-check timestamp and the
//! version the user chose to skip. The engine reads the state once at cycle
//! start and writes at most once at cycle end; it never caches state across
//! cycles.
//!
//! # Example
//!
//! ```
//! use chrono::Utc;
//! use nudge::store::{MemoryStateStore, StateStore};
//!
//! let store = MemoryStateStore::new();
//! assert!(store.load().unwrap().last_check.is_none());
//!
//! store.set_last_check(Utc::now()).unwrap();
//! assert!(store.load().unwrap().last_check.is_some());
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::version::SemanticVersion;

/// Errors from state storage operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Failed to read or parse the stored state.
    #[error("failed to read state: {0}")]
    ReadError(String),

    /// Failed to write the state.
    #[error("failed to write state: {0}")]
    WriteError(String),

    /// Another process holds the state lock.
    #[error("state file is locked by another process")]
    Locked,
}

/// The values remembered between check cycles.
///
/// Owned exclusively by the store; the engine reads it once per cycle and
/// never holds it longer than that.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersistedState {
    /// When the last completed check ran.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_check: Option<DateTime<Utc>>,

    /// Version the user declined to be re-prompted about.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skipped_version: Option<SemanticVersion>,
}

/// Trait for state storage providers.
///
/// Implementations must be thread-safe (Send + Sync). Each setter is an
/// independent read-modify-write of the underlying state; the granular
/// getters are derived from [`load`].
///
/// [`load`]: StateStore::load
pub trait StateStore: Send + Sync {
    /// Read the full persisted state.
    ///
    /// A store that has never been written returns the default (empty)
    /// state rather than an error.
    fn load(&self) -> Result<PersistedState, StoreError>;

    /// Record when a check completed.
    fn set_last_check(&self, at: DateTime<Utc>) -> Result<(), StoreError>;

    /// Record the version the user chose to skip.
    ///
    /// Overwrites any previously skipped version.
    fn set_skipped_version(&self, version: &SemanticVersion) -> Result<(), StoreError>;

    /// Forget the skipped version.
    ///
    /// Returns `Ok(())` even if no version was skipped, making the
    /// operation idempotent.
    fn clear_skipped_version(&self) -> Result<(), StoreError>;

    /// The last-check timestamp, if any.
    fn last_check(&self) -> Result<Option<DateTime<Utc>>, StoreError> {
        Ok(self.load()?.last_check)
    }

    /// The skipped version, if any.
    fn skipped_version(&self) -> Result<Option<SemanticVersion>, StoreError> {
        Ok(self.load()?.skipped_version)
    }
}
