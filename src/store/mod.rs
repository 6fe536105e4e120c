//! store
//!
//! Persisted check state.
//!
//! # Design
//!
//! The engine remembers exactly two things between check cycles: when the
//! last check completed and which version the user skipped. [`StateStore`]
//! is the seam that owns them; [`FileStateStore`] persists to a TOML file
//! with atomic writes and an OS-level lock, and [`MemoryStateStore`] backs
//! tests.

pub mod file_store;
pub mod memory;
pub mod traits;

pub use file_store::FileStateStore;
pub use memory::MemoryStateStore;
pub use traits::{PersistedState, StateStore, StoreError};
