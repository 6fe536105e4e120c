//! engine::events
//!
//! Typed updater events and the sink that consumes them.
//!
//! # Design
//!
//! Everything observable about a check is surfaced as an [`UpdaterEvent`]
//! pushed into an [`EventSink`]. The engine emits the events about the
//! cycle itself (`CheckCompleted`, `UpdateDetectedWithoutAlert`,
//! `CheckFailed`); the presentation layer emits the events about the user
//! (`DialogShown`, `StoreLaunched`, `VersionSkipped`, `DialogDismissed`).
//!
//! Host applications implement `EventSink` to feed analytics or their own
//! UI; [`NullSink`] drops everything and is the default.

use std::sync::{Arc, Mutex};

use serde_json::Value;

use crate::policy::AlertPolicy;
use crate::version::SemanticVersion;

/// Something observable happened during or after a check cycle.
#[derive(Debug, Clone, PartialEq)]
pub enum UpdaterEvent {
    /// An update prompt was presented to the user.
    DialogShown {
        /// Alert style of the prompt.
        policy: AlertPolicy,
    },

    /// The user chose to update and the store page was opened.
    StoreLaunched,

    /// The user chose to skip a version.
    VersionSkipped {
        /// The version that will not be prompted about again.
        version: SemanticVersion,
    },

    /// The user dismissed the prompt without updating.
    DialogDismissed,

    /// A check cycle failed.
    CheckFailed {
        /// Human-readable description of the failure.
        message: String,
    },

    /// An update exists but its policy is silent; no prompt was shown.
    UpdateDetectedWithoutAlert {
        /// Message the host may surface in its own UI.
        message: String,
    },

    /// The remote payload was fetched and decoded.
    CheckCompleted {
        /// Raw payload echo for hosts that read more than the version
        /// fields.
        payload: Value,
    },
}

/// Consumer of updater events.
///
/// Implementations must be thread-safe (Send + Sync) and must not block;
/// the engine emits events inline during the check cycle.
pub trait EventSink: Send + Sync {
    /// Consume one event.
    fn emit(&self, event: UpdaterEvent);
}

/// Sink that drops every event. The default.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl EventSink for NullSink {
    fn emit(&self, _event: UpdaterEvent) {}
}

/// Sink that echoes events to the debug log.
///
/// Wired up by the CLI so `--debug` shows the event stream.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl EventSink for LogSink {
    fn emit(&self, event: UpdaterEvent) {
        log::debug!("event: {:?}", event);
    }
}

/// Sink that records events for test assertions.
///
/// Clones share the recording.
#[derive(Debug, Default, Clone)]
pub struct RecordingSink {
    events: Arc<Mutex<Vec<UpdaterEvent>>>,
}

impl RecordingSink {
    /// An empty recording sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// All events emitted so far.
    pub fn events(&self) -> Vec<UpdaterEvent> {
        self.events.lock().unwrap().clone()
    }
}

impl EventSink for RecordingSink {
    fn emit(&self, event: UpdaterEvent) {
        self.events.lock().unwrap().push(event);
    }
}
