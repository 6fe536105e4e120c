//! engine
//!
//! Orchestrates the check cycle: Due -> Fetch -> Decode -> Evaluate -> Decide.
//!
//! # Architecture
//!
//! [`UpdateChecker`] is the central coordinator. It owns no platform
//! behavior itself; the network, persistence, clock, and event consumers
//! are injected collaborators, so every stage can be driven by test
//! doubles.
//!
//! One invocation of [`run_check`] is one check cycle:
//!
//! 1. **Due**: consult the scheduler with the persisted last-check
//!    timestamp; if the configured frequency says the check is not due,
//!    finish without touching the network.
//! 2. **Fetch**: call the remote configuration endpoint through the
//!    injected fetcher.
//! 3. **Decode**: typed decode of the payload; structural problems fail
//!    the cycle explicitly.
//! 4. **Evaluate**: classify the version delta and map it to an alert
//!    policy, force-upgrade version first.
//! 5. **Decide**: honor the persisted skipped version, persist the
//!    timestamp, and emit exactly one terminal [`CheckOutcome`].
//!
//! # Invariants
//!
//! - At most one cycle runs per checker instance; a concurrent invocation
//!   is rejected with [`CheckError::AlreadyInProgress`], never queued.
//! - Persisted state is read once at cycle start and written at most once
//!   at cycle end. A failed cycle persists nothing.
//! - Every invocation produces exactly one terminal value: the `Ok`
//!   outcome or the `Err` kind.
//!
//! [`run_check`]: UpdateChecker::run_check

pub mod events;

pub use events::{EventSink, LogSink, NullSink, RecordingSink, UpdaterEvent};

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use thiserror::Error;

use crate::clock::{Clock, SystemClock};
use crate::config::{ConfigError, UpdaterConfig};
use crate::policy::{self, AlertPolicy, TierPolicies};
use crate::remote::{
    self, ConfigFetcher, FetchError, FetchMethod, FetchRequest, PayloadError,
};
use crate::schedule;
use crate::store::{StateStore, StoreError};
use crate::version::{SemanticVersion, UpdateTier};

/// Terminal result of one successful check cycle.
#[derive(Debug, Clone, PartialEq)]
pub enum CheckOutcome {
    /// A newer version exists and the caller should surface it.
    UpdateRequired {
        /// Severity of the version delta.
        tier: UpdateTier,
        /// How the update should be surfaced.
        policy: AlertPolicy,
        /// The version the user would be updating to.
        target: SemanticVersion,
    },

    /// The remote publishes nothing newer than the installed version.
    NoUpdateAvailable,

    /// The available version is one the user previously skipped.
    VersionSkipped,

    /// The configured frequency says the check is not yet due; the network
    /// was not touched.
    CheckSkippedRecently,
}

/// Ways a check cycle can fail.
///
/// A failed cycle persists nothing; the error is both returned and emitted
/// as a [`UpdaterEvent::CheckFailed`].
#[derive(Debug, Error)]
pub enum CheckError {
    /// Required configuration is missing or invalid. Surfaced before any
    /// network call.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The endpoint could not be reached or answered with a non-success
    /// status.
    #[error("network failure: {0}")]
    Network(FetchError),

    /// The response body does not match the expected payload shape.
    #[error("malformed remote payload: {0}")]
    MalformedPayload(#[from] PayloadError),

    /// Another check cycle is in flight on this checker.
    #[error("a check is already in progress")]
    AlreadyInProgress,

    /// The host cancelled the in-flight request.
    #[error("check cancelled")]
    Cancelled,

    /// Persisting the check state failed.
    #[error("state store error: {0}")]
    Store(#[from] StoreError),
}

impl From<FetchError> for CheckError {
    fn from(error: FetchError) -> Self {
        match error {
            FetchError::Cancelled => CheckError::Cancelled,
            other => CheckError::Network(other),
        }
    }
}

/// The version check orchestrator.
///
/// Construct it with the host configuration and collaborators, then drive
/// it with [`run_check`]. The checker is cheap to keep alive for the
/// process lifetime; the single-in-flight guard lives on the instance.
///
/// [`run_check`]: UpdateChecker::run_check
pub struct UpdateChecker {
    config: UpdaterConfig,
    policies: TierPolicies,
    fetcher: Arc<dyn ConfigFetcher>,
    store: Arc<dyn StateStore>,
    clock: Arc<dyn Clock>,
    events: Arc<dyn EventSink>,
    in_flight: AtomicBool,
}

impl UpdateChecker {
    /// Create a checker from configuration and the two collaborators every
    /// deployment must supply. The clock defaults to the system clock and
    /// the event sink to [`NullSink`].
    ///
    /// The tier policies start from the config's global `alert_policy`
    /// override when present: a global policy overwrites all four tier
    /// entries.
    pub fn new(
        config: UpdaterConfig,
        fetcher: Arc<dyn ConfigFetcher>,
        store: Arc<dyn StateStore>,
    ) -> Self {
        let policies = match config.alert_policy {
            Some(global) => TierPolicies::uniform(global),
            None => TierPolicies::default(),
        };

        Self {
            config,
            policies,
            fetcher,
            store,
            clock: Arc::new(SystemClock),
            events: Arc::new(NullSink),
            in_flight: AtomicBool::new(false),
        }
    }

    /// Replace the clock. Tests use a fixed clock.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Replace the event sink.
    pub fn with_events(mut self, events: Arc<dyn EventSink>) -> Self {
        self.events = events;
        self
    }

    /// Replace the per-tier policy mapping wholesale.
    pub fn with_policies(mut self, policies: TierPolicies) -> Self {
        self.policies = policies;
        self
    }

    /// The effective per-tier policy mapping.
    pub fn policies(&self) -> &TierPolicies {
        &self.policies
    }

    /// Run one check cycle.
    ///
    /// Exactly one terminal value is produced per invocation. Failures are
    /// additionally emitted as [`UpdaterEvent::CheckFailed`].
    ///
    /// # Errors
    ///
    /// See [`CheckError`] for the failure taxonomy.
    pub async fn run_check(&self) -> Result<CheckOutcome, CheckError> {
        let result = self.guarded_cycle().await;
        if let Err(error) = &result {
            log::debug!("check failed: {}", error);
            self.events.emit(UpdaterEvent::CheckFailed {
                message: error.to_string(),
            });
        }
        result
    }

    async fn guarded_cycle(&self) -> Result<CheckOutcome, CheckError> {
        let _guard =
            InFlightGuard::try_acquire(&self.in_flight).ok_or(CheckError::AlreadyInProgress)?;
        self.run_cycle().await
    }

    async fn run_cycle(&self) -> Result<CheckOutcome, CheckError> {
        // Configuration problems must surface before any network access.
        self.config.validate()?;
        let installed = self.config.installed()?;

        // The one state read of the cycle.
        let state = self.store.load()?;
        let now = self.clock.now();

        if !schedule::is_due(state.last_check, self.config.frequency, now) {
            log::debug!(
                "check not due (last {:?}, frequency {:?})",
                state.last_check,
                self.config.frequency
            );
            return Ok(CheckOutcome::CheckSkippedRecently);
        }

        let url = self.config.endpoint_url()?;
        log::debug!("checking {} for updates to {}", url, installed);

        let response = self
            .fetcher
            .fetch(FetchRequest {
                url,
                method: FetchMethod::Post,
                headers: self.config.headers.clone(),
            })
            .await?;

        if !response.is_success() {
            return Err(CheckError::Network(FetchError::Status(response.status)));
        }

        let decoded = remote::decode(&response.body, self.config.platform_key())?;
        self.events.emit(UpdaterEvent::CheckCompleted {
            payload: decoded.raw.clone(),
        });

        let Some(evaluation) = policy::evaluate(&installed, &decoded.info, &self.policies) else {
            self.store.set_last_check(now)?;
            return Ok(CheckOutcome::NoUpdateAvailable);
        };

        // A skip is only honored for the skip policy; forced updates
        // ignore the skip list by construction.
        if evaluation.policy == AlertPolicy::Skip
            && state.skipped_version.as_ref() == Some(&evaluation.target)
        {
            log::debug!("version {} was previously skipped", evaluation.target);
            return Ok(CheckOutcome::VersionSkipped);
        }

        // The one state write of the cycle.
        self.store.set_last_check(now)?;

        if evaluation.policy == AlertPolicy::Silent {
            self.events.emit(UpdaterEvent::UpdateDetectedWithoutAlert {
                message: update_message(&self.config, &installed, &evaluation.target),
            });
        }

        Ok(CheckOutcome::UpdateRequired {
            tier: evaluation.tier,
            policy: evaluation.policy,
            target: evaluation.target,
        })
    }
}

/// Human-readable description of an available update.
pub fn update_message(
    config: &UpdaterConfig,
    installed: &SemanticVersion,
    target: &SemanticVersion,
) -> String {
    format!(
        "{} {} is available (installed: {})",
        config.display_name(),
        target,
        installed
    )
}

/// RAII guard for the single-in-flight invariant.
///
/// Dropping the guard releases the flag, so a cancelled or panicked cycle
/// never wedges the checker.
struct InFlightGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> InFlightGuard<'a> {
    fn try_acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .is_ok()
            .then_some(Self { flag })
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}
