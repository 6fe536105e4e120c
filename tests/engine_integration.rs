//! Integration tests for the check-cycle engine.
//!
//! These tests drive full check cycles through the mock fetcher and the
//! in-memory state store, with a fixed clock and a recording event sink.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration, TimeZone, Utc};
use tokio::sync::Notify;

use nudge::clock::FixedClock;
use nudge::config::UpdaterConfig;
use nudge::engine::{
    CheckError, CheckOutcome, RecordingSink, UpdateChecker, UpdaterEvent,
};
use nudge::policy::{AlertPolicy, TierPolicies};
use nudge::remote::{
    ConfigFetcher, FetchError, FetchRequest, FetchResponse, MockFetcher,
};
use nudge::schedule::CheckFrequency;
use nudge::store::{MemoryStateStore, PersistedState, StateStore};
use nudge::version::{SemanticVersion, UpdateTier};

fn config(installed: &str) -> UpdaterConfig {
    UpdaterConfig {
        app_id: Some("com.example.mailer".into()),
        app_name: Some("Mailer".into()),
        installed_version: Some(installed.into()),
        protocol: Some("https".into()),
        host: Some("config.example.com".into()),
        path: Some("/api/v1/config".into()),
        platform: Some("linux".into()),
        frequency: CheckFrequency::Immediate,
        ..UpdaterConfig::default()
    }
}

fn payload(platform_block: &str) -> FetchResponse {
    FetchResponse {
        status: 200,
        body: format!(
            r#"{{
                "status": {{ "code": 200 }},
                "data": {{ "app": {{ "appUpgrade": {{ {} }} }} }}
            }}"#,
            platform_block
        ),
    }
}

fn fixed_now() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 8, 4, 12, 0, 0).unwrap()
}

fn version(s: &str) -> SemanticVersion {
    SemanticVersion::parse(s).unwrap()
}

struct Harness {
    checker: UpdateChecker,
    fetcher: MockFetcher,
    store: MemoryStateStore,
    events: RecordingSink,
}

fn harness(config: UpdaterConfig, fetcher: MockFetcher, state: PersistedState) -> Harness {
    let store = MemoryStateStore::with_state(state);
    let events = RecordingSink::new();
    let checker = UpdateChecker::new(config, Arc::new(fetcher.clone()), Arc::new(store.clone()))
        .with_clock(Arc::new(FixedClock::new(fixed_now())))
        .with_events(Arc::new(events.clone()));
    Harness {
        checker,
        fetcher,
        store,
        events,
    }
}

// =============================================================================
// Scenario tests
// =============================================================================

#[tokio::test]
async fn force_version_overrides_option_policies() {
    // installed 1.2.0, remote force 2.0.0, all tier policies Option.
    let fetcher = MockFetcher::new().respond_with(payload(
        r#""linux": { "forceUpgradeVersion": "2.0.0" }"#,
    ));
    let h = harness(config("1.2.0"), fetcher, PersistedState::default());
    let checker = h.checker.with_policies(TierPolicies::uniform(AlertPolicy::Option));

    let outcome = checker.run_check().await.unwrap();

    assert_eq!(
        outcome,
        CheckOutcome::UpdateRequired {
            tier: UpdateTier::Major,
            policy: AlertPolicy::Force,
            target: version("2.0.0"),
        }
    );
    assert_eq!(h.store.last_check().unwrap(), Some(fixed_now()));
}

#[tokio::test]
async fn previously_skipped_patch_is_not_prompted_again() {
    // installed 1.2.0, recommended 1.2.1, patch policy Skip, skipped 1.2.1.
    let fetcher = MockFetcher::new().respond_with(payload(
        r#""linux": { "recommendedVersion": "1.2.1" }"#,
    ));
    let mut policies = TierPolicies::default();
    policies.patch = AlertPolicy::Skip;

    let h = harness(
        config("1.2.0"),
        fetcher,
        PersistedState {
            last_check: None,
            skipped_version: Some(version("1.2.1")),
        },
    );
    let checker = h.checker.with_policies(policies);

    let outcome = checker.run_check().await.unwrap();

    assert_eq!(outcome, CheckOutcome::VersionSkipped);
    // The skipped arm does not extend the throttle window.
    assert_eq!(h.store.last_check().unwrap(), None);
}

#[tokio::test]
async fn older_remote_is_no_update_and_updates_timestamp() {
    // installed 1.2.0, recommended 1.1.9.
    let fetcher = MockFetcher::new().respond_with(payload(
        r#""linux": { "recommendedVersion": "1.1.9" }"#,
    ));
    let h = harness(config("1.2.0"), fetcher, PersistedState::default());

    let outcome = h.checker.run_check().await.unwrap();

    assert_eq!(outcome, CheckOutcome::NoUpdateAvailable);
    assert_eq!(h.store.last_check().unwrap(), Some(fixed_now()));
}

#[tokio::test]
async fn recent_check_skips_without_network_access() {
    // Last check 2 hours ago with a daily frequency.
    let mut config = config("1.2.0");
    config.frequency = CheckFrequency::Daily;

    let h = harness(
        config,
        MockFetcher::new(),
        PersistedState {
            last_check: Some(fixed_now() - Duration::hours(2)),
            skipped_version: None,
        },
    );

    let outcome = h.checker.run_check().await.unwrap();

    assert_eq!(outcome, CheckOutcome::CheckSkippedRecently);
    assert_eq!(h.fetcher.request_count(), 0);
}

#[tokio::test]
async fn missing_platform_entry_is_no_update() {
    let fetcher = MockFetcher::new().respond_with(payload(
        r#""ios": { "recommendedVersion": "9.9.9" }"#,
    ));
    let h = harness(config("1.2.0"), fetcher, PersistedState::default());

    let outcome = h.checker.run_check().await.unwrap();

    assert_eq!(outcome, CheckOutcome::NoUpdateAvailable);
}

// =============================================================================
// Failure paths
// =============================================================================

#[tokio::test]
async fn malformed_payload_fails_and_persists_nothing() {
    let fetcher = MockFetcher::new().respond_with(FetchResponse {
        status: 200,
        body: r#"{ "unexpected": "shape" }"#.to_string(),
    });
    let h = harness(config("1.2.0"), fetcher, PersistedState::default());

    let err = h.checker.run_check().await.unwrap_err();

    assert!(matches!(err, CheckError::MalformedPayload(_)));
    assert_eq!(h.store.last_check().unwrap(), None);

    // The failure is also reported through the event channel.
    let events = h.events.events();
    assert!(events
        .iter()
        .any(|e| matches!(e, UpdaterEvent::CheckFailed { .. })));
}

#[tokio::test]
async fn transport_error_fails_and_persists_nothing() {
    let fetcher =
        MockFetcher::new().fail_with(FetchError::Transport("connection refused".into()));
    let h = harness(config("1.2.0"), fetcher, PersistedState::default());

    let err = h.checker.run_check().await.unwrap_err();

    assert!(matches!(err, CheckError::Network(FetchError::Transport(_))));
    assert_eq!(h.store.last_check().unwrap(), None);
}

#[tokio::test]
async fn cancellation_fails_without_persisting() {
    let fetcher = MockFetcher::new().fail_with(FetchError::Cancelled);
    let h = harness(config("1.2.0"), fetcher, PersistedState::default());

    let err = h.checker.run_check().await.unwrap_err();

    assert!(matches!(err, CheckError::Cancelled));
    assert_eq!(h.store.last_check().unwrap(), None);
}

#[tokio::test]
async fn unparseable_remote_version_is_malformed_payload() {
    let fetcher = MockFetcher::new().respond_with(payload(
        r#""linux": { "recommendedVersion": "1.2.beta" }"#,
    ));
    let h = harness(config("1.2.0"), fetcher, PersistedState::default());

    let err = h.checker.run_check().await.unwrap_err();
    assert!(matches!(err, CheckError::MalformedPayload(_)));
}

// =============================================================================
// Event emission
// =============================================================================

#[tokio::test]
async fn completed_check_echoes_raw_payload() {
    let fetcher = MockFetcher::new().respond_with(payload(
        r#""linux": { "recommendedVersion": "1.2.1" }"#,
    ));
    let h = harness(config("1.2.0"), fetcher, PersistedState::default());

    h.checker.run_check().await.unwrap();

    let events = h.events.events();
    let echoed = events.iter().find_map(|e| match e {
        UpdaterEvent::CheckCompleted { payload } => Some(payload.clone()),
        _ => None,
    });
    let payload = echoed.expect("a CheckCompleted event");
    assert_eq!(
        payload["data"]["app"]["appUpgrade"]["linux"]["recommendedVersion"],
        "1.2.1"
    );
}

#[tokio::test]
async fn silent_policy_reports_without_prompting() {
    let fetcher = MockFetcher::new().respond_with(payload(
        r#""linux": { "recommendedVersion": "1.2.1" }"#,
    ));
    let h = harness(config("1.2.0"), fetcher, PersistedState::default());
    let checker = h.checker.with_policies(TierPolicies::uniform(AlertPolicy::Silent));

    let outcome = checker.run_check().await.unwrap();

    assert_eq!(
        outcome,
        CheckOutcome::UpdateRequired {
            tier: UpdateTier::Patch,
            policy: AlertPolicy::Silent,
            target: version("1.2.1"),
        }
    );

    let events = h.events.events();
    let message = events.iter().find_map(|e| match e {
        UpdaterEvent::UpdateDetectedWithoutAlert { message } => Some(message.clone()),
        _ => None,
    });
    assert_eq!(
        message.as_deref(),
        Some("Mailer 1.2.1 is available (installed: 1.2.0)")
    );
}

// =============================================================================
// Single-in-flight invariant
// =============================================================================

/// Fetcher that parks inside `fetch` until released, so a test can hold a
/// cycle open at its suspend point.
struct GatedFetcher {
    entered: Notify,
    release: Notify,
    response: FetchResponse,
}

impl GatedFetcher {
    fn new(response: FetchResponse) -> Self {
        Self {
            entered: Notify::new(),
            release: Notify::new(),
            response,
        }
    }
}

#[async_trait]
impl ConfigFetcher for GatedFetcher {
    async fn fetch(&self, _request: FetchRequest) -> Result<FetchResponse, FetchError> {
        self.entered.notify_one();
        self.release.notified().await;
        Ok(self.response.clone())
    }
}

#[tokio::test]
async fn concurrent_invocation_is_rejected_not_queued() {
    let fetcher = Arc::new(GatedFetcher::new(payload(
        r#""linux": { "recommendedVersion": "1.2.1" }"#,
    )));
    let store = MemoryStateStore::new();
    let checker = Arc::new(
        UpdateChecker::new(config("1.2.0"), fetcher.clone(), Arc::new(store.clone()))
            .with_clock(Arc::new(FixedClock::new(fixed_now()))),
    );

    let first = tokio::spawn({
        let checker = checker.clone();
        async move { checker.run_check().await }
    });

    // Wait until the first cycle is suspended inside the fetch.
    fetcher.entered.notified().await;

    let second = checker.run_check().await;
    assert!(matches!(second, Err(CheckError::AlreadyInProgress)));

    fetcher.release.notify_one();
    let outcome = first.await.unwrap().unwrap();
    assert!(matches!(outcome, CheckOutcome::UpdateRequired { .. }));

    // The rejected invocation persisted nothing; the completed one did.
    assert_eq!(store.last_check().unwrap(), Some(fixed_now()));
}

#[tokio::test]
async fn checker_is_reusable_after_a_cycle_completes() {
    let fetcher = MockFetcher::new().respond_with(payload(
        r#""linux": { "recommendedVersion": "1.1.0" }"#,
    ));
    let h = harness(config("1.2.0"), fetcher, PersistedState::default());

    assert_eq!(
        h.checker.run_check().await.unwrap(),
        CheckOutcome::NoUpdateAvailable
    );
    assert_eq!(
        h.checker.run_check().await.unwrap(),
        CheckOutcome::NoUpdateAvailable
    );
    assert_eq!(h.fetcher.request_count(), 2);
}

#[tokio::test]
async fn checker_is_reusable_after_a_cycle_fails() {
    let fetcher = MockFetcher::new()
        .fail_with(FetchError::Transport("connection refused".into()))
        .respond_with(payload(r#""linux": { "recommendedVersion": "1.1.0" }"#));
    let h = harness(config("1.2.0"), fetcher, PersistedState::default());

    assert!(h.checker.run_check().await.is_err());
    assert_eq!(
        h.checker.run_check().await.unwrap(),
        CheckOutcome::NoUpdateAvailable
    );
}
