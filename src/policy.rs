//! policy
//!
//! Alert policies and update evaluation.
//!
//! # Design
//!
//! [`TierPolicies`] maps each update tier to an [`AlertPolicy`]. The
//! mapping is evaluated by the pure [`evaluate`] function together with the
//! remote version metadata; nothing here performs I/O or touches persisted
//! state.
//!
//! The force-upgrade version always wins over the recommended version:
//! when the endpoint publishes a force-upgrade version newer than the
//! installed one, the resulting policy is `Force` no matter what the tier
//! mapping says.

use serde::{Deserialize, Serialize};

use crate::remote::RemoteVersionInfo;
use crate::version::{classify, SemanticVersion, UpdateTier};

/// How an available update is surfaced to the user.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertPolicy {
    /// Non-dismissible prompt; the user must update.
    Force,
    /// Dismissible two-choice prompt: update now or later. The default.
    #[default]
    Option,
    /// Three-choice prompt: update now, later, or skip this version.
    Skip,
    /// No UI; a human-readable message is surfaced through the event sink.
    Silent,
}

/// Per-tier alert policy mapping.
///
/// [`set_global`] overwrites all four entries; a per-tier override does not
/// survive a global reassignment. The fan-out is part of the configuration
/// contract, not an accident.
///
/// [`set_global`]: TierPolicies::set_global
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TierPolicies {
    /// Policy for major updates: A.b.c.d
    pub major: AlertPolicy,
    /// Policy for minor updates: a.B.c.d
    pub minor: AlertPolicy,
    /// Policy for patch updates: a.b.C.d
    pub patch: AlertPolicy,
    /// Policy for revision updates: a.b.c.D
    pub revision: AlertPolicy,
}

impl Default for TierPolicies {
    fn default() -> Self {
        Self::uniform(AlertPolicy::default())
    }
}

impl TierPolicies {
    /// The same policy for every tier.
    pub fn uniform(policy: AlertPolicy) -> Self {
        Self {
            major: policy,
            minor: policy,
            patch: policy,
            revision: policy,
        }
    }

    /// Overwrite every tier entry with `policy`.
    pub fn set_global(&mut self, policy: AlertPolicy) {
        *self = Self::uniform(policy);
    }

    /// The policy configured for `tier`.
    pub fn for_tier(&self, tier: UpdateTier) -> AlertPolicy {
        match tier {
            UpdateTier::Major => self.major,
            UpdateTier::Minor => self.minor,
            UpdateTier::Patch => self.patch,
            UpdateTier::Revision => self.revision,
        }
    }
}

/// Result of evaluating remote version metadata against the installed
/// version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Evaluation {
    /// Severity of the available update.
    pub tier: UpdateTier,
    /// How the update should be surfaced.
    pub policy: AlertPolicy,
    /// The version the user would be updating to.
    pub target: SemanticVersion,
}

/// Evaluate remote version metadata against the installed version.
///
/// Precedence: a force-upgrade version newer than `installed` wins, with
/// policy `Force` regardless of the tier mapping. Otherwise the recommended
/// version is classified and mapped through `policies`. Returns `None`
/// when neither remote field is newer than `installed`.
pub fn evaluate(
    installed: &SemanticVersion,
    remote: &RemoteVersionInfo,
    policies: &TierPolicies,
) -> Option<Evaluation> {
    if let Some(force) = &remote.force_upgrade_version {
        if let Some(tier) = classify(installed, force) {
            return Some(Evaluation {
                tier,
                policy: AlertPolicy::Force,
                target: force.clone(),
            });
        }
    }

    if let Some(recommended) = &remote.recommended_version {
        if let Some(tier) = classify(installed, recommended) {
            return Some(Evaluation {
                tier,
                policy: policies.for_tier(tier),
                target: recommended.clone(),
            });
        }
    }

    None
}
