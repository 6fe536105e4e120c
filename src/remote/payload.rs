//! remote::payload
//!
//! Typed decode of the remote payload.
//!
//! # Design
//!
//! The payload nests version metadata under an app/platform-scoped path
//! (`data.app.appUpgrade.<platform>`). Decoding is strongly typed and
//! fails explicitly: a body that is not JSON of this shape, or a version
//! string that does not parse, is a [`PayloadError`]. A well-formed body
//! that has no entry for the platform, or whose entry carries neither
//! version field, decodes to an empty [`RemoteVersionInfo`] and means "no
//! update published" rather than an error.

use std::collections::HashMap;

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use crate::version::{SemanticVersion, VersionError};

/// Errors from payload decoding.
#[derive(Debug, Error)]
pub enum PayloadError {
    /// The body is not JSON of the expected shape.
    #[error("payload does not match the expected shape: {0}")]
    Decode(String),

    /// A version field holds a string that does not parse.
    #[error("payload field '{field}' holds an unparseable version: {source}")]
    BadVersion {
        field: &'static str,
        source: VersionError,
    },
}

#[derive(Debug, Deserialize)]
struct RawPayload {
    status: RawStatus,
    data: RawData,
}

#[derive(Debug, Deserialize)]
struct RawStatus {
    code: i64,
}

#[derive(Debug, Deserialize)]
struct RawData {
    app: RawApp,
}

#[derive(Debug, Deserialize)]
struct RawApp {
    #[serde(rename = "appUpgrade", default)]
    app_upgrade: HashMap<String, RawUpgrade>,
}

#[derive(Debug, Default, Deserialize)]
struct RawUpgrade {
    #[serde(rename = "forceUpgradeVersion")]
    force_upgrade_version: Option<String>,
    #[serde(rename = "recommendedVersion")]
    recommended_version: Option<String>,
}

/// Version metadata published for one platform.
///
/// Transient: created per check, discarded after policy evaluation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemoteVersionInfo {
    /// Version below which the app must upgrade.
    pub force_upgrade_version: Option<SemanticVersion>,
    /// Version the app is encouraged to upgrade to.
    pub recommended_version: Option<SemanticVersion>,
}

impl RemoteVersionInfo {
    /// No published versions.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Whether neither field is published.
    pub fn is_empty(&self) -> bool {
        self.force_upgrade_version.is_none() && self.recommended_version.is_none()
    }
}

/// A decoded check payload.
#[derive(Debug, Clone)]
pub struct DecodedPayload {
    /// Typed version metadata for the requested platform.
    pub info: RemoteVersionInfo,
    /// Status code reported inside the payload envelope.
    pub status_code: i64,
    /// Raw payload, echoed to the caller through the event sink.
    pub raw: Value,
}

/// Decode a response body for `platform`.
///
/// # Errors
///
/// `Decode` when the body is not JSON of the expected envelope shape;
/// `BadVersion` when a published version string does not parse.
pub fn decode(body: &str, platform: &str) -> Result<DecodedPayload, PayloadError> {
    let raw: Value =
        serde_json::from_str(body).map_err(|e| PayloadError::Decode(e.to_string()))?;
    let payload: RawPayload =
        serde_json::from_value(raw.clone()).map_err(|e| PayloadError::Decode(e.to_string()))?;

    let info = match payload.data.app.app_upgrade.get(platform) {
        None => RemoteVersionInfo::empty(),
        Some(upgrade) => RemoteVersionInfo {
            force_upgrade_version: parse_field(
                upgrade.force_upgrade_version.as_deref(),
                "forceUpgradeVersion",
            )?,
            recommended_version: parse_field(
                upgrade.recommended_version.as_deref(),
                "recommendedVersion",
            )?,
        },
    };

    Ok(DecodedPayload {
        info,
        status_code: payload.status.code,
        raw,
    })
}

fn parse_field(
    value: Option<&str>,
    field: &'static str,
) -> Result<Option<SemanticVersion>, PayloadError> {
    match value {
        None => Ok(None),
        Some(raw) => SemanticVersion::parse(raw)
            .map(Some)
            .map_err(|source| PayloadError::BadVersion { field, source }),
    }
}
