//! config
//!
//! Host-supplied updater configuration.
//!
//! # Design
//!
//! The engine does not discover anything about its host. The application
//! identifier, installed version, and endpoint coordinates are supplied
//! through [`UpdaterConfig`], either built in code or loaded from a TOML
//! file. Validation is fail-fast: a missing endpoint field is a
//! configuration error surfaced before any network call is attempted.
//!
//! # File locations
//!
//! Searched in order:
//! 1. Explicit `--config` path
//! 2. `$NUDGE_CONFIG` if set
//! 3. `<user config dir>/nudge/config.toml`
//!
//! # Example
//!
//! ```toml
//! app_id = "com.example.mailer"
//! app_name = "Mailer"
//! installed_version = "1.2.0"
//! protocol = "https"
//! host = "config.example.com"
//! path = "/api/v1/config"
//! country_code = "NL"
//! store_url = "https://example.com/mailer/download"
//! frequency = "daily"
//! alert_policy = "option"
//!
//! [headers]
//! x-api-key = "secret"
//! ```

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::policy::AlertPolicy;
use crate::schedule::CheckFrequency;
use crate::version::SemanticVersion;

/// Errors from configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required value is absent.
    #[error("missing required config value: {0}")]
    Missing(&'static str),

    #[error("failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("invalid config value: {0}")]
    InvalidValue(String),

    #[error("user config directory not found")]
    NoConfigDir,
}

/// Updater configuration supplied by the host application.
///
/// All fields the engine requires are optional here so a partially written
/// config file still parses; [`validate`] decides what is actually
/// required.
///
/// [`validate`]: UpdaterConfig::validate
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct UpdaterConfig {
    /// Application identifier (bundle id / package name).
    pub app_id: Option<String>,

    /// Human-readable application name used in messages. Falls back to
    /// `app_id`.
    pub app_name: Option<String>,

    /// Installed version string, e.g. `"1.2.0"`.
    pub installed_version: Option<String>,

    /// Endpoint scheme: `http` or `https`.
    pub protocol: Option<String>,

    /// Endpoint host, optionally with a port.
    pub host: Option<String>,

    /// Endpoint path, e.g. `"/api/v1/config"`.
    pub path: Option<String>,

    /// Platform key under the payload's app-upgrade object. Defaults to
    /// the operating system name.
    pub platform: Option<String>,

    /// Storefront country code, appended as a `country` query parameter.
    pub country_code: Option<String>,

    /// Page opened when the user chooses to update now.
    pub store_url: Option<String>,

    /// Extra request headers sent with every check.
    pub headers: HashMap<String, String>,

    /// How often a remote check may run.
    pub frequency: CheckFrequency,

    /// Global alert-policy override applied to every tier.
    pub alert_policy: Option<AlertPolicy>,
}

impl UpdaterConfig {
    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns `ReadError` when the file cannot be read and `ParseError`
    /// when it is not valid TOML of this shape.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::ReadError {
            path: path.to_path_buf(),
            source,
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Locate the config file: explicit path, then `$NUDGE_CONFIG`, then
    /// `<user config dir>/nudge/config.toml`.
    pub fn resolve_path(explicit: Option<&Path>) -> Result<PathBuf, ConfigError> {
        if let Some(path) = explicit {
            return Ok(path.to_path_buf());
        }
        if let Ok(env_path) = std::env::var("NUDGE_CONFIG") {
            return Ok(PathBuf::from(env_path));
        }
        let base = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(base.join("nudge").join("config.toml"))
    }

    /// Validate that every value the engine requires is present.
    ///
    /// # Errors
    ///
    /// Returns `Missing` for the first absent required field, or
    /// `InvalidValue` when a present value is unusable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.app_id.as_deref().map_or(true, str::is_empty) {
            return Err(ConfigError::Missing("app_id"));
        }
        if self.installed_version.as_deref().map_or(true, str::is_empty) {
            return Err(ConfigError::Missing("installed_version"));
        }
        let protocol = self
            .protocol
            .as_deref()
            .filter(|p| !p.is_empty())
            .ok_or(ConfigError::Missing("protocol"))?;
        if protocol != "http" && protocol != "https" {
            return Err(ConfigError::InvalidValue(format!(
                "protocol must be 'http' or 'https', got '{}'",
                protocol
            )));
        }
        if self.host.as_deref().map_or(true, str::is_empty) {
            return Err(ConfigError::Missing("host"));
        }
        if self.path.as_deref().map_or(true, str::is_empty) {
            return Err(ConfigError::Missing("path"));
        }
        self.installed()?;
        Ok(())
    }

    /// The installed version, parsed.
    ///
    /// # Errors
    ///
    /// Returns `Missing` when unset and `InvalidValue` when the string
    /// does not parse as a dotted version.
    pub fn installed(&self) -> Result<SemanticVersion, ConfigError> {
        let raw = self
            .installed_version
            .as_deref()
            .ok_or(ConfigError::Missing("installed_version"))?;
        SemanticVersion::parse(raw)
            .map_err(|e| ConfigError::InvalidValue(format!("installed_version: {}", e)))
    }

    /// The full endpoint URL, including the optional country parameter.
    ///
    /// # Errors
    ///
    /// Returns `Missing` when any endpoint component is absent.
    pub fn endpoint_url(&self) -> Result<String, ConfigError> {
        let protocol = self.protocol.as_deref().ok_or(ConfigError::Missing("protocol"))?;
        let host = self.host.as_deref().ok_or(ConfigError::Missing("host"))?;
        let path = self.path.as_deref().ok_or(ConfigError::Missing("path"))?;

        let separator = if path.starts_with('/') { "" } else { "/" };
        let mut url = format!("{}://{}{}{}", protocol, host, separator, path);
        if let Some(country) = self.country_code.as_deref().filter(|c| !c.is_empty()) {
            url.push_str("?country=");
            url.push_str(country);
        }
        Ok(url)
    }

    /// Platform key used to resolve the payload's app-upgrade object.
    pub fn platform_key(&self) -> &str {
        self.platform.as_deref().unwrap_or(std::env::consts::OS)
    }

    /// Name used in user-facing messages.
    pub fn display_name(&self) -> &str {
        self.app_name
            .as_deref()
            .or(self.app_id.as_deref())
            .unwrap_or("this application")
    }
}
