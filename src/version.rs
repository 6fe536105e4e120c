//! version
//!
//! Dotted version parsing, comparison, and delta classification.
//!
//! # Design
//!
//! A [`SemanticVersion`] is an ordered sequence of non-negative integers of
//! arbitrary length (`"1.2"`, `"1.2.0.47"`). Comparison pads the shorter
//! sequence with zeros, so `1.2` and `1.2.0` compare equal. Validation
//! happens at construction time; a malformed string cannot become a value.
//!
//! [`classify`] turns a pair of versions into an update tier: the first
//! (most significant) differing component decides whether the delta is a
//! major, minor, patch, or revision update.
//!
//! # Examples
//!
//! ```
//! use nudge::version::{classify, SemanticVersion, UpdateTier};
//!
//! let installed = SemanticVersion::parse("1.2.0").unwrap();
//! let remote = SemanticVersion::parse("2.0.0").unwrap();
//!
//! assert!(remote > installed);
//! assert_eq!(classify(&installed, &remote), Some(UpdateTier::Major));
//!
//! // Not strictly newer -> no tier
//! let older = SemanticVersion::parse("1.1.9").unwrap();
//! assert_eq!(classify(&installed, &older), None);
//!
//! // Invalid constructions fail at creation time
//! assert!(SemanticVersion::parse("1..2").is_err());
//! assert!(SemanticVersion::parse("1.beta").is_err());
//! ```

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from version parsing.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum VersionError {
    /// The input is empty, or a component is empty or non-numeric.
    #[error("invalid version format: {0}")]
    InvalidFormat(String),
}

/// A parsed dotted version.
///
/// Components are non-negative integers; any number of components is
/// allowed. Equality and ordering treat missing trailing components as
/// zero, so `1.2 == 1.2.0`. `Display` re-renders the components exactly as
/// parsed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SemanticVersion {
    components: Vec<u64>,
}

impl SemanticVersion {
    /// Parse a dotted version string.
    ///
    /// # Errors
    ///
    /// Returns `VersionError::InvalidFormat` if the input is empty or any
    /// component is empty or non-numeric.
    pub fn parse(input: &str) -> Result<Self, VersionError> {
        if input.is_empty() {
            return Err(VersionError::InvalidFormat(
                "version string is empty".into(),
            ));
        }

        let mut components = Vec::new();
        for segment in input.split('.') {
            if segment.is_empty() {
                return Err(VersionError::InvalidFormat(format!(
                    "empty component in '{}'",
                    input
                )));
            }
            let value: u64 = segment.parse().map_err(|_| {
                VersionError::InvalidFormat(format!(
                    "non-numeric component '{}' in '{}'",
                    segment, input
                ))
            })?;
            components.push(value);
        }

        Ok(Self { components })
    }

    /// The parsed components, in order of significance.
    pub fn components(&self) -> &[u64] {
        &self.components
    }

    /// Component at `index`, treating missing trailing components as zero.
    fn component(&self, index: usize) -> u64 {
        self.components.get(index).copied().unwrap_or(0)
    }
}

impl fmt::Display for SemanticVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for component in &self.components {
            if !first {
                write!(f, ".")?;
            }
            write!(f, "{}", component)?;
            first = false;
        }
        Ok(())
    }
}

impl FromStr for SemanticVersion {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for SemanticVersion {
    type Error = VersionError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<SemanticVersion> for String {
    fn from(version: SemanticVersion) -> Self {
        version.to_string()
    }
}

// Equality must agree with ordering under zero padding, so it cannot be
// derived over the raw component vector.
impl PartialEq for SemanticVersion {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for SemanticVersion {}

impl PartialOrd for SemanticVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SemanticVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        let len = self.components.len().max(other.components.len());
        for index in 0..len {
            match self.component(index).cmp(&other.component(index)) {
                Ordering::Equal => continue,
                unequal => return unequal,
            }
        }
        Ordering::Equal
    }
}

/// Severity of a version delta.
///
/// The tier is decided by the first (most significant) component index at
/// which the two versions differ: index 0 is major, 1 minor, 2 patch, and
/// 3 or beyond revision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateTier {
    /// Component 0 differs: A.b.c.d
    Major,
    /// Component 1 differs: a.B.c.d
    Minor,
    /// Component 2 differs: a.b.C.d
    Patch,
    /// Component 3 or later differs: a.b.c.D
    Revision,
}

impl fmt::Display for UpdateTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UpdateTier::Major => write!(f, "major"),
            UpdateTier::Minor => write!(f, "minor"),
            UpdateTier::Patch => write!(f, "patch"),
            UpdateTier::Revision => write!(f, "revision"),
        }
    }
}

/// Classify the delta between the installed and remote versions.
///
/// Returns `None` when the remote version is not strictly newer than the
/// installed one. Otherwise returns the tier of the first differing
/// component.
pub fn classify(installed: &SemanticVersion, remote: &SemanticVersion) -> Option<UpdateTier> {
    if remote <= installed {
        return None;
    }

    let len = installed.components.len().max(remote.components.len());
    for index in 0..len {
        if installed.component(index) != remote.component(index) {
            return Some(match index {
                0 => UpdateTier::Major,
                1 => UpdateTier::Minor,
                2 => UpdateTier::Patch,
                _ => UpdateTier::Revision,
            });
        }
    }

    // remote > installed guarantees a differing component above.
    None
}
