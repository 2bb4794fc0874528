//! Capability versions and the selectors used to address them.

use super::ServiceRegistryDomainError;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use tracing::warn;

/// Keyword selecting the highest active version.
const LATEST_KEYWORD: &str = "latest";

/// Keyword selecting every registered version.
const ALL_KEYWORD: &str = "all";

/// Semantic version string of a registered capability.
///
/// Versions are ordered by their numeric dot-separated segments, so
/// `2.10.0` sorts after `2.9.0`. Missing trailing segments count as zero.
/// A version containing an empty or non-numeric segment is malformed and
/// orders as `0.0.0`; equal numeric values fall back to comparing the raw
/// strings so ordering stays total.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct CapabilityVersion {
    raw: String,
    segments: Vec<u64>,
    malformed: bool,
}

impl CapabilityVersion {
    /// Parses a capability version.
    ///
    /// Malformed versions are accepted and logged; they order as `0.0.0`.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceRegistryDomainError::EmptyVersion`] when the value is
    /// blank.
    pub fn new(value: impl Into<String>) -> Result<Self, ServiceRegistryDomainError> {
        let raw = value.into().trim().to_owned();
        if raw.is_empty() {
            return Err(ServiceRegistryDomainError::EmptyVersion);
        }

        let parsed: Result<Vec<u64>, _> = raw.split('.').map(str::parse::<u64>).collect();
        let (segments, malformed) = match parsed {
            Ok(segments) => (segments, false),
            Err(err) => {
                warn!(
                    version = %raw,
                    error = %err,
                    "malformed capability version; ordering it as 0.0.0"
                );
                (vec![0, 0, 0], true)
            }
        };

        Ok(Self {
            raw,
            segments,
            malformed,
        })
    }

    /// Returns the version exactly as registered (trimmed).
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Returns the numeric segments used for ordering.
    #[must_use]
    pub fn segments(&self) -> &[u64] {
        &self.segments
    }

    /// Returns whether the version failed numeric parsing.
    #[must_use]
    pub const fn is_malformed(&self) -> bool {
        self.malformed
    }

    fn cmp_numeric(&self, other: &Self) -> Ordering {
        let width = self.segments.len().max(other.segments.len());
        let padded = |segments: &[u64], index: usize| segments.get(index).copied().unwrap_or(0);
        (0..width)
            .map(|index| padded(&self.segments, index).cmp(&padded(&other.segments, index)))
            .find(|ordering| ordering.is_ne())
            .unwrap_or(Ordering::Equal)
    }
}

impl PartialEq for CapabilityVersion {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

impl Eq for CapabilityVersion {}

impl Hash for CapabilityVersion {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.raw.hash(state);
    }
}

impl PartialOrd for CapabilityVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CapabilityVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        self.cmp_numeric(other)
            .then_with(|| self.raw.cmp(&other.raw))
    }
}

impl fmt::Display for CapabilityVersion {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.raw)
    }
}

impl From<CapabilityVersion> for String {
    fn from(version: CapabilityVersion) -> Self {
        version.raw
    }
}

impl TryFrom<String> for CapabilityVersion {
    type Error = ServiceRegistryDomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Selects which registered version a lookup resolves to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum VersionSelector {
    /// The highest active version.
    #[default]
    Latest,
    /// One specific version.
    Exact(CapabilityVersion),
}

impl VersionSelector {
    /// Parses a selector; `"latest"` (any case) selects the highest version.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceRegistryDomainError::EmptyVersion`] when the value is
    /// blank.
    pub fn parse(value: &str) -> Result<Self, ServiceRegistryDomainError> {
        if value.trim().eq_ignore_ascii_case(LATEST_KEYWORD) {
            return Ok(Self::Latest);
        }
        CapabilityVersion::new(value).map(Self::Exact)
    }
}

impl From<CapabilityVersion> for VersionSelector {
    fn from(version: CapabilityVersion) -> Self {
        Self::Exact(version)
    }
}

impl fmt::Display for VersionSelector {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Latest => formatter.write_str(LATEST_KEYWORD),
            Self::Exact(version) => version.fmt(formatter),
        }
    }
}

/// Selects which registered versions an activation toggle applies to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum VersionScope {
    /// Every registered version of the capability.
    #[default]
    All,
    /// One specific version.
    Exact(CapabilityVersion),
}

impl VersionScope {
    /// Parses a scope; `"all"` (any case) selects every version.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceRegistryDomainError::EmptyVersion`] when the value is
    /// blank.
    pub fn parse(value: &str) -> Result<Self, ServiceRegistryDomainError> {
        if value.trim().eq_ignore_ascii_case(ALL_KEYWORD) {
            return Ok(Self::All);
        }
        CapabilityVersion::new(value).map(Self::Exact)
    }

    /// Returns whether `version` falls within this scope.
    #[must_use]
    pub fn includes(&self, version: &CapabilityVersion) -> bool {
        match self {
            Self::All => true,
            Self::Exact(expected) => expected == version,
        }
    }
}

impl fmt::Display for VersionScope {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => formatter.write_str(ALL_KEYWORD),
            Self::Exact(version) => version.fmt(formatter),
        }
    }
}
