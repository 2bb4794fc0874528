//! Validated capability and module name types.

use super::ServiceRegistryDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

fn normalise(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_owned())
}

/// Validated capability name such as `accounts.get_balance`.
///
/// Names are opaque: they are trimmed but otherwise kept verbatim, so
/// spaces, slashes and non-ASCII text are all allowed. Dots conventionally
/// separate the owning domain from the operation.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CapabilityName(String);

impl CapabilityName {
    /// Creates a validated capability name.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceRegistryDomainError::EmptyCapabilityName`] when the
    /// value is blank.
    pub fn new(value: impl Into<String>) -> Result<Self, ServiceRegistryDomainError> {
        normalise(&value.into())
            .map(Self)
            .ok_or(ServiceRegistryDomainError::EmptyCapabilityName)
    }

    /// Returns the name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for CapabilityName {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for CapabilityName {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.0)
    }
}

/// Validated name of a business module (for example `payments` or
/// `Risk Management`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModuleName(String);

impl ModuleName {
    /// Creates a validated module name.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceRegistryDomainError::EmptyModuleName`] when the value
    /// is blank.
    pub fn new(value: impl Into<String>) -> Result<Self, ServiceRegistryDomainError> {
        normalise(&value.into())
            .map(Self)
            .ok_or(ServiceRegistryDomainError::EmptyModuleName)
    }

    /// Returns the name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for ModuleName {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for ModuleName {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.0)
    }
}
