//! Dependency declarations and their evaluated status.

use super::{ModuleDomainError, ParseDependencyHealthError};
use crate::service_registry::domain::{CapabilityName, ModuleName};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A module's declared need for capabilities published by another module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyDeclaration {
    target_module: ModuleName,
    required_capabilities: Vec<CapabilityName>,
    is_critical: bool,
}

impl DependencyDeclaration {
    /// Creates a validated dependency declaration.
    ///
    /// An empty capability list is accepted and always evaluates as healthy.
    ///
    /// # Errors
    ///
    /// Returns [`ModuleDomainError::Name`] when the module or a capability
    /// name is blank.
    pub fn new<I, S>(
        target_module: &str,
        required_capabilities: I,
        is_critical: bool,
    ) -> Result<Self, ModuleDomainError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Ok(Self {
            target_module: ModuleName::new(target_module)?,
            required_capabilities: required_capabilities
                .into_iter()
                .map(CapabilityName::new)
                .collect::<Result<Vec<_>, _>>()?,
            is_critical,
        })
    }

    /// Creates a critical dependency declaration.
    ///
    /// # Errors
    ///
    /// See [`DependencyDeclaration::new`].
    pub fn critical<I, S>(
        target_module: &str,
        required_capabilities: I,
    ) -> Result<Self, ModuleDomainError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(target_module, required_capabilities, true)
    }

    /// Creates a non-critical dependency declaration.
    ///
    /// # Errors
    ///
    /// See [`DependencyDeclaration::new`].
    pub fn optional<I, S>(
        target_module: &str,
        required_capabilities: I,
    ) -> Result<Self, ModuleDomainError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(target_module, required_capabilities, false)
    }

    /// Returns the module expected to provide the capabilities.
    #[must_use]
    pub const fn target_module(&self) -> &ModuleName {
        &self.target_module
    }

    /// Returns the required capability names.
    #[must_use]
    pub fn required_capabilities(&self) -> &[CapabilityName] {
        &self.required_capabilities
    }

    /// Returns whether a missing capability escalates module health.
    #[must_use]
    pub const fn is_critical(&self) -> bool {
        self.is_critical
    }

    /// Evaluates the declaration given the capabilities that did not resolve.
    #[must_use]
    pub fn evaluate(&self, missing: Vec<CapabilityName>) -> DependencyStatus {
        let status = match (missing.is_empty(), self.is_critical) {
            (true, _) => DependencyHealth::Healthy,
            (false, true) => DependencyHealth::Error,
            (false, false) => DependencyHealth::Degraded,
        };
        DependencyStatus {
            target_module: self.target_module.clone(),
            required: self.required_capabilities.clone(),
            missing,
            is_critical: self.is_critical,
            status,
        }
    }
}

/// Resolved state of one dependency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DependencyHealth {
    /// Every required capability resolved.
    Healthy,
    /// A non-critical capability is missing.
    Degraded,
    /// A critical capability is missing.
    Error,
}

impl DependencyHealth {
    /// Returns the canonical string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Healthy => "healthy",
            Self::Degraded => "degraded",
            Self::Error => "error",
        }
    }

    /// Returns the severity rank; higher is worse.
    #[must_use]
    pub const fn severity(self) -> u8 {
        match self {
            Self::Healthy => 0,
            Self::Degraded => 1,
            Self::Error => 2,
        }
    }
}

impl fmt::Display for DependencyHealth {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl FromStr for DependencyHealth {
    type Err = ParseDependencyHealthError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "healthy" => Ok(Self::Healthy),
            "degraded" => Ok(Self::Degraded),
            "error" => Ok(Self::Error),
            _ => Err(ParseDependencyHealthError(value.to_owned())),
        }
    }
}

/// Outcome of probing the registry for one dependency declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyStatus {
    target_module: ModuleName,
    required: Vec<CapabilityName>,
    missing: Vec<CapabilityName>,
    is_critical: bool,
    status: DependencyHealth,
}

impl DependencyStatus {
    /// Returns the module expected to provide the capabilities.
    #[must_use]
    pub const fn target_module(&self) -> &ModuleName {
        &self.target_module
    }

    /// Returns every capability the dependency requires.
    #[must_use]
    pub fn required(&self) -> &[CapabilityName] {
        &self.required
    }

    /// Returns the required capabilities that did not resolve.
    #[must_use]
    pub fn missing(&self) -> &[CapabilityName] {
        &self.missing
    }

    /// Returns whether the dependency is critical.
    #[must_use]
    pub const fn is_critical(&self) -> bool {
        self.is_critical
    }

    /// Returns the resolved dependency health.
    #[must_use]
    pub const fn status(&self) -> DependencyHealth {
        self.status
    }
}

impl TryFrom<&str> for DependencyHealth {
    type Error = ParseDependencyHealthError;

    fn try_from(value: &str) -> Result<Self, ParseDependencyHealthError> {
        value.parse()
    }
}
