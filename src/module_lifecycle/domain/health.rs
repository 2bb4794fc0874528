//! Module health status and snapshots.

use super::{
    CriticalFailureMapping, DependencyHealth, DependencyStatus, ParseModuleHealthStatusError,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Aggregated health of a business module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModuleHealthStatus {
    /// The module has not been activated yet.
    Initializing,
    /// The module and all of its dependencies are available.
    Healthy,
    /// The module works with reduced functionality.
    Degraded,
    /// The module cannot serve requests.
    Error,
    /// The module was deactivated.
    Inactive,
}

impl ModuleHealthStatus {
    /// Returns the canonical string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Initializing => "initializing",
            Self::Healthy => "healthy",
            Self::Degraded => "degraded",
            Self::Error => "error",
            Self::Inactive => "inactive",
        }
    }

    /// Returns the severity rank used when summarising several modules.
    ///
    /// Higher is worse. `inactive` ranks between `degraded` and `error`: a
    /// deactivated module serves nothing but is not failing.
    #[must_use]
    pub const fn severity(self) -> u8 {
        match self {
            Self::Healthy => 0,
            Self::Initializing => 1,
            Self::Degraded => 2,
            Self::Inactive => 3,
            Self::Error => 4,
        }
    }

    /// Derives module health from evaluated dependencies.
    ///
    /// Any failing dependency degrades the module. A failing critical
    /// dependency is reported according to `critical_failure`.
    #[must_use]
    pub fn from_dependencies(
        dependencies: &[DependencyStatus],
        critical_failure: CriticalFailureMapping,
    ) -> Self {
        let worst = dependencies
            .iter()
            .map(DependencyStatus::status)
            .max_by_key(|status| status.severity());
        match worst {
            Some(DependencyHealth::Error) => critical_failure.module_status(),
            Some(DependencyHealth::Degraded) => Self::Degraded,
            Some(DependencyHealth::Healthy) | None => Self::Healthy,
        }
    }

    /// Returns the most severe status, or `None` for an empty input.
    #[must_use]
    pub fn worst(statuses: impl IntoIterator<Item = Self>) -> Option<Self> {
        statuses.into_iter().max_by_key(|status| status.severity())
    }
}

impl fmt::Display for ModuleHealthStatus {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl FromStr for ModuleHealthStatus {
    type Err = ParseModuleHealthStatusError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "initializing" => Ok(Self::Initializing),
            "healthy" => Ok(Self::Healthy),
            "degraded" => Ok(Self::Degraded),
            "error" => Ok(Self::Error),
            "inactive" => Ok(Self::Inactive),
            _ => Err(ParseModuleHealthStatusError(value.to_owned())),
        }
    }
}

/// Point-in-time health of one module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleHealthSnapshot {
    status: ModuleHealthStatus,
    last_check: DateTime<Utc>,
    dependencies: Vec<DependencyStatus>,
    message: Option<String>,
}

impl ModuleHealthSnapshot {
    /// Creates a snapshot without dependency details.
    #[must_use]
    pub const fn new(status: ModuleHealthStatus, last_check: DateTime<Utc>) -> Self {
        Self {
            status,
            last_check,
            dependencies: Vec::new(),
            message: None,
        }
    }

    /// Creates an `initializing` snapshot.
    #[must_use]
    pub const fn initializing(last_check: DateTime<Utc>) -> Self {
        Self::new(ModuleHealthStatus::Initializing, last_check)
    }

    /// Creates an `inactive` snapshot.
    #[must_use]
    pub const fn inactive(last_check: DateTime<Utc>) -> Self {
        Self::new(ModuleHealthStatus::Inactive, last_check)
    }

    /// Creates an `error` snapshot with details.
    #[must_use]
    pub fn error(last_check: DateTime<Utc>, message: impl Into<String>) -> Self {
        Self::new(ModuleHealthStatus::Error, last_check).with_message(message)
    }

    /// Attaches evaluated dependency results.
    #[must_use]
    pub fn with_dependencies(mut self, dependencies: Vec<DependencyStatus>) -> Self {
        self.dependencies = dependencies;
        self
    }

    /// Adds an explanatory message.
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        let normalized = message.into().trim().to_owned();
        if !normalized.is_empty() {
            self.message = Some(normalized);
        }
        self
    }

    /// Returns the health status.
    #[must_use]
    pub const fn status(&self) -> ModuleHealthStatus {
        self.status
    }

    /// Returns the time of the check.
    #[must_use]
    pub const fn last_check(&self) -> DateTime<Utc> {
        self.last_check
    }

    /// Returns per-dependency results.
    #[must_use]
    pub fn dependencies(&self) -> &[DependencyStatus] {
        &self.dependencies
    }

    /// Returns an optional detail message.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }
}

impl TryFrom<&str> for ModuleHealthStatus {
    type Error = ParseModuleHealthStatusError;

    fn try_from(value: &str) -> Result<Self, ParseModuleHealthStatusError> {
        value.parse()
    }
}
