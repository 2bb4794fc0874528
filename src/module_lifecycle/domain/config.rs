//! Health evaluation settings shared by managed modules.

use super::ModuleHealthStatus;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default upper bound for a module's own health probe.
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// Module status reported when a critical dependency is missing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CriticalFailureMapping {
    /// The module keeps serving with reduced functionality.
    #[default]
    Degraded,
    /// The module is reported as failing.
    Error,
}

impl CriticalFailureMapping {
    /// Returns the module status this mapping produces.
    #[must_use]
    pub const fn module_status(self) -> ModuleHealthStatus {
        match self {
            Self::Degraded => ModuleHealthStatus::Degraded,
            Self::Error => ModuleHealthStatus::Error,
        }
    }
}

/// Settings for deriving module health.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleHealthConfig {
    /// How a missing critical dependency surfaces in module health.
    pub critical_failure: CriticalFailureMapping,
    /// Upper bound for [`probe_health`](crate::module_lifecycle::ports::BusinessModule::probe_health);
    /// `None` waits indefinitely.
    pub probe_timeout: Option<Duration>,
}

impl Default for ModuleHealthConfig {
    fn default() -> Self {
        Self {
            critical_failure: CriticalFailureMapping::Degraded,
            probe_timeout: Some(DEFAULT_PROBE_TIMEOUT),
        }
    }
}

impl ModuleHealthConfig {
    /// Preset that reports missing critical dependencies as `error`.
    #[must_use]
    pub fn strict() -> Self {
        Self {
            critical_failure: CriticalFailureMapping::Error,
            ..Self::default()
        }
    }

    /// Overrides the critical failure mapping.
    #[must_use]
    pub const fn with_critical_failure(mut self, mapping: CriticalFailureMapping) -> Self {
        self.critical_failure = mapping;
        self
    }

    /// Overrides the probe timeout.
    #[must_use]
    pub const fn with_probe_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.probe_timeout = timeout;
        self
    }
}
