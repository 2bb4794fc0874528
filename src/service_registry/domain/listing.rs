//! Serialisable registry views for introspection and dashboards.

use super::{CapabilityVersion, ModuleName};
use serde::{Deserialize, Serialize};

/// One registered version of a capability.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapabilityVersionEntry {
    /// Registered version.
    pub version: CapabilityVersion,
    /// Module owning this version.
    pub owning_module: ModuleName,
    /// Whether this version is currently active.
    pub active: bool,
}

/// Every registered version of one capability name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapabilityDescriptor {
    /// Versions in ascending order.
    pub versions: Vec<CapabilityVersionEntry>,
    /// Whether a fallback is registered for the name.
    pub has_fallback: bool,
}

impl CapabilityDescriptor {
    /// Returns the active versions in ascending order.
    #[must_use]
    pub fn active_versions(&self) -> Vec<&CapabilityVersion> {
        self.versions
            .iter()
            .filter(|entry| entry.active)
            .map(|entry| &entry.version)
            .collect()
    }
}
