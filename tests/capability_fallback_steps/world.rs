//! Shared world state for capability fallback BDD scenarios.

use std::collections::HashMap;
use std::sync::Arc;

use corebank_backbone::{
    module_lifecycle::services::ManagedModule,
    service_registry::{domain::CapabilityHandle, services::ServiceRegistry},
};
use rstest::fixture;

/// Scenario world for capability fallback behaviour tests.
pub struct FallbackWorld {
    /// The shared service registry under test.
    pub registry: Arc<ServiceRegistry>,
    /// Managed modules keyed by name.
    pub modules: HashMap<String, ManagedModule>,
    /// Primary implementations keyed by capability name.
    pub primaries: HashMap<String, CapabilityHandle>,
    /// Fallback implementations keyed by capability name.
    pub fallbacks: HashMap<String, CapabilityHandle>,
    /// Capability name of the last lookup.
    pub last_capability: Option<String>,
    /// Result of the last lookup.
    pub last_resolved: Option<CapabilityHandle>,
}

impl FallbackWorld {
    /// Creates a world around an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            registry: Arc::new(ServiceRegistry::new()),
            modules: HashMap::new(),
            primaries: HashMap::new(),
            fallbacks: HashMap::new(),
            last_capability: None,
            last_resolved: None,
        }
    }

    /// Returns the managed module registered under `name`.
    ///
    /// # Errors
    ///
    /// Returns an error when no such module was set up.
    pub fn module(&self, name: &str) -> Result<&ManagedModule, eyre::Report> {
        self.modules
            .get(name)
            .ok_or_else(|| eyre::eyre!("module '{name}' was not set up in this scenario"))
    }

    /// Returns the capability name of the last lookup.
    ///
    /// # Errors
    ///
    /// Returns an error when no lookup has run yet.
    pub fn last_capability(&self) -> Result<&str, eyre::Report> {
        self.last_capability
            .as_deref()
            .ok_or_else(|| eyre::eyre!("no capability has been resolved yet"))
    }
}

impl Default for FallbackWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> FallbackWorld {
    FallbackWorld::default()
}
