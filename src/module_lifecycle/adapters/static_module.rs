//! Declarative in-memory business module.

use crate::module_lifecycle::{
    domain::DependencyDeclaration,
    ports::{BusinessModule, ModuleError, ModuleProbeError, ModuleProbeResult},
};
use crate::service_registry::{
    domain::{CapabilityCallError, CapabilityHandle},
    services::ServiceRegistrar,
};
use async_trait::async_trait;
use serde_json::Value;
use std::panic;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

/// A capability the module publishes on activation.
#[derive(Debug, Clone)]
struct StaticCapability {
    name: String,
    version: String,
    implementation: CapabilityHandle,
}

/// Faults injected at runtime.
#[derive(Debug, Default)]
struct FaultState {
    registration_failure: Option<String>,
    panic_on_registration: bool,
    probe_failure: Option<String>,
    probe_delay: Option<Duration>,
    registration_calls: usize,
}

/// Business module assembled from a fixed list of capabilities.
///
/// The module stages its capabilities and fallbacks in declaration order.
/// Faults can be injected after construction to exercise activation
/// failures, panics and failing or slow health probes without writing a
/// bespoke module type. Clones share the same fault state.
#[derive(Debug, Clone)]
pub struct StaticBusinessModule {
    name: String,
    version: String,
    description: String,
    dependencies: Vec<DependencyDeclaration>,
    capabilities: Vec<StaticCapability>,
    fallbacks: Vec<(String, CapabilityHandle)>,
    faults: Arc<RwLock<FaultState>>,
}

impl StaticBusinessModule {
    /// Creates a module with no capabilities.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: "1.0.0".to_owned(),
            description: String::new(),
            dependencies: Vec::new(),
            capabilities: Vec::new(),
            fallbacks: Vec::new(),
            faults: Arc::new(RwLock::new(FaultState::default())),
        }
    }

    /// Sets the module version.
    #[must_use]
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    /// Sets the module description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Declares a dependency on another module.
    #[must_use]
    pub fn with_dependency(mut self, dependency: DependencyDeclaration) -> Self {
        self.dependencies.push(dependency);
        self
    }

    /// Adds a capability published on activation.
    #[must_use]
    pub fn with_capability(
        mut self,
        name: impl Into<String>,
        version: impl Into<String>,
        implementation: CapabilityHandle,
    ) -> Self {
        self.capabilities.push(StaticCapability {
            name: name.into(),
            version: version.into(),
            implementation,
        });
        self
    }

    /// Adds a capability following the JSON calling convention.
    #[must_use]
    pub fn with_callable<F>(
        self,
        name: impl Into<String>,
        version: impl Into<String>,
        function: F,
    ) -> Self
    where
        F: Fn(Value) -> Result<Value, CapabilityCallError> + Send + Sync + 'static,
    {
        self.with_capability(name, version, CapabilityHandle::callable(function))
    }

    /// Adds a fallback registered on activation.
    #[must_use]
    pub fn with_fallback(mut self, name: impl Into<String>, implementation: CapabilityHandle) -> Self {
        self.fallbacks.push((name.into(), implementation));
        self
    }

    /// Makes subsequent activations fail after staging every capability.
    pub fn fail_registration(&self, reason: impl Into<String>) {
        self.update_faults(|faults| faults.registration_failure = Some(reason.into()));
    }

    /// Makes subsequent activations panic after staging every capability.
    ///
    /// # Panics
    ///
    /// Does not panic itself; the next
    /// [`register_services`](BusinessModule::register_services) call does.
    pub fn panic_on_registration(&self) {
        self.update_faults(|faults| faults.panic_on_registration = true);
    }

    /// Makes the health probe fail with `reason`.
    pub fn fail_probe(&self, reason: impl Into<String>) {
        self.update_faults(|faults| faults.probe_failure = Some(reason.into()));
    }

    /// Delays every health probe by `delay`.
    pub fn delay_probe(&self, delay: Duration) {
        self.update_faults(|faults| faults.probe_delay = Some(delay));
    }

    /// Removes every injected fault.
    pub fn clear_faults(&self) {
        self.update_faults(|faults| {
            let calls = faults.registration_calls;
            *faults = FaultState {
                registration_calls: calls,
                ..FaultState::default()
            };
        });
    }

    /// Returns how many times the module was asked to register its services.
    #[must_use]
    pub fn registration_calls(&self) -> usize {
        self.read_faults(|faults| faults.registration_calls)
    }

    fn update_faults(&self, update: impl FnOnce(&mut FaultState)) {
        let mut faults = self.faults.write().unwrap_or_else(PoisonError::into_inner);
        update(&mut faults);
    }

    fn raise_registration_panic(&self) {
        panic::panic_any(format!("module {} panicked while registering", self.name));
    }

    fn read_faults<R>(&self, read: impl FnOnce(&FaultState) -> R) -> R {
        let faults = self.faults.read().unwrap_or_else(PoisonError::into_inner);
        read(&faults)
    }
}

#[async_trait]
impl BusinessModule for StaticBusinessModule {
    fn name(&self) -> &str {
        &self.name
    }

    fn version(&self) -> &str {
        &self.version
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn dependencies(&self) -> Vec<DependencyDeclaration> {
        self.dependencies.clone()
    }

    fn register_services(&self, registrar: &mut ServiceRegistrar) -> Result<(), ModuleError> {
        self.update_faults(|faults| faults.registration_calls += 1);
        for capability in &self.capabilities {
            registrar.register(
                &capability.name,
                &capability.version,
                capability.implementation.clone(),
            )?;
        }
        for (name, implementation) in &self.fallbacks {
            registrar.register_fallback(name, implementation.clone())?;
        }

        let (failure, panics) =
            self.read_faults(|faults| (faults.registration_failure.clone(), faults.panic_on_registration));
        if panics {
            self.raise_registration_panic();
        }
        failure.map_or(Ok(()), |reason| Err(ModuleError::initialization(reason)))
    }

    async fn probe_health(&self) -> ModuleProbeResult {
        let (failure, delay) =
            self.read_faults(|faults| (faults.probe_failure.clone(), faults.probe_delay));
        if let Some(pause) = delay {
            tokio::time::sleep(pause).await;
        }
        failure.map_or(Ok(()), |reason| {
            Err(ModuleProbeError::unavailable(self.name.clone(), reason))
        })
    }
}
