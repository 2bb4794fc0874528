//! Lifecycle wrapper binding a business module to the service registry.

use crate::module_lifecycle::{
    domain::{
        DependencyDeclaration, DependencyStatus, ModuleDomainError, ModuleHealthConfig,
        ModuleHealthSnapshot, ModuleHealthStatus, ModuleInfo, ModuleInstanceId,
        ModuleLifecycleState,
    },
    ports::BusinessModule,
};
use crate::service_registry::{
    domain::{ModuleName, VersionSelector},
    services::{ServiceRegistrar, ServiceRegistry},
};
use chrono::{DateTime, Utc};
use mockable::{Clock, DefaultClock};
use std::any::Any;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{debug, error, info, warn};

/// Mutable bookkeeping behind the module lock.
#[derive(Debug)]
struct ModuleRuntime {
    lifecycle: ModuleLifecycleState,
    dependencies: Vec<DependencyDeclaration>,
    last_health: ModuleHealthSnapshot,
    last_error: Option<String>,
    activated_at: Option<DateTime<Utc>>,
}

impl ModuleRuntime {
    fn transition(&mut self, target: ModuleLifecycleState) -> Result<(), ModuleDomainError> {
        if !self.lifecycle.can_transition_to(target) {
            return Err(ModuleDomainError::InvalidLifecycleTransition {
                from: self.lifecycle.as_str().to_owned(),
                to: target.as_str().to_owned(),
            });
        }
        self.lifecycle = target;
        Ok(())
    }
}

fn panic_detail(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|message| (*message).to_owned())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "non-string panic payload".to_owned())
}

/// A business module managed against a shared [`ServiceRegistry`].
///
/// `ManagedModule` owns the lifecycle state machine, the dependency
/// declarations and the latest health snapshot. Activation stages the
/// module's capabilities in a [`ServiceRegistrar`] and commits them in one
/// step, so a module that fails or panics while registering leaves nothing
/// behind in the registry.
///
/// Lifecycle operations never return errors: failures are logged, recorded
/// as the module's last error and reported as `false`.
pub struct ManagedModule<C = DefaultClock>
where
    C: Clock + Send + Sync,
{
    module: Arc<dyn BusinessModule>,
    name: ModuleName,
    instance_id: ModuleInstanceId,
    registry: Arc<ServiceRegistry<C>>,
    config: ModuleHealthConfig,
    runtime: RwLock<ModuleRuntime>,
}

impl<C> ManagedModule<C>
where
    C: Clock + Send + Sync,
{
    /// Wraps `module` with the default health configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ModuleDomainError::Name`] when the module name is invalid.
    pub fn new(
        module: Arc<dyn BusinessModule>,
        registry: Arc<ServiceRegistry<C>>,
    ) -> Result<Self, ModuleDomainError> {
        Self::with_config(module, registry, ModuleHealthConfig::default())
    }

    /// Wraps `module` with an explicit health configuration.
    ///
    /// The module's declared dependencies are recorded and the module moves
    /// from `uninitialized` to `initializing`.
    ///
    /// # Errors
    ///
    /// Returns [`ModuleDomainError::Name`] when the module name is invalid.
    pub fn with_config(
        module: Arc<dyn BusinessModule>,
        registry: Arc<ServiceRegistry<C>>,
        config: ModuleHealthConfig,
    ) -> Result<Self, ModuleDomainError> {
        let name = ModuleName::new(module.name())?;
        let mut runtime = ModuleRuntime {
            lifecycle: ModuleLifecycleState::Uninitialized,
            dependencies: module.dependencies(),
            last_health: ModuleHealthSnapshot::initializing(registry.clock().utc()),
            last_error: None,
            activated_at: None,
        };
        runtime.transition(ModuleLifecycleState::Initializing)?;
        debug!(
            module = %name,
            dependencies = runtime.dependencies.len(),
            "module initialized"
        );
        Ok(Self {
            module,
            name,
            instance_id: ModuleInstanceId::new(),
            registry,
            config,
            runtime: RwLock::new(runtime),
        })
    }

    fn read_runtime(&self) -> RwLockReadGuard<'_, ModuleRuntime> {
        self.runtime.read().unwrap_or_else(|poisoned| {
            error!(module = %self.name, "module state lock poisoned; recovering");
            poisoned.into_inner()
        })
    }

    fn write_runtime(&self) -> RwLockWriteGuard<'_, ModuleRuntime> {
        self.runtime.write().unwrap_or_else(|poisoned| {
            error!(module = %self.name, "module state lock poisoned; recovering");
            poisoned.into_inner()
        })
    }

    /// Returns the validated module name.
    #[must_use]
    pub const fn name(&self) -> &ModuleName {
        &self.name
    }

    /// Returns the identifier of this module instance.
    #[must_use]
    pub const fn instance_id(&self) -> ModuleInstanceId {
        self.instance_id
    }

    /// Returns the registry the module publishes into.
    #[must_use]
    pub const fn registry(&self) -> &Arc<ServiceRegistry<C>> {
        &self.registry
    }

    /// Returns the wrapped business module.
    #[must_use]
    pub fn business_module(&self) -> &dyn BusinessModule {
        self.module.as_ref()
    }

    /// Returns the health configuration.
    #[must_use]
    pub const fn config(&self) -> &ModuleHealthConfig {
        &self.config
    }

    /// Returns the current lifecycle state.
    #[must_use]
    pub fn state(&self) -> ModuleLifecycleState {
        self.read_runtime().lifecycle
    }

    /// Returns the declared dependencies.
    #[must_use]
    pub fn dependencies(&self) -> Vec<DependencyDeclaration> {
        self.read_runtime().dependencies.clone()
    }

    /// Returns the most recent health snapshot.
    #[must_use]
    pub fn last_health(&self) -> ModuleHealthSnapshot {
        self.read_runtime().last_health.clone()
    }

    /// Returns the detail of the last failure, if any.
    #[must_use]
    pub fn last_error(&self) -> Option<String> {
        self.read_runtime().last_error.clone()
    }

    /// Records an additional dependency.
    ///
    /// Declarations are metadata only and accumulate; duplicates are kept.
    #[must_use]
    pub fn register_dependency(&self, dependency: DependencyDeclaration) -> bool {
        debug!(
            module = %self.name,
            target = %dependency.target_module(),
            critical = dependency.is_critical(),
            "dependency declared"
        );
        self.write_runtime().dependencies.push(dependency);
        true
    }

    /// Publishes the module's capabilities and marks the module active.
    ///
    /// A registration error or panic moves the module to `error`. Nothing
    /// staged during the attempt reaches the registry, and capabilities left
    /// over from an earlier activation are deactivated.
    #[must_use]
    pub fn activate(&self) -> bool {
        let current = self.state();
        if !current.can_transition_to(ModuleLifecycleState::Active) {
            warn!(module = %self.name, state = %current, "module cannot be activated");
            return false;
        }

        let mut registrar = ServiceRegistrar::new(self.name.clone());
        let outcome = catch_unwind(AssertUnwindSafe(|| {
            self.module.register_services(&mut registrar)
        }));
        let failure = match outcome {
            Ok(Ok(())) => None,
            Ok(Err(err)) => Some(err.to_string()),
            Err(payload) => Some(format!(
                "panicked while registering services: {}",
                panic_detail(payload.as_ref())
            )),
        };
        if let Some(detail) = failure {
            return self.abort_activation(detail);
        }

        let staged = registrar.staged_count();
        if !self.registry.commit(registrar.into_batch()) {
            return self.abort_activation("service registry rejected the capability batch");
        }

        let now = self.registry.clock().utc();
        let mut runtime = self.write_runtime();
        if let Err(err) = runtime.transition(ModuleLifecycleState::Active) {
            drop(runtime);
            return self.fail("activate", err.to_string());
        }
        runtime.last_error = None;
        runtime.activated_at = Some(now);
        drop(runtime);

        info!(module = %self.name, capabilities = staged, "module activated");
        true
    }

    /// Deactivates every capability the module owns.
    ///
    /// Refused while the module is in `error`; only [`activate`](Self::activate)
    /// leaves that state.
    #[must_use]
    pub fn deactivate(&self) -> bool {
        let current = self.state();
        if current == ModuleLifecycleState::Error {
            warn!(module = %self.name, "module in error state cannot be deactivated");
            return false;
        }
        if !current.can_transition_to(ModuleLifecycleState::Inactive) {
            warn!(module = %self.name, state = %current, "module cannot be deactivated");
            return false;
        }
        if !self.registry.deactivate_module(self.name.as_str()) {
            return self.fail("deactivate", "service registry could not deactivate the module");
        }

        let mut runtime = self.write_runtime();
        if let Err(err) = runtime.transition(ModuleLifecycleState::Inactive) {
            drop(runtime);
            return self.fail("deactivate", err.to_string());
        }
        drop(runtime);

        info!(module = %self.name, "module deactivated");
        true
    }

    fn abort_activation(&self, detail: impl Into<String>) -> bool {
        if !self.registry.deactivate_module(self.name.as_str()) {
            warn!(module = %self.name, "previously published capabilities could not be withdrawn");
        }
        self.fail("activate", detail)
    }

    fn fail(&self, operation: &'static str, detail: impl Into<String>) -> bool {
        let message = detail.into();
        error!(module = %self.name, operation, error = %message, "module lifecycle operation failed");
        let now = self.registry.clock().utc();
        let mut runtime = self.write_runtime();
        runtime.lifecycle = ModuleLifecycleState::Error;
        runtime.last_health = ModuleHealthSnapshot::error(now, message.clone());
        runtime.last_error = Some(message);
        false
    }

    /// Resolves every declared dependency against the registry.
    ///
    /// Each required capability is looked up at its latest version; a
    /// registered fallback counts as resolved.
    #[must_use]
    pub fn check_dependencies(&self) -> Vec<DependencyStatus> {
        self.dependencies()
            .iter()
            .map(|dependency| {
                let missing = dependency
                    .required_capabilities()
                    .iter()
                    .filter(|capability| {
                        self.registry
                            .resolve(capability, &VersionSelector::Latest)
                            .is_none()
                    })
                    .cloned()
                    .collect();
                dependency.evaluate(missing)
            })
            .collect()
    }

    /// Derives and records the module's current health.
    ///
    /// Health mirrors the lifecycle state:
    ///
    /// - `active` evaluates dependencies and then runs the module's own probe;
    /// - `inactive`, meaning deactivated after running, reports `inactive`;
    /// - a module that was never activated (`uninitialized` or
    ///   `initializing`) reports `initializing`, not `inactive`;
    /// - `error` reports `error` with the last recorded failure.
    #[must_use]
    pub async fn check_health(&self) -> ModuleHealthSnapshot {
        let now = self.registry.clock().utc();
        let (lifecycle, last_error) = {
            let runtime = self.read_runtime();
            (runtime.lifecycle, runtime.last_error.clone())
        };

        let snapshot = match lifecycle {
            ModuleLifecycleState::Inactive => ModuleHealthSnapshot::inactive(now),
            ModuleLifecycleState::Uninitialized | ModuleLifecycleState::Initializing => {
                ModuleHealthSnapshot::initializing(now)
            }
            ModuleLifecycleState::Error => ModuleHealthSnapshot::error(
                now,
                last_error.unwrap_or_else(|| "module is in error state".to_owned()),
            ),
            ModuleLifecycleState::Active => self.evaluate_active(now).await,
        };

        debug!(module = %self.name, status = %snapshot.status(), "module health checked");
        self.write_runtime().last_health = snapshot.clone();
        snapshot
    }

    async fn evaluate_active(&self, now: DateTime<Utc>) -> ModuleHealthSnapshot {
        let dependencies = self.check_dependencies();
        let status =
            ModuleHealthStatus::from_dependencies(&dependencies, self.config.critical_failure);
        let missing: Vec<String> = dependencies
            .iter()
            .flat_map(|dependency| dependency.missing().iter().map(ToString::to_string))
            .collect();

        if let Err(reason) = self.run_probe().await {
            warn!(module = %self.name, error = %reason, "module health probe failed");
            return ModuleHealthSnapshot::error(now, reason).with_dependencies(dependencies);
        }

        let snapshot = ModuleHealthSnapshot::new(status, now).with_dependencies(dependencies);
        if missing.is_empty() {
            snapshot
        } else {
            snapshot.with_message(format!("missing capabilities: {}", missing.join(", ")))
        }
    }

    async fn run_probe(&self) -> Result<(), String> {
        let Some(limit) = self.config.probe_timeout else {
            return self.module.probe_health().await.map_err(|err| err.to_string());
        };
        tokio::time::timeout(limit, self.module.probe_health())
            .await
            .map_err(|_| format!("health probe timed out after {}ms", limit.as_millis()))?
            .map_err(|err| err.to_string())
    }

    /// Returns a serialisable summary of the module.
    #[must_use]
    pub fn get_info(&self) -> ModuleInfo {
        let capabilities = self.registry.module_capabilities(self.name.as_str());
        let runtime = self.read_runtime();
        ModuleInfo {
            name: self.name.clone(),
            version: self.module.version().to_owned(),
            description: self.module.description().to_owned(),
            instance_id: self.instance_id,
            state: runtime.lifecycle,
            dependencies: runtime.dependencies.clone(),
            capabilities,
            last_health: runtime.last_health.clone(),
            last_error: runtime.last_error.clone(),
            activated_at: runtime.activated_at,
        }
    }
}
