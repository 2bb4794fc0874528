//! Registry of managed modules and bulk lifecycle operations.

use super::ManagedModule;
use crate::module_lifecycle::{
    domain::{
        ModuleDomainError, ModuleHealthConfig, ModuleHealthSnapshot, ModuleHealthStatus,
        ModuleInfo,
    },
    ports::BusinessModule,
};
use crate::service_registry::{domain::ModuleName, services::ServiceRegistry};
use mockable::{Clock, DefaultClock};
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use thiserror::Error;
use tracing::{info, warn};

/// Errors returned by [`ModuleRegistry`] operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ModuleRegistryError {
    /// The module could not be constructed.
    #[error(transparent)]
    Domain(#[from] ModuleDomainError),

    /// A module with the same name is already registered.
    #[error("module '{0}' is already registered")]
    DuplicateModule(ModuleName),

    /// No module with the given name is registered.
    #[error("module '{0}' is not registered")]
    UnknownModule(String),

    /// The module publishes into a different service registry.
    #[error("module '{0}' is bound to a different service registry")]
    ForeignRegistry(ModuleName),

    /// The module failed to activate.
    #[error("module '{module}' failed to activate: {reason}")]
    ActivationFailed {
        /// Module name.
        module: ModuleName,
        /// Recorded failure detail.
        reason: String,
    },

    /// The module failed to deactivate.
    #[error("module '{module}' failed to deactivate: {reason}")]
    DeactivationFailed {
        /// Module name.
        module: ModuleName,
        /// Recorded failure detail.
        reason: String,
    },

    /// The module table lock was poisoned.
    #[error("module registry state is poisoned")]
    StatePoisoned,
}

/// Result type for module registry operations.
pub type ModuleRegistryResult<T> = Result<T, ModuleRegistryError>;

/// One module that a bulk lifecycle operation could not process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LifecycleFailure {
    /// Module name as requested.
    pub module: String,
    /// Failure detail.
    pub reason: String,
}

/// Outcome of a bulk lifecycle operation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LifecycleReport {
    succeeded: Vec<ModuleName>,
    failed: Vec<LifecycleFailure>,
}

impl LifecycleReport {
    /// Returns the modules processed successfully, in processing order.
    #[must_use]
    pub fn succeeded(&self) -> &[ModuleName] {
        &self.succeeded
    }

    /// Returns the modules that failed, in processing order.
    #[must_use]
    pub fn failed(&self) -> &[LifecycleFailure] {
        &self.failed
    }

    /// Returns whether every module was processed successfully.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    fn record(&mut self, module: &str, outcome: ModuleRegistryResult<ModuleName>) {
        match outcome {
            Ok(name) => self.succeeded.push(name),
            Err(err) => self.failed.push(LifecycleFailure {
                module: module.to_owned(),
                reason: err.to_string(),
            }),
        }
    }
}

struct ModuleTable<C>
where
    C: Clock + Send + Sync,
{
    order: Vec<ModuleName>,
    modules: HashMap<ModuleName, Arc<ManagedModule<C>>>,
}

/// Orchestrates the business modules sharing one [`ServiceRegistry`].
///
/// Modules are kept in registration order. Bulk activation follows that
/// order (or one supplied by the caller) and shutdown runs in reverse; no
/// dependency ordering is inferred.
pub struct ModuleRegistry<C = DefaultClock>
where
    C: Clock + Send + Sync,
{
    registry: Arc<ServiceRegistry<C>>,
    config: ModuleHealthConfig,
    table: RwLock<ModuleTable<C>>,
}

impl<C> ModuleRegistry<C>
where
    C: Clock + Send + Sync,
{
    /// Creates an empty module registry over the shared service registry.
    #[must_use]
    pub fn new(registry: Arc<ServiceRegistry<C>>) -> Self {
        Self::with_config(registry, ModuleHealthConfig::default())
    }

    /// Creates an empty module registry with an explicit health configuration.
    #[must_use]
    pub fn with_config(registry: Arc<ServiceRegistry<C>>, config: ModuleHealthConfig) -> Self {
        Self {
            registry,
            config,
            table: RwLock::new(ModuleTable {
                order: Vec::new(),
                modules: HashMap::new(),
            }),
        }
    }

    /// Returns the shared service registry.
    #[must_use]
    pub const fn service_registry(&self) -> &Arc<ServiceRegistry<C>> {
        &self.registry
    }

    /// Returns the health configuration applied to modules built here.
    #[must_use]
    pub const fn config(&self) -> &ModuleHealthConfig {
        &self.config
    }

    fn read_table(&self) -> ModuleRegistryResult<RwLockReadGuard<'_, ModuleTable<C>>> {
        self.table
            .read()
            .map_err(|_| ModuleRegistryError::StatePoisoned)
    }

    fn write_table(&self) -> ModuleRegistryResult<RwLockWriteGuard<'_, ModuleTable<C>>> {
        self.table
            .write()
            .map_err(|_| ModuleRegistryError::StatePoisoned)
    }

    /// Adds an already constructed module.
    ///
    /// # Errors
    ///
    /// Returns [`ModuleRegistryError::DuplicateModule`] when the name is
    /// taken, [`ModuleRegistryError::ForeignRegistry`] when the module
    /// publishes into another service registry, or
    /// [`ModuleRegistryError::StatePoisoned`].
    pub fn register_module(&self, module: Arc<ManagedModule<C>>) -> ModuleRegistryResult<()> {
        let name = module.name().clone();
        if !Arc::ptr_eq(module.registry(), &self.registry) {
            return Err(ModuleRegistryError::ForeignRegistry(name));
        }
        let mut table = self.write_table()?;
        if table.modules.contains_key(&name) {
            return Err(ModuleRegistryError::DuplicateModule(name));
        }
        table.order.push(name.clone());
        table.modules.insert(name.clone(), module);
        drop(table);

        info!(module = %name, "module registered");
        Ok(())
    }

    /// Wraps a business module with the shared registry and adds it.
    ///
    /// # Errors
    ///
    /// Returns [`ModuleRegistryError::Domain`] when the module name is
    /// invalid, or any error of [`register_module`](Self::register_module).
    pub fn register_business_module(
        &self,
        module: Arc<dyn BusinessModule>,
    ) -> ModuleRegistryResult<Arc<ManagedModule<C>>> {
        let managed = Arc::new(ManagedModule::with_config(
            module,
            Arc::clone(&self.registry),
            self.config,
        )?);
        self.register_module(Arc::clone(&managed))?;
        Ok(managed)
    }

    /// Returns the module registered under `name`.
    #[must_use]
    pub fn get_module(&self, name: &str) -> Option<Arc<ManagedModule<C>>> {
        let key = ModuleName::new(name).ok()?;
        self.read_table().ok()?.modules.get(&key).cloned()
    }

    /// Returns module names in registration order.
    #[must_use]
    pub fn module_names(&self) -> Vec<ModuleName> {
        self.read_table()
            .map(|table| table.order.clone())
            .unwrap_or_default()
    }

    /// Describes every module in registration order.
    #[must_use]
    pub fn list_modules(&self) -> Vec<ModuleInfo> {
        self.snapshot_modules()
            .iter()
            .map(|module| module.get_info())
            .collect()
    }

    fn snapshot_modules(&self) -> Vec<Arc<ManagedModule<C>>> {
        self.read_table()
            .map(|table| {
                table
                    .order
                    .iter()
                    .filter_map(|name| table.modules.get(name).cloned())
                    .collect()
            })
            .unwrap_or_default()
    }

    fn require_module(&self, name: &str) -> ModuleRegistryResult<Arc<ManagedModule<C>>> {
        let key =
            ModuleName::new(name).map_err(|_| ModuleRegistryError::UnknownModule(name.to_owned()))?;
        self.read_table()?
            .modules
            .get(&key)
            .cloned()
            .ok_or_else(|| ModuleRegistryError::UnknownModule(name.to_owned()))
    }

    /// Activates one module.
    ///
    /// # Errors
    ///
    /// Returns [`ModuleRegistryError::UnknownModule`] for an unregistered
    /// name or [`ModuleRegistryError::ActivationFailed`] with the module's
    /// recorded error.
    pub fn activate_module(&self, name: &str) -> ModuleRegistryResult<()> {
        let module = self.require_module(name)?;
        Self::activate(&module).map(|_| ())
    }

    /// Deactivates one module.
    ///
    /// # Errors
    ///
    /// Returns [`ModuleRegistryError::UnknownModule`] for an unregistered
    /// name or [`ModuleRegistryError::DeactivationFailed`].
    pub fn deactivate_module(&self, name: &str) -> ModuleRegistryResult<()> {
        let module = self.require_module(name)?;
        Self::deactivate(&module).map(|_| ())
    }

    fn activate(module: &ManagedModule<C>) -> ModuleRegistryResult<ModuleName> {
        if module.activate() {
            return Ok(module.name().clone());
        }
        Err(ModuleRegistryError::ActivationFailed {
            module: module.name().clone(),
            reason: failure_reason(module),
        })
    }

    fn deactivate(module: &ManagedModule<C>) -> ModuleRegistryResult<ModuleName> {
        if module.deactivate() {
            return Ok(module.name().clone());
        }
        Err(ModuleRegistryError::DeactivationFailed {
            module: module.name().clone(),
            reason: failure_reason(module),
        })
    }

    /// Activates every module in registration order.
    ///
    /// A failing module is reported and the sweep continues.
    #[must_use]
    pub fn activate_all(&self) -> LifecycleReport {
        let mut report = LifecycleReport::default();
        for module in self.snapshot_modules() {
            report.record(module.name().as_str(), Self::activate(&module));
        }
        log_report("activate_all", &report);
        report
    }

    /// Activates the named modules in the given order.
    ///
    /// Unknown names are reported as failures.
    #[must_use]
    pub fn activate_in_order<I, S>(&self, names: I) -> LifecycleReport
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut report = LifecycleReport::default();
        for requested in names {
            let name = requested.as_ref();
            let outcome = self
                .require_module(name)
                .and_then(|module| Self::activate(&module));
            report.record(name, outcome);
        }
        log_report("activate_in_order", &report);
        report
    }

    /// Deactivates every module in reverse registration order.
    ///
    /// Modules that were never activated deactivate trivially; modules in
    /// `error` are reported as failures.
    #[must_use]
    pub fn deactivate_all(&self) -> LifecycleReport {
        let mut report = LifecycleReport::default();
        for module in self.snapshot_modules().iter().rev() {
            report.record(module.name().as_str(), Self::deactivate(module));
        }
        log_report("deactivate_all", &report);
        report
    }

    /// Checks the health of every module, one after another.
    ///
    /// The module list is captured before the sweep; modules registered
    /// while it runs are picked up by the next call.
    #[must_use]
    pub async fn check_health_all(&self) -> BTreeMap<ModuleName, ModuleHealthSnapshot> {
        let mut results = BTreeMap::new();
        for module in self.snapshot_modules() {
            let snapshot = module.check_health().await;
            results.insert(module.name().clone(), snapshot);
        }
        results
    }

    /// Returns the worst status across all modules, or `None` when empty.
    #[must_use]
    pub async fn overall_health(&self) -> Option<ModuleHealthStatus> {
        let snapshots = self.check_health_all().await;
        ModuleHealthStatus::worst(snapshots.values().map(ModuleHealthSnapshot::status))
    }
}

fn failure_reason<C>(module: &ManagedModule<C>) -> String
where
    C: Clock + Send + Sync,
{
    module
        .last_error()
        .unwrap_or_else(|| format!("module is {}", module.state()))
}

fn log_report(operation: &'static str, report: &LifecycleReport) {
    if report.is_success() {
        info!(operation, modules = report.succeeded.len(), "lifecycle sweep completed");
    } else {
        warn!(
            operation,
            succeeded = report.succeeded.len(),
            failed = report.failed.len(),
            "lifecycle sweep completed with failures"
        );
    }
}
