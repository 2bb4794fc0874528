//! The shared in-process service registry.

use crate::service_registry::domain::{
    CapabilityBatch, CapabilityDescriptor, CapabilityHandle, CapabilityKey, CapabilityName,
    CapabilityRecord, CapabilityRegistration, CapabilityVersion, CapabilityVersionEntry,
    ModuleName, ServiceRegistryDomainError, VersionScope, VersionSelector,
};
use mockable::{Clock, DefaultClock};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{debug, error, info, warn};

/// The three maps behind the registry lock.
#[derive(Debug, Default)]
struct RegistryState {
    services: HashMap<CapabilityName, BTreeMap<CapabilityVersion, CapabilityRecord>>,
    fallbacks: HashMap<CapabilityName, CapabilityHandle>,
    module_index: HashMap<ModuleName, BTreeSet<CapabilityKey>>,
}

/// How a lookup was satisfied.
enum Resolution {
    Primary(CapabilityHandle),
    Fallback(CapabilityHandle),
    Miss,
}

impl RegistryState {
    /// Inserts or overwrites a record, returning the previous owner if any.
    fn insert(
        &mut self,
        registration: CapabilityRegistration,
        clock: &impl Clock,
    ) -> Option<ModuleName> {
        let CapabilityRegistration {
            key,
            implementation,
            owning_module,
        } = registration;
        let record = CapabilityRecord::new(
            key.name().clone(),
            key.version().clone(),
            implementation,
            owning_module.clone(),
            clock,
        );
        let previous_owner = self
            .services
            .entry(key.name().clone())
            .or_default()
            .insert(key.version().clone(), record)
            .map(|previous| previous.owning_module().clone());

        if let Some(previous) = previous_owner.as_ref().filter(|prev| **prev != owning_module) {
            self.release_ownership(previous, &key);
        }
        self.module_index
            .entry(owning_module)
            .or_default()
            .insert(key);
        previous_owner
    }

    fn release_ownership(&mut self, module: &ModuleName, key: &CapabilityKey) {
        let now_empty = self.module_index.get_mut(module).is_some_and(|keys| {
            keys.remove(key);
            keys.is_empty()
        });
        if now_empty {
            self.module_index.remove(module);
        }
    }

    fn record_mut(&mut self, key: &CapabilityKey) -> Option<&mut CapabilityRecord> {
        self.services
            .get_mut(key.name())
            .and_then(|versions| versions.get_mut(key.version()))
    }

    fn contains(&self, key: &CapabilityKey) -> bool {
        self.services
            .get(key.name())
            .is_some_and(|versions| versions.contains_key(key.version()))
    }

    fn resolve(&self, name: &CapabilityName, selector: &VersionSelector) -> Resolution {
        let primary = self.services.get(name).and_then(|versions| match selector {
            VersionSelector::Latest => versions.values().rev().find(|record| record.is_active()),
            VersionSelector::Exact(version) => {
                versions.get(version).filter(|record| record.is_active())
            }
        });

        match (primary, self.fallbacks.get(name)) {
            (Some(record), _) => Resolution::Primary(record.implementation().clone()),
            (None, Some(fallback)) => Resolution::Fallback(fallback.clone()),
            (None, None) => Resolution::Miss,
        }
    }

    /// Toggles the versions of `name` within `scope`; `None` when nothing matched.
    fn set_active(
        &mut self,
        name: &CapabilityName,
        scope: &VersionScope,
        active: bool,
        clock: &impl Clock,
    ) -> Option<usize> {
        let versions = self.services.get_mut(name)?;
        let mut toggled = 0_usize;
        for record in versions
            .values_mut()
            .filter(|record| scope.includes(record.version()))
        {
            toggle(record, active, clock);
            toggled += 1;
        }
        (toggled > 0).then_some(toggled)
    }
}

fn toggle(record: &mut CapabilityRecord, active: bool, clock: &impl Clock) {
    if active {
        record.activate(clock);
    } else {
        record.deactivate(clock);
    }
}

const fn toggle_label(active: bool) -> &'static str {
    if active { "activated" } else { "deactivated" }
}

fn accept<T>(
    result: Result<T, ServiceRegistryDomainError>,
    operation: &'static str,
) -> Option<T> {
    result
        .map_err(|err| warn!(operation, error = %err, "rejected service registry input"))
        .ok()
}

/// In-process catalog of named, versioned capabilities.
///
/// One instance is constructed at process bootstrap and shared as an
/// `Arc` with every module. All three backing maps (capabilities, fallbacks
/// and the module ownership index) sit behind a single [`RwLock`]: lookups
/// take the read lock and each mutation, including module-wide toggles and
/// batch commits, runs inside one write-lock acquisition. Concurrent readers
/// therefore never observe a partially toggled module.
///
/// Every operation is total. Invalid input, unknown keys and a poisoned lock
/// are logged and reported as `false` or `None`.
///
/// # Examples
///
/// ```
/// use corebank_backbone::service_registry::{
///     domain::CapabilityHandle, services::ServiceRegistry,
/// };
///
/// let registry = ServiceRegistry::new();
/// let primary = CapabilityHandle::new("process-v1");
/// let fallback = CapabilityHandle::new("queue-for-later");
///
/// assert!(registry.register("pay.process", primary.clone(), "1.0.0", "payments"));
/// assert!(registry.register_fallback("pay.process", fallback.clone()));
/// assert!(registry.get_latest("pay.process").expect("primary").ptr_eq(&primary));
///
/// assert!(registry.deactivate_service("pay.process", "all"));
/// assert!(registry.get_latest("pay.process").expect("fallback").ptr_eq(&fallback));
/// ```
pub struct ServiceRegistry<C = DefaultClock>
where
    C: Clock + Send + Sync,
{
    state: RwLock<RegistryState>,
    clock: Arc<C>,
}

impl ServiceRegistry<DefaultClock> {
    /// Creates an empty registry using the system clock.
    #[must_use]
    pub fn new() -> Self {
        Self::with_clock(Arc::new(DefaultClock))
    }
}

impl Default for ServiceRegistry<DefaultClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> ServiceRegistry<C>
where
    C: Clock + Send + Sync,
{
    /// Creates an empty registry with an explicit clock.
    #[must_use]
    pub fn with_clock(clock: Arc<C>) -> Self {
        Self {
            state: RwLock::new(RegistryState::default()),
            clock,
        }
    }

    /// Returns the clock used to timestamp records.
    #[must_use]
    pub const fn clock(&self) -> &Arc<C> {
        &self.clock
    }

    fn read_state(&self, operation: &'static str) -> Option<RwLockReadGuard<'_, RegistryState>> {
        self.state
            .read()
            .map_err(|err| error!(operation, error = %err, "service registry lock poisoned"))
            .ok()
    }

    fn write_state(&self, operation: &'static str) -> Option<RwLockWriteGuard<'_, RegistryState>> {
        self.state
            .write()
            .map_err(|err| error!(operation, error = %err, "service registry lock poisoned"))
            .ok()
    }

    /// Registers `implementation` under `(name, version)` for `module`.
    ///
    /// An existing entry with the same key is overwritten, reset to active
    /// and, if another module owned it, moved to `module`.
    #[must_use]
    pub fn register(
        &self,
        name: &str,
        implementation: CapabilityHandle,
        version: &str,
        module: &str,
    ) -> bool {
        let parsed = CapabilityName::new(name).and_then(|capability| {
            Ok(CapabilityRegistration {
                key: CapabilityKey::new(capability, CapabilityVersion::new(version)?),
                implementation,
                owning_module: ModuleName::new(module)?,
            })
        });
        let Some(registration) = accept(parsed, "register") else {
            return false;
        };
        let Some(mut state) = self.write_state("register") else {
            return false;
        };

        let key = registration.key.clone();
        let owner = registration.owning_module.clone();
        let previous_owner = state.insert(registration, &*self.clock);
        drop(state);

        match previous_owner {
            Some(previous) if previous != owner => info!(
                capability = %key,
                module = %owner,
                previous_module = %previous,
                "capability re-registered under a new owner"
            ),
            Some(_) => debug!(capability = %key, module = %owner, "capability re-registered"),
            None => info!(capability = %key, module = %owner, "capability registered"),
        }
        true
    }

    /// Applies every registration staged in `batch` under one lock.
    ///
    /// Either the whole batch becomes visible or, when the lock is poisoned,
    /// none of it does.
    #[must_use]
    pub fn commit(&self, batch: CapabilityBatch) -> bool {
        let Some(mut state) = self.write_state("commit") else {
            return false;
        };

        let (module, capabilities, fallbacks) = batch.into_parts();
        let capability_count = capabilities.len();
        let fallback_count = fallbacks.len();
        for registration in capabilities {
            state.insert(registration, &*self.clock);
        }
        for fallback in fallbacks {
            state.fallbacks.insert(fallback.name, fallback.implementation);
        }
        drop(state);

        info!(
            module = %module,
            capabilities = capability_count,
            fallbacks = fallback_count,
            "capability batch committed"
        );
        true
    }

    /// Resolves `name` at `version`, which is `"latest"` or an exact version.
    ///
    /// `"latest"` picks the highest active version. An unknown name, an
    /// unregistered version or an inactive entry resolves to the fallback
    /// when one is registered, otherwise to `None`.
    #[must_use]
    pub fn get_service(&self, name: &str, version: &str) -> Option<CapabilityHandle> {
        let capability = accept(CapabilityName::new(name), "get_service")?;
        let selector = accept(VersionSelector::parse(version), "get_service")?;
        self.resolve(&capability, &selector)
    }

    /// Resolves the highest active version of `name`.
    #[must_use]
    pub fn get_latest(&self, name: &str) -> Option<CapabilityHandle> {
        self.get_service(name, "latest")
    }

    /// Resolves a capability from already validated values.
    #[must_use]
    pub fn resolve(
        &self,
        name: &CapabilityName,
        selector: &VersionSelector,
    ) -> Option<CapabilityHandle> {
        let resolution = self.read_state("resolve")?.resolve(name, selector);
        match resolution {
            Resolution::Primary(handle) => Some(handle),
            Resolution::Fallback(handle) => {
                debug!(capability = %name, version = %selector, "resolved to fallback");
                Some(handle)
            }
            Resolution::Miss => {
                debug!(capability = %name, version = %selector, "capability not available");
                None
            }
        }
    }

    /// Registers the fallback for `name`, replacing any previous one.
    #[must_use]
    pub fn register_fallback(&self, name: &str, implementation: CapabilityHandle) -> bool {
        let Some(capability) = accept(CapabilityName::new(name), "register_fallback") else {
            return false;
        };
        let Some(mut state) = self.write_state("register_fallback") else {
            return false;
        };
        let replaced = state
            .fallbacks
            .insert(capability.clone(), implementation)
            .is_some();
        drop(state);

        info!(capability = %capability, replaced, "fallback registered");
        true
    }

    /// Returns whether a fallback is registered for `name`.
    #[must_use]
    pub fn has_fallback(&self, name: &str) -> bool {
        let Some(capability) = accept(CapabilityName::new(name), "has_fallback") else {
            return false;
        };
        self.read_state("has_fallback")
            .is_some_and(|state| state.fallbacks.contains_key(&capability))
    }

    /// Activates `name` at `version`, which is `"all"` or an exact version.
    #[must_use]
    pub fn activate_service(&self, name: &str, version: &str) -> bool {
        self.toggle_service(name, version, true)
    }

    /// Deactivates `name` at `version`, which is `"all"` or an exact version.
    #[must_use]
    pub fn deactivate_service(&self, name: &str, version: &str) -> bool {
        self.toggle_service(name, version, false)
    }

    fn toggle_service(&self, name: &str, version: &str, active: bool) -> bool {
        let operation = if active {
            "activate_service"
        } else {
            "deactivate_service"
        };
        let Some(capability) = accept(CapabilityName::new(name), operation) else {
            return false;
        };
        let Some(scope) = accept(VersionScope::parse(version), operation) else {
            return false;
        };
        let Some(mut state) = self.write_state(operation) else {
            return false;
        };
        let toggled = state.set_active(&capability, &scope, active, &*self.clock);
        drop(state);

        toggled.map_or_else(
            || {
                warn!(capability = %capability, version = %scope, "no matching capability to toggle");
                false
            },
            |count| {
                info!(
                    capability = %capability,
                    version = %scope,
                    versions = count,
                    "capability {}",
                    toggle_label(active)
                );
                true
            },
        )
    }

    /// Activates every capability owned by `module` in one step.
    #[must_use]
    pub fn activate_module(&self, module: &str) -> bool {
        self.toggle_module(module, true)
    }

    /// Deactivates every capability owned by `module` in one step.
    ///
    /// Exactly the `(name, version)` entries the module registered are
    /// toggled. The ownership index is checked before anything changes, so
    /// the module is either fully deactivated or left untouched. A module
    /// that owns nothing is reported as successfully deactivated.
    #[must_use]
    pub fn deactivate_module(&self, module: &str) -> bool {
        self.toggle_module(module, false)
    }

    fn toggle_module(&self, module: &str, active: bool) -> bool {
        let operation = if active {
            "activate_module"
        } else {
            "deactivate_module"
        };
        let Some(owner) = accept(ModuleName::new(module), operation) else {
            return false;
        };
        let Some(mut state) = self.write_state(operation) else {
            return false;
        };

        let keys: Vec<CapabilityKey> = state
            .module_index
            .get(&owner)
            .map(|keys| keys.iter().cloned().collect())
            .unwrap_or_default();
        if keys.is_empty() {
            debug!(module = %owner, "module owns no capabilities");
            return true;
        }
        if let Some(dangling) = keys.iter().find(|key| !state.contains(key)) {
            error!(
                module = %owner,
                capability = %dangling,
                "ownership index references an unregistered capability; module left untouched"
            );
            return false;
        }

        for key in &keys {
            if let Some(record) = state.record_mut(key) {
                toggle(record, active, &*self.clock);
            }
        }
        drop(state);

        info!(
            module = %owner,
            capabilities = keys.len(),
            "module capabilities {}",
            toggle_label(active)
        );
        true
    }

    /// Returns the `(name, version)` entries owned by `module`.
    #[must_use]
    pub fn module_capabilities(&self, module: &str) -> Vec<CapabilityKey> {
        let Some(owner) = accept(ModuleName::new(module), "module_capabilities") else {
            return Vec::new();
        };
        self.read_state("module_capabilities")
            .and_then(|state| {
                state
                    .module_index
                    .get(&owner)
                    .map(|keys| keys.iter().cloned().collect())
            })
            .unwrap_or_default()
    }

    /// Lists the active versions of every registered capability.
    ///
    /// Capabilities whose versions are all inactive map to an empty list.
    #[must_use]
    pub fn list_services(&self) -> BTreeMap<CapabilityName, Vec<CapabilityVersion>> {
        let Some(state) = self.read_state("list_services") else {
            return BTreeMap::new();
        };
        state
            .services
            .iter()
            .map(|(name, versions)| {
                let active = versions
                    .values()
                    .filter(|record| record.is_active())
                    .map(|record| record.version().clone())
                    .collect();
                (name.clone(), active)
            })
            .collect()
    }

    /// Describes every registered version, its owner and activation state.
    #[must_use]
    pub fn list_all_services(&self) -> BTreeMap<CapabilityName, CapabilityDescriptor> {
        let Some(state) = self.read_state("list_all_services") else {
            return BTreeMap::new();
        };
        state
            .services
            .iter()
            .map(|(name, versions)| {
                let descriptor = CapabilityDescriptor {
                    versions: versions
                        .values()
                        .map(|record| CapabilityVersionEntry {
                            version: record.version().clone(),
                            owning_module: record.owning_module().clone(),
                            active: record.is_active(),
                        })
                        .collect(),
                    has_fallback: state.fallbacks.contains_key(name),
                };
                (name.clone(), descriptor)
            })
            .collect()
    }
}
