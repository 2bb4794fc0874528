//! Validated registrations and the batches that carry them into the registry.

use super::{CapabilityHandle, CapabilityName, CapabilityVersion, ModuleName};
use serde::{Deserialize, Serialize};
use std::fmt;

/// `(name, version)` pair identifying exactly one registered capability.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CapabilityKey {
    name: CapabilityName,
    version: CapabilityVersion,
}

impl CapabilityKey {
    /// Creates a capability key.
    #[must_use]
    pub const fn new(name: CapabilityName, version: CapabilityVersion) -> Self {
        Self { name, version }
    }

    /// Returns the capability name.
    #[must_use]
    pub const fn name(&self) -> &CapabilityName {
        &self.name
    }

    /// Returns the capability version.
    #[must_use]
    pub const fn version(&self) -> &CapabilityVersion {
        &self.version
    }
}

impl fmt::Display for CapabilityKey {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}@{}", self.name, self.version)
    }
}

/// A capability ready to be written into the registry.
#[derive(Debug, Clone)]
pub struct CapabilityRegistration {
    /// Capability name and version.
    pub key: CapabilityKey,
    /// Implementation handle.
    pub implementation: CapabilityHandle,
    /// Module that owns the capability.
    pub owning_module: ModuleName,
}

/// A fallback implementation ready to be written into the registry.
#[derive(Debug, Clone)]
pub struct FallbackRegistration {
    /// Capability name the fallback substitutes for.
    pub name: CapabilityName,
    /// Fallback implementation handle.
    pub implementation: CapabilityHandle,
}

/// Capabilities and fallbacks staged by one module, applied all at once.
#[derive(Debug, Clone)]
pub struct CapabilityBatch {
    module: ModuleName,
    capabilities: Vec<CapabilityRegistration>,
    fallbacks: Vec<FallbackRegistration>,
}

impl CapabilityBatch {
    /// Creates an empty batch for `module`.
    #[must_use]
    pub const fn new(module: ModuleName) -> Self {
        Self {
            module,
            capabilities: Vec::new(),
            fallbacks: Vec::new(),
        }
    }

    /// Returns the module that staged the batch.
    #[must_use]
    pub const fn module(&self) -> &ModuleName {
        &self.module
    }

    /// Stages a capability owned by the batch's module.
    pub fn push_capability(&mut self, key: CapabilityKey, implementation: CapabilityHandle) {
        self.capabilities.push(CapabilityRegistration {
            key,
            implementation,
            owning_module: self.module.clone(),
        });
    }

    /// Stages a fallback implementation.
    pub fn push_fallback(&mut self, name: CapabilityName, implementation: CapabilityHandle) {
        self.fallbacks.push(FallbackRegistration {
            name,
            implementation,
        });
    }

    /// Returns the staged capabilities in staging order.
    #[must_use]
    pub fn capabilities(&self) -> &[CapabilityRegistration] {
        &self.capabilities
    }

    /// Returns the staged fallbacks in staging order.
    #[must_use]
    pub fn fallbacks(&self) -> &[FallbackRegistration] {
        &self.fallbacks
    }

    /// Returns the number of staged capabilities and fallbacks.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.capabilities.len() + self.fallbacks.len()
    }

    /// Returns whether nothing has been staged.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.capabilities.is_empty() && self.fallbacks.is_empty()
    }

    /// Splits the batch into its module, capabilities and fallbacks.
    #[must_use]
    pub fn into_parts(
        self,
    ) -> (
        ModuleName,
        Vec<CapabilityRegistration>,
        Vec<FallbackRegistration>,
    ) {
        (self.module, self.capabilities, self.fallbacks)
    }
}
