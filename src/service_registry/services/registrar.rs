//! Staging area used by modules while publishing their capabilities.

use crate::service_registry::domain::{
    CapabilityBatch, CapabilityCallError, CapabilityHandle, CapabilityKey, CapabilityName,
    CapabilityVersion, ModuleName, ServiceRegistryDomainError,
};
use serde_json::Value;
use tracing::debug;

/// Collects the capabilities a module publishes during activation.
///
/// Names and versions are validated as they are staged, so a module can
/// bail out with `?` on the first invalid entry. Nothing reaches the
/// [`ServiceRegistry`](super::ServiceRegistry) until the staged batch is
/// committed, which keeps a failed activation from leaving the module
/// half-registered.
#[derive(Debug, Clone)]
pub struct ServiceRegistrar {
    batch: CapabilityBatch,
}

impl ServiceRegistrar {
    /// Creates an empty registrar for `module`.
    #[must_use]
    pub const fn new(module: ModuleName) -> Self {
        Self {
            batch: CapabilityBatch::new(module),
        }
    }

    /// Returns the module the registrar stages capabilities for.
    #[must_use]
    pub const fn module(&self) -> &ModuleName {
        self.batch.module()
    }

    /// Stages a capability implementation.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceRegistryDomainError`] when the name or version is
    /// invalid.
    pub fn register(
        &mut self,
        name: &str,
        version: &str,
        implementation: CapabilityHandle,
    ) -> Result<&mut Self, ServiceRegistryDomainError> {
        let key = CapabilityKey::new(CapabilityName::new(name)?, CapabilityVersion::new(version)?);
        debug!(module = %self.module(), capability = %key, "capability staged");
        self.batch.push_capability(key, implementation);
        Ok(self)
    }

    /// Stages a capability following the JSON calling convention.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceRegistryDomainError`] when the name or version is
    /// invalid.
    pub fn register_callable<F>(
        &mut self,
        name: &str,
        version: &str,
        function: F,
    ) -> Result<&mut Self, ServiceRegistryDomainError>
    where
        F: Fn(Value) -> Result<Value, CapabilityCallError> + Send + Sync + 'static,
    {
        self.register(name, version, CapabilityHandle::callable(function))
    }

    /// Stages a fallback implementation for `name`.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceRegistryDomainError`] when the name is invalid.
    pub fn register_fallback(
        &mut self,
        name: &str,
        implementation: CapabilityHandle,
    ) -> Result<&mut Self, ServiceRegistryDomainError> {
        let capability = CapabilityName::new(name)?;
        debug!(module = %self.module(), capability = %capability, "fallback staged");
        self.batch.push_fallback(capability, implementation);
        Ok(self)
    }

    /// Returns the number of staged capabilities and fallbacks.
    #[must_use]
    pub fn staged_count(&self) -> usize {
        self.batch.len()
    }

    /// Consumes the registrar, returning the staged batch.
    #[must_use]
    pub fn into_batch(self) -> CapabilityBatch {
        self.batch
    }
}
