//! Contract every business module implements.

use crate::module_lifecycle::domain::DependencyDeclaration;
use crate::service_registry::{domain::ServiceRegistryDomainError, services::ServiceRegistrar};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for a module's own health probe.
pub type ModuleProbeResult = Result<(), ModuleProbeError>;

/// A business module that publishes capabilities into the service registry.
///
/// Implementations describe themselves, declare the modules they depend on
/// and stage their capabilities when asked. Lifecycle bookkeeping, the
/// registry commit and health aggregation are handled by
/// [`ManagedModule`](crate::module_lifecycle::services::ManagedModule).
#[async_trait]
pub trait BusinessModule: Send + Sync {
    /// Returns the module name.
    fn name(&self) -> &str;

    /// Returns the module version.
    fn version(&self) -> &str {
        "1.0.0"
    }

    /// Returns a human-readable description.
    fn description(&self) -> &str {
        ""
    }

    /// Returns the dependencies declared at construction.
    fn dependencies(&self) -> Vec<DependencyDeclaration> {
        Vec::new()
    }

    /// Stages every capability the module publishes.
    ///
    /// # Errors
    ///
    /// Returns [`ModuleError`] when the module cannot publish its
    /// capabilities. Nothing staged before the error is committed.
    fn register_services(&self, registrar: &mut ServiceRegistrar) -> Result<(), ModuleError>;

    /// Probes resources the module relies on outside the registry.
    ///
    /// # Errors
    ///
    /// Returns [`ModuleProbeError`] when the module cannot serve requests.
    async fn probe_health(&self) -> ModuleProbeResult {
        Ok(())
    }
}

/// Errors raised by a business module while publishing capabilities.
#[derive(Debug, Clone, Error)]
pub enum ModuleError {
    /// A staged capability name or version was rejected.
    #[error(transparent)]
    Registration(#[from] ServiceRegistryDomainError),

    /// The module could not initialize a resource it needs.
    #[error("module initialization failed: {0}")]
    Initialization(String),

    /// Generic module failure.
    #[error("module error: {0}")]
    Other(Arc<dyn std::error::Error + Send + Sync>),
}

impl ModuleError {
    /// Creates an initialization error.
    pub fn initialization(reason: impl Into<String>) -> Self {
        Self::Initialization(reason.into())
    }

    /// Wraps an arbitrary module error.
    pub fn other(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Other(Arc::new(err))
    }
}

/// Errors reported by a module's own health probe.
#[derive(Debug, Clone, Error)]
pub enum ModuleProbeError {
    /// A resource the module relies on is unavailable.
    #[error("{resource} is unavailable: {reason}")]
    Unavailable {
        /// Resource name, such as a database or upstream service.
        resource: String,
        /// Failure detail.
        reason: String,
    },

    /// Generic probe failure.
    #[error("health probe failed: {0}")]
    Failed(Arc<dyn std::error::Error + Send + Sync>),
}

impl ModuleProbeError {
    /// Creates an unavailable-resource error.
    pub fn unavailable(resource: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Unavailable {
            resource: resource.into(),
            reason: reason.into(),
        }
    }

    /// Wraps an arbitrary probe failure.
    pub fn failed(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Failed(Arc::new(err))
    }
}
