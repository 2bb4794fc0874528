//! Error types for module lifecycle validation and parsing.

use crate::service_registry::domain::ServiceRegistryDomainError;
use thiserror::Error;

/// Errors returned while constructing or transitioning module domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ModuleDomainError {
    /// A module name, capability name or version failed validation.
    #[error(transparent)]
    Name(#[from] ServiceRegistryDomainError),

    /// Transitioning between two lifecycle states is invalid.
    #[error("invalid module lifecycle transition: {from} -> {to}")]
    InvalidLifecycleTransition {
        /// Current lifecycle state.
        from: String,
        /// Requested target lifecycle state.
        to: String,
    },
}

/// Error returned while parsing a lifecycle state.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown module lifecycle state: {0}")]
pub struct ParseModuleLifecycleStateError(pub String);

/// Error returned while parsing a module health status.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown module health status: {0}")]
pub struct ParseModuleHealthStatusError(pub String);

/// Error returned while parsing a dependency health value.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown dependency health: {0}")]
pub struct ParseDependencyHealthError(pub String);
