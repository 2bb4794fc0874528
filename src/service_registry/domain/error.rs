//! Error types for capability registration and invocation.

use thiserror::Error;

/// Errors returned while constructing service registry domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ServiceRegistryDomainError {
    /// The capability name is empty after trimming.
    #[error("capability name must not be empty")]
    EmptyCapabilityName,

    /// The module name is empty after trimming.
    #[error("module name must not be empty")]
    EmptyModuleName,

    /// The capability version is empty after trimming.
    #[error("capability version must not be empty")]
    EmptyVersion,
}

/// Errors returned when invoking a capability through its calling convention.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CapabilityCallError {
    /// The handle does not wrap a callable capability.
    #[error("capability of type {type_name} is not callable")]
    NotCallable {
        /// Concrete type stored in the handle.
        type_name: &'static str,
    },

    /// The capability rejected its input payload.
    #[error("invalid capability input: {0}")]
    InvalidInput(String),

    /// The capability failed while executing.
    #[error("capability execution failed: {0}")]
    Failed(String),
}
