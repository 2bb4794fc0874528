//! Business module lifecycle, dependency health and orchestration.
//!
//! Every business module (accounts, payments, CRM, risk and so on)
//! implements the [`ports::BusinessModule`] contract. The
//! [`services::ManagedModule`] service drives its lifecycle against the
//! shared [`ServiceRegistry`](crate::service_registry::services::ServiceRegistry),
//! and [`services::ModuleRegistry`] activates modules in bulk and
//! aggregates their health. The module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
