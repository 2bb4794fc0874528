//! Corebank backbone: capability registry and module lifecycle.
//!
//! This crate is the in-process backbone of a modular banking backend.
//! Business modules such as accounts, payments or CRM publish named,
//! versioned capabilities into a shared registry and resolve each other's
//! capabilities through it instead of linking against one another.
//!
//! # Architecture
//!
//! The crate follows hexagonal architecture principles:
//!
//! - **Domain**: validated names, versions, lifecycle states and health
//!   snapshots with no infrastructure dependencies
//! - **Ports**: the [`module_lifecycle::ports::BusinessModule`] contract
//! - **Adapters**: an in-memory declarative business module
//! - **Services**: the service registry, the managed module lifecycle and
//!   the module orchestrator
//!
//! # Modules
//!
//! - [`service_registry`]: capability registration, versioned lookup,
//!   fallbacks and module-scoped activation
//! - [`module_lifecycle`]: business module lifecycle, dependency health and
//!   bulk orchestration
//! - [`telemetry`]: tracing subscriber installation

pub mod module_lifecycle;
pub mod service_registry;
pub mod telemetry;
