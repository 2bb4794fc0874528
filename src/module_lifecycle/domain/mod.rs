//! Domain model for module lifecycle and health.
//!
//! Lifecycle states, dependency declarations and their evaluated status,
//! health snapshots, and the configuration that maps dependency failures
//! onto module health. Registry access stays outside this boundary.

mod config;
mod dependency;
mod error;
mod health;
mod ids;
mod info;
mod state;

pub use config::{CriticalFailureMapping, ModuleHealthConfig};
pub use dependency::{DependencyDeclaration, DependencyHealth, DependencyStatus};
pub use error::{
    ModuleDomainError, ParseDependencyHealthError, ParseModuleHealthStatusError,
    ParseModuleLifecycleStateError,
};
pub use health::{ModuleHealthSnapshot, ModuleHealthStatus};
pub use ids::ModuleInstanceId;
pub use info::ModuleInfo;
pub use state::ModuleLifecycleState;
