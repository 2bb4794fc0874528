//! Application services for module lifecycle orchestration.

mod module;
mod orchestrator;

pub use module::ManagedModule;
pub use orchestrator::{
    LifecycleFailure, LifecycleReport, ModuleRegistry, ModuleRegistryError, ModuleRegistryResult,
};
