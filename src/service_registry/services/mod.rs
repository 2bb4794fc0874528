//! Service layer for capability registration and discovery.

mod registrar;
mod registry;

pub use registrar::ServiceRegistrar;
pub use registry::ServiceRegistry;
