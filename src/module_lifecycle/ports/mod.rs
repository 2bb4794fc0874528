//! Ports implemented by business modules.

mod business_module;

pub use business_module::{BusinessModule, ModuleError, ModuleProbeError, ModuleProbeResult};
