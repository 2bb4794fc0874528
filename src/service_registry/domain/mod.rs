//! Domain model for capability registration and discovery.
//!
//! Capabilities are opaque implementation handles keyed by validated name
//! and version. Records carry ownership and activation state; listings are
//! serialisable views for dashboards.

mod batch;
mod capability;
mod error;
mod listing;
mod name;
mod record;
mod version;

pub use batch::{CapabilityBatch, CapabilityKey, CapabilityRegistration, FallbackRegistration};
pub use capability::{CapabilityFn, CapabilityHandle};
pub use error::{CapabilityCallError, ServiceRegistryDomainError};
pub use listing::{CapabilityDescriptor, CapabilityVersionEntry};
pub use name::{CapabilityName, ModuleName};
pub use record::CapabilityRecord;
pub use version::{CapabilityVersion, VersionScope, VersionSelector};
