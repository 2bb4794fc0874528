//! Registered capability record.

use super::{CapabilityHandle, CapabilityKey, CapabilityName, CapabilityVersion, ModuleName};
use chrono::{DateTime, Utc};
use mockable::Clock;

/// One registered `(name, version)` capability and its activation state.
///
/// Records are created by registration and afterwards only toggled between
/// active and inactive; re-registering the same key replaces the record.
#[derive(Debug, Clone)]
pub struct CapabilityRecord {
    name: CapabilityName,
    version: CapabilityVersion,
    implementation: CapabilityHandle,
    owning_module: ModuleName,
    active: bool,
    registered_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl CapabilityRecord {
    /// Creates an active capability record.
    #[must_use]
    pub fn new(
        name: CapabilityName,
        version: CapabilityVersion,
        implementation: CapabilityHandle,
        owning_module: ModuleName,
        clock: &impl Clock,
    ) -> Self {
        let timestamp = clock.utc();
        Self {
            name,
            version,
            implementation,
            owning_module,
            active: true,
            registered_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Returns the capability name.
    #[must_use]
    pub const fn name(&self) -> &CapabilityName {
        &self.name
    }

    /// Returns the capability version.
    #[must_use]
    pub const fn version(&self) -> &CapabilityVersion {
        &self.version
    }

    /// Returns the `(name, version)` key of this record.
    #[must_use]
    pub fn key(&self) -> CapabilityKey {
        CapabilityKey::new(self.name.clone(), self.version.clone())
    }

    /// Returns the implementation handle.
    #[must_use]
    pub const fn implementation(&self) -> &CapabilityHandle {
        &self.implementation
    }

    /// Returns the module that registered this capability.
    #[must_use]
    pub const fn owning_module(&self) -> &ModuleName {
        &self.owning_module
    }

    /// Returns whether the capability is currently active.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.active
    }

    /// Returns the registration timestamp.
    #[must_use]
    pub const fn registered_at(&self) -> DateTime<Utc> {
        self.registered_at
    }

    /// Returns the latest activation toggle timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Marks the capability active.
    pub fn activate(&mut self, clock: &impl Clock) {
        self.active = true;
        self.touch(clock);
    }

    /// Marks the capability inactive.
    pub fn deactivate(&mut self, clock: &impl Clock) {
        self.active = false;
        self.touch(clock);
    }

    fn touch(&mut self, clock: &impl Clock) {
        self.updated_at = clock.utc();
    }
}
