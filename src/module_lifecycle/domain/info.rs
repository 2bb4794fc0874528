//! Read-only module summary for dashboards and diagnostics.

use super::{DependencyDeclaration, ModuleHealthSnapshot, ModuleInstanceId, ModuleLifecycleState};
use crate::service_registry::domain::{CapabilityKey, ModuleName};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Point-in-time description of a managed module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModuleInfo {
    /// Module name.
    pub name: ModuleName,
    /// Module version.
    pub version: String,
    /// Human-readable description.
    pub description: String,
    /// Identifier of this module instance.
    pub instance_id: ModuleInstanceId,
    /// Current lifecycle state.
    pub state: ModuleLifecycleState,
    /// Declared dependencies.
    pub dependencies: Vec<DependencyDeclaration>,
    /// Capabilities the module currently owns in the registry.
    pub capabilities: Vec<CapabilityKey>,
    /// Most recent health snapshot.
    pub last_health: ModuleHealthSnapshot,
    /// Detail of the last failure, if any.
    pub last_error: Option<String>,
    /// Time of the last successful activation.
    pub activated_at: Option<DateTime<Utc>>,
}
