//! Module lifecycle state machine.

use super::ParseModuleLifecycleStateError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lifecycle state of a business module.
///
/// Modules move `uninitialized → initializing → active ⇄ inactive`. Any
/// step can fall into `error`, and only a fresh activation leaves it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModuleLifecycleState {
    /// The module object exists but has not declared its dependencies yet.
    Uninitialized,
    /// Dependencies are declared; the module has not been activated.
    Initializing,
    /// The module's capabilities are registered and active.
    Active,
    /// The module was deactivated; its capabilities are inactive.
    Inactive,
    /// Activation or deactivation failed; awaiting a fresh activation.
    Error,
}

impl ModuleLifecycleState {
    /// Returns the canonical string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Uninitialized => "uninitialized",
            Self::Initializing => "initializing",
            Self::Active => "active",
            Self::Inactive => "inactive",
            Self::Error => "error",
        }
    }

    /// Returns whether the module's capabilities are expected to be live.
    #[must_use]
    pub const fn is_active(self) -> bool {
        matches!(self, Self::Active)
    }

    /// Returns whether transition to `target` is allowed.
    #[must_use]
    pub const fn can_transition_to(self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::Uninitialized, Self::Initializing | Self::Error)
                | (
                    Self::Initializing | Self::Active | Self::Inactive,
                    Self::Active | Self::Inactive | Self::Error
                )
                | (Self::Error, Self::Active | Self::Error)
        )
    }
}

impl fmt::Display for ModuleLifecycleState {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl FromStr for ModuleLifecycleState {
    type Err = ParseModuleLifecycleStateError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "uninitialized" => Ok(Self::Uninitialized),
            "initializing" => Ok(Self::Initializing),
            "active" => Ok(Self::Active),
            "inactive" => Ok(Self::Inactive),
            "error" => Ok(Self::Error),
            _ => Err(ParseModuleLifecycleStateError(value.to_owned())),
        }
    }
}

impl TryFrom<&str> for ModuleLifecycleState {
    type Error = ParseModuleLifecycleStateError;

    fn try_from(value: &str) -> Result<Self, ParseModuleLifecycleStateError> {
        value.parse()
    }
}
