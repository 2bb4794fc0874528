//! In-process capability registry shared by every business module.
//!
//! Modules publish named, versioned capabilities here and resolve each
//! other's capabilities without compile-time references. The registry
//! handles version resolution, fallback substitution, and activation of
//! capabilities individually or by owning module. The module follows the
//! same layering as the rest of the crate:
//!
//! - Domain types in [`domain`]
//! - Orchestration services in [`services`]

pub mod domain;
pub mod services;

#[cfg(test)]
mod tests;
