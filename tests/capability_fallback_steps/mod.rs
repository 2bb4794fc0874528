//! Step definitions for capability fallback scenarios.

mod given;
mod then;
mod when;
pub mod world;
