//! Adapter implementations for business module ports.

mod static_module;

pub use static_module::StaticBusinessModule;
