//! Shared fixtures and module builders for in-memory integration tests.

use corebank_backbone::{
    module_lifecycle::{
        adapters::StaticBusinessModule, domain::DependencyDeclaration, services::ModuleRegistry,
    },
    service_registry::{domain::CapabilityHandle, services::ServiceRegistry},
};
use rstest::fixture;
use std::sync::Arc;

/// Provides a fresh shared service registry.
#[fixture]
pub fn service_registry() -> Arc<ServiceRegistry> {
    Arc::new(ServiceRegistry::new())
}

/// Provides a module registry over a fresh service registry.
#[fixture]
pub fn module_registry() -> ModuleRegistry {
    ModuleRegistry::new(Arc::new(ServiceRegistry::new()))
}

/// Creates a handle labelled with `label` for identity checks.
#[must_use]
pub fn labelled(label: &str) -> CapabilityHandle {
    CapabilityHandle::new(label.to_owned())
}

/// Returns the label stored in a handle built by [`labelled`].
#[must_use]
pub fn label_of(handle: Option<&CapabilityHandle>) -> Option<&str> {
    handle
        .and_then(CapabilityHandle::downcast_ref::<String>)
        .map(String::as_str)
}

/// Builds the accounts module publishing balance and account-opening
/// capabilities.
#[must_use]
pub fn accounts_module() -> StaticBusinessModule {
    StaticBusinessModule::new("accounts")
        .with_description("Customer accounts and balances")
        .with_capability("accounts.get_balance", "1.0.0", labelled("balance-v1"))
        .with_capability("accounts.open", "1.0.0", labelled("open-v1"))
}

/// Builds the payments module, critically dependent on account balances.
///
/// # Panics
///
/// Panics if the hard-coded dependency declaration is invalid.
#[must_use]
pub fn payments_module() -> StaticBusinessModule {
    StaticBusinessModule::new("payments")
        .with_description("Payment processing")
        .with_dependency(
            DependencyDeclaration::critical("accounts", ["accounts.get_balance"])
                .expect("valid dependency"),
        )
        .with_capability("pay.process", "1.0.0", labelled("pay-v1"))
        .with_fallback("pay.process", labelled("pay-queue"))
}

/// Builds the CRM module with an optional dependency on risk scoring.
///
/// # Panics
///
/// Panics if the hard-coded dependency declaration is invalid.
#[must_use]
pub fn crm_module() -> StaticBusinessModule {
    StaticBusinessModule::new("crm")
        .with_dependency(
            DependencyDeclaration::optional("risk", ["risk.score"]).expect("valid dependency"),
        )
        .with_capability("crm.lookup", "1.0.0", labelled("crm-v1"))
}
