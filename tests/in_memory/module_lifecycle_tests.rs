//! End-to-end module lifecycle flows over a shared registry.

use super::helpers::{
    accounts_module, crm_module, label_of, labelled, module_registry, payments_module,
};
use corebank_backbone::module_lifecycle::{
    adapters::StaticBusinessModule,
    domain::{DependencyHealth, ModuleHealthStatus, ModuleLifecycleState},
    services::ModuleRegistry,
};
use rstest::rstest;
use std::sync::Arc;

fn bootstrap(modules: &ModuleRegistry) {
    for definition in [accounts_module(), payments_module(), crm_module()] {
        modules
            .register_business_module(Arc::new(definition))
            .expect("module registers");
    }
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn bootstrapped_backbone_reports_health_per_module(module_registry: ModuleRegistry) {
    bootstrap(&module_registry);

    let report = module_registry.activate_in_order(["accounts", "payments", "crm"]);
    assert!(report.is_success(), "{:?}", report.failed());

    let health = module_registry.check_health_all().await;
    let status_of = |name: &str| {
        health
            .iter()
            .find(|(module, _)| module.as_str() == name)
            .map(|(_, snapshot)| snapshot.status())
    };
    assert_eq!(status_of("accounts"), Some(ModuleHealthStatus::Healthy));
    assert_eq!(status_of("payments"), Some(ModuleHealthStatus::Healthy));
    assert_eq!(status_of("crm"), Some(ModuleHealthStatus::Degraded));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn losing_a_critical_provider_degrades_dependents(module_registry: ModuleRegistry) {
    bootstrap(&module_registry);
    assert!(module_registry.activate_all().is_success());

    module_registry
        .deactivate_module("accounts")
        .expect("accounts deactivates");

    let payments = module_registry.get_module("payments").expect("payments registered");
    let snapshot = payments.check_health().await;
    assert_eq!(snapshot.status(), ModuleHealthStatus::Degraded);
    assert_eq!(
        snapshot.dependencies().first().map(|dependency| dependency.status()),
        Some(DependencyHealth::Error)
    );

    module_registry
        .activate_module("accounts")
        .expect("accounts reactivates");
    assert_eq!(
        payments.check_health().await.status(),
        ModuleHealthStatus::Healthy
    );
}

#[rstest]
fn payments_fallback_serves_while_payments_is_down(module_registry: ModuleRegistry) {
    bootstrap(&module_registry);
    assert!(module_registry.activate_all().is_success());
    let registry = Arc::clone(module_registry.service_registry());

    assert_eq!(label_of(registry.get_latest("pay.process").as_ref()), Some("pay-v1"));

    module_registry
        .deactivate_module("payments")
        .expect("payments deactivates");
    assert_eq!(
        label_of(registry.get_latest("pay.process").as_ref()),
        Some("pay-queue")
    );

    module_registry
        .activate_module("payments")
        .expect("payments reactivates");
    assert_eq!(label_of(registry.get_latest("pay.process").as_ref()), Some("pay-v1"));
}

#[rstest]
fn failed_activation_is_isolated_from_other_modules(module_registry: ModuleRegistry) {
    let broken = StaticBusinessModule::new("risk")
        .with_capability("risk.score", "1.0.0", labelled("score-v1"));
    broken.fail_registration("model file missing");
    bootstrap(&module_registry);
    module_registry
        .register_business_module(Arc::new(broken.clone()))
        .expect("risk registers");

    let report = module_registry.activate_all();

    assert_eq!(report.succeeded().len(), 3);
    assert_eq!(report.failed().len(), 1);
    let registry = module_registry.service_registry();
    assert!(registry.get_latest("risk.score").is_none());
    assert!(registry.module_capabilities("risk").is_empty());
    let risk = module_registry.get_module("risk").expect("risk registered");
    assert_eq!(risk.state(), ModuleLifecycleState::Error);

    broken.clear_faults();
    module_registry
        .activate_module("risk")
        .expect("risk recovers on a fresh activation");
    assert_eq!(
        label_of(registry.get_latest("risk.score").as_ref()),
        Some("score-v1")
    );
}

#[rstest]
fn shutdown_deactivates_everything(module_registry: ModuleRegistry) {
    bootstrap(&module_registry);
    assert!(module_registry.activate_all().is_success());

    let report = module_registry.deactivate_all();

    assert!(report.is_success());
    let registry = module_registry.service_registry();
    assert!(registry.get_latest("accounts.open").is_none());
    assert_eq!(
        label_of(registry.get_latest("pay.process").as_ref()),
        Some("pay-queue")
    );
    let infos = module_registry.list_modules();
    assert!(infos.iter().all(|info| info.state == ModuleLifecycleState::Inactive));
}
