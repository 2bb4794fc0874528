//! Service registry behaviour through the public API.

use super::helpers::{label_of, labelled, service_registry};
use corebank_backbone::service_registry::{
    domain::{CapabilityName, VersionSelector},
    services::ServiceRegistry,
};
use rstest::rstest;
use std::sync::Arc;

#[rstest]
fn versions_resolve_by_numeric_order(service_registry: Arc<ServiceRegistry>) {
    for version in ["1.0.0", "1.10.0", "1.9.3", "1.2"] {
        assert!(service_registry.register(
            "fx.quote",
            labelled(version),
            version,
            "treasury"
        ));
    }

    assert_eq!(
        label_of(service_registry.get_latest("fx.quote").as_ref()),
        Some("1.10.0")
    );
    assert_eq!(
        label_of(service_registry.get_service("fx.quote", "1.2").as_ref()),
        Some("1.2")
    );
}

#[rstest]
fn typed_resolution_matches_string_lookup(service_registry: Arc<ServiceRegistry>) {
    assert!(service_registry.register("fx.quote", labelled("v1"), "1.0.0", "treasury"));
    let name = CapabilityName::new("fx.quote").expect("valid name");

    let resolved = service_registry.resolve(&name, &VersionSelector::Latest);

    assert_eq!(label_of(resolved.as_ref()), Some("v1"));
}

#[rstest]
fn payment_fallback_round_trip(service_registry: Arc<ServiceRegistry>) {
    assert!(service_registry.register("pay.process", labelled("P1"), "1.0.0", "payments"));
    assert!(service_registry.register_fallback("pay.process", labelled("PF")));

    assert_eq!(
        label_of(service_registry.get_latest("pay.process").as_ref()),
        Some("P1")
    );

    assert!(service_registry.deactivate_service("pay.process", "all"));
    assert_eq!(
        label_of(service_registry.get_latest("pay.process").as_ref()),
        Some("PF")
    );

    assert!(service_registry.activate_service("pay.process", "all"));
    assert_eq!(
        label_of(service_registry.get_latest("pay.process").as_ref()),
        Some("P1")
    );
}

#[rstest]
fn deactivating_one_version_keeps_others_resolvable(service_registry: Arc<ServiceRegistry>) {
    assert!(service_registry.register("crm.lookup", labelled("v1"), "1.0.0", "crm"));
    assert!(service_registry.register("crm.lookup", labelled("v2"), "2.0.0", "crm"));

    assert!(service_registry.deactivate_service("crm.lookup", "2.0.0"));

    assert_eq!(
        label_of(service_registry.get_latest("crm.lookup").as_ref()),
        Some("v1")
    );
    assert!(service_registry.get_service("crm.lookup", "2.0.0").is_none());
    assert!(!service_registry.has_fallback("crm.lookup"));
}

#[rstest]
fn module_toggles_are_scoped_to_the_owner(service_registry: Arc<ServiceRegistry>) {
    assert!(service_registry.register("accounts.open", labelled("open"), "1.0.0", "accounts"));
    assert!(service_registry.register("pay.process", labelled("pay"), "1.0.0", "payments"));

    assert!(service_registry.deactivate_module("accounts"));
    assert!(service_registry.get_latest("accounts.open").is_none());
    assert!(service_registry.get_latest("pay.process").is_some());

    assert!(service_registry.activate_module("accounts"));
    assert!(service_registry.get_latest("accounts.open").is_some());
}

#[rstest]
fn listing_serializes_for_dashboards(service_registry: Arc<ServiceRegistry>) {
    assert!(service_registry.register("pay.process", labelled("pay"), "1.0.0", "payments"));
    assert!(service_registry.register_fallback("pay.process", labelled("queue")));

    let listing = service_registry.list_all_services();
    let json = serde_json::to_value(&listing).expect("listing serializes");

    assert_eq!(json["pay.process"]["has_fallback"], true);
    assert_eq!(json["pay.process"]["versions"][0]["version"], "1.0.0");
    assert_eq!(json["pay.process"]["versions"][0]["owning_module"], "payments");
    assert_eq!(json["pay.process"]["versions"][0]["active"], true);
}
