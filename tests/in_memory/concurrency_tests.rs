//! Concurrent access to the shared service registry.

use super::helpers::{labelled, service_registry};
use corebank_backbone::service_registry::services::ServiceRegistry;
use rstest::rstest;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

const LEDGER_CAPABILITIES: usize = 12;

fn ledger_capability(index: usize) -> String {
    format!("ledger.op_{index:02}")
}

#[rstest]
fn snapshots_never_observe_a_half_toggled_module(service_registry: Arc<ServiceRegistry>) {
    for index in 0..LEDGER_CAPABILITIES {
        assert!(service_registry.register(
            &ledger_capability(index),
            labelled("ledger"),
            "1.0.0",
            "ledger"
        ));
    }
    let stop = AtomicBool::new(false);

    thread::scope(|scope| {
        scope.spawn(|| {
            for _ in 0..200 {
                assert!(service_registry.deactivate_module("ledger"));
                assert!(service_registry.activate_module("ledger"));
            }
            stop.store(true, Ordering::SeqCst);
        });

        for _ in 0..3 {
            scope.spawn(|| {
                while !stop.load(Ordering::SeqCst) {
                    let listing = service_registry.list_services();
                    let active = listing.values().filter(|versions| !versions.is_empty()).count();
                    assert!(
                        active == 0 || active == LEDGER_CAPABILITIES,
                        "observed {active} of {LEDGER_CAPABILITIES} ledger capabilities active"
                    );
                }
            });
        }
    });
}

#[rstest]
fn concurrent_registrations_are_all_recorded(service_registry: Arc<ServiceRegistry>) {
    thread::scope(|scope| {
        for worker in 0..4_usize {
            let registry = &service_registry;
            scope.spawn(move || {
                for index in 0..25_usize {
                    let name = format!("worker{worker}.op_{index}");
                    assert!(registry.register(&name, labelled(&name), "1.0.0", "batch"));
                }
            });
        }
    });

    assert_eq!(service_registry.list_services().len(), 100);
    assert_eq!(service_registry.module_capabilities("batch").len(), 100);
}

#[rstest]
fn lookups_proceed_while_fallbacks_change(service_registry: Arc<ServiceRegistry>) {
    assert!(service_registry.register_fallback("pay.process", labelled("queue-a")));
    let stop = AtomicBool::new(false);

    thread::scope(|scope| {
        scope.spawn(|| {
            for label in ["queue-b", "queue-a"].into_iter().cycle().take(100) {
                assert!(service_registry.register_fallback("pay.process", labelled(label)));
            }
            stop.store(true, Ordering::SeqCst);
        });
        scope.spawn(|| {
            while !stop.load(Ordering::SeqCst) {
                assert!(service_registry.get_latest("pay.process").is_some());
            }
        });
    });
}
