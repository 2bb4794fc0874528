//! Then steps for capability fallback BDD scenarios.

use super::world::FallbackWorld;
use corebank_backbone::service_registry::domain::CapabilityHandle;
use rstest_bdd_macros::then;
use std::collections::HashMap;

fn expect_resolved_to(
    world: &FallbackWorld,
    expected: &HashMap<String, CapabilityHandle>,
    kind: &str,
) -> Result<(), eyre::Report> {
    let capability = world.last_capability()?;
    let wanted = expected
        .get(capability)
        .ok_or_else(|| eyre::eyre!("no {kind} implementation recorded for '{capability}'"))?;
    match world.last_resolved.as_ref() {
        Some(resolved) if resolved.ptr_eq(wanted) => Ok(()),
        Some(resolved) => Err(eyre::eyre!(
            "expected the {kind} implementation of '{capability}', got {:?}",
            resolved.downcast_ref::<String>()
        )),
        None => Err(eyre::eyre!(
            "expected the {kind} implementation of '{capability}', nothing resolved"
        )),
    }
}

#[then("the primary implementation is returned")]
fn primary_returned(world: &FallbackWorld) -> Result<(), eyre::Report> {
    expect_resolved_to(world, &world.primaries, "primary")
}

#[then("the fallback implementation is returned")]
fn fallback_returned(world: &FallbackWorld) -> Result<(), eyre::Report> {
    expect_resolved_to(world, &world.fallbacks, "fallback")
}

#[then("no implementation is returned")]
fn nothing_returned(world: &FallbackWorld) -> Result<(), eyre::Report> {
    let capability = world.last_capability()?;
    if let Some(resolved) = world.last_resolved.as_ref() {
        return Err(eyre::eyre!(
            "expected '{capability}' to be unavailable, got {:?}",
            resolved.downcast_ref::<String>()
        ));
    }
    Ok(())
}
