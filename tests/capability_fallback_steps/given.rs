//! Given steps for capability fallback BDD scenarios.

use super::world::FallbackWorld;
use corebank_backbone::{
    module_lifecycle::{adapters::StaticBusinessModule, services::ManagedModule},
    service_registry::domain::CapabilityHandle,
};
use eyre::WrapErr;
use rstest_bdd_macros::given;
use std::sync::Arc;

#[given(r#"an active "{module}" module providing "{capability}" version "{version}""#)]
fn active_module_providing(
    world: &mut FallbackWorld,
    module: String,
    capability: String,
    version: String,
) -> Result<(), eyre::Report> {
    let primary = CapabilityHandle::new(format!("{capability}@{version}"));
    let definition =
        StaticBusinessModule::new(module.as_str()).with_capability(&capability, &version, primary.clone());
    let managed = ManagedModule::new(Arc::new(definition), Arc::clone(&world.registry))
        .wrap_err("construct managed module")?;
    if !managed.activate() {
        return Err(eyre::eyre!("module '{module}' failed to activate"));
    }
    world.primaries.insert(capability, primary);
    world.modules.insert(module, managed);
    Ok(())
}

#[given(r#"a fallback registered for "{capability}""#)]
fn fallback_registered(world: &mut FallbackWorld, capability: String) -> Result<(), eyre::Report> {
    let fallback = CapabilityHandle::new(format!("{capability} fallback"));
    if !world.registry.register_fallback(&capability, fallback.clone()) {
        return Err(eyre::eyre!("fallback registration for '{capability}' failed"));
    }
    world.fallbacks.insert(capability, fallback);
    Ok(())
}
