//! When steps for capability fallback BDD scenarios.

use super::world::FallbackWorld;
use rstest_bdd_macros::when;

#[when(r#""{capability}" is resolved at version "{version}""#)]
fn resolve_capability(world: &mut FallbackWorld, capability: String, version: String) {
    world.last_resolved = world.registry.get_service(&capability, &version);
    world.last_capability = Some(capability);
}

#[when(r#"the "{module}" module is deactivated"#)]
fn deactivate_module(world: &mut FallbackWorld, module: String) -> Result<(), eyre::Report> {
    if !world.module(&module)?.deactivate() {
        return Err(eyre::eyre!("module '{module}' failed to deactivate"));
    }
    Ok(())
}

#[when(r#"the "{module}" module is activated"#)]
fn activate_module(world: &mut FallbackWorld, module: String) -> Result<(), eyre::Report> {
    if !world.module(&module)?.activate() {
        return Err(eyre::eyre!("module '{module}' failed to activate"));
    }
    Ok(())
}

#[when(r#"version "{version}" of "{capability}" is deactivated"#)]
fn deactivate_version(
    world: &mut FallbackWorld,
    version: String,
    capability: String,
) -> Result<(), eyre::Report> {
    if !world.registry.deactivate_service(&capability, &version) {
        return Err(eyre::eyre!("no '{capability}' version '{version}' to deactivate"));
    }
    Ok(())
}
