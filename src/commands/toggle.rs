//! Settings panel switch command handlers.

use anyhow::{anyhow, bail, Context as _};
use sagit_hw::configpanel::SwitchBackend;
use sagit_hw::{PackageManager, ToggleEnv};
use tracing::{info, warn};

use super::{CommandResult, Context};

fn build(ctx: &Context, packages: &PackageManager, name: &str) -> anyhow::Result<Box<dyn SwitchBackend>> {
    let toggle = ctx
        .config
        .toggle(name)
        .ok_or_else(|| anyhow!("no toggle named '{name}' in the config"))?;
    let env = ToggleEnv {
        nodes: ctx.nodes.clone(),
        packages,
        dispatcher: ctx.dispatcher.clone(),
    };
    toggle.build(&env)
}

/// List configured switches
pub fn list(ctx: &Context) -> CommandResult {
    if ctx.config.toggles.is_empty() {
        println!("No toggles configured");
        return Ok(());
    }

    let packages = PackageManager::new();
    println!("{:<20} {:<8} {:<10} default", "name", "kind", "available");
    for toggle in &ctx.config.toggles {
        let kind = format!("{:?}", toggle.kind).to_lowercase();
        match build(ctx, &packages, &toggle.name) {
            Ok(backend) => println!(
                "{:<20} {:<8} {:<10} {}",
                toggle.name,
                kind,
                if backend.is_valid() { "yes" } else { "no" },
                if backend.default_value() { "on" } else { "off" },
            ),
            Err(e) => {
                warn!("{e:#}");
                println!("{:<20} {:<8} {:<10} -", toggle.name, kind, "invalid");
            }
        }
    }
    Ok(())
}

/// Apply a value to a switch
pub fn set(ctx: &Context, name: &str, value: bool) -> CommandResult {
    let mut backend = build(ctx, &PackageManager::new(), name)?;
    if !backend.is_valid() {
        bail!("toggle '{name}' is not available on this device");
    }
    backend
        .set_value(value)
        .with_context(|| format!("setting '{name}'"))?;
    info!("{} set to {}", name, value);
    println!("{name}: {}", if value { "on" } else { "off" });
    Ok(())
}

/// Re-apply a switch's default value
pub fn reset(ctx: &Context, name: &str) -> CommandResult {
    let mut backend = build(ctx, &PackageManager::new(), name)?;
    if !backend.is_valid() {
        bail!("toggle '{name}' is not available on this device");
    }
    backend
        .reset_to_default()
        .with_context(|| format!("resetting '{name}'"))?;
    println!(
        "{name}: {} (default)",
        if backend.value() { "on" } else { "off" }
    );
    Ok(())
}
