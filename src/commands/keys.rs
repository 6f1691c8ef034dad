//! Capacitive key command handlers.

use anyhow::bail;
use sagit_hw::hardware::{KeyDisabler, KeyPath};
use tracing::warn;

use super::{CommandResult, Context};

fn disabler(ctx: &Context) -> KeyDisabler {
    KeyDisabler::with_paths(ctx.nodes.clone(), ctx.config.keys.to_paths())
}

/// Show support and state of each key node
pub fn status(ctx: &Context) -> CommandResult {
    let kd = disabler(ctx);

    println!("Capacitive keys:");
    for key in KeyPath::ALL {
        let path = kd.paths().get(key);
        let state = if !ctx.nodes.exists(path) {
            "absent".to_string()
        } else {
            match ctx.nodes.read_line(path) {
                Ok(value) => format!(
                    "{} ({})",
                    value,
                    if ctx.nodes.is_writable(path) {
                        "writable"
                    } else {
                        "read-only"
                    }
                ),
                Err(e) => format!("unreadable: {e}"),
            }
        };
        println!("  {:<12} {:<60} {}", key.name(), path.display(), state);
    }

    println!("Supported: {}", if kd.is_supported() { "yes" } else { "no" });
    println!(
        "Keys:      {}",
        if kd.is_active()? { "disabled" } else { "enabled" }
    );
    Ok(())
}

/// Exit non-zero unless every key node is writable
pub fn supported(ctx: &Context) -> CommandResult {
    if disabler(ctx).is_supported() {
        println!("yes");
        Ok(())
    } else {
        println!("no");
        std::process::exit(1);
    }
}

/// Disable (`true`) or enable (`false`) the keys
pub fn set_active(ctx: &Context, state: bool) -> CommandResult {
    let kd = disabler(ctx);
    if !kd.is_supported() {
        warn!("Not every key node is writable; writing anyway");
    }

    let report = kd.set_active_report(state);
    for (key, result) in report.results() {
        match result {
            Ok(()) => println!("  {:<12} {}", key.name(), report.value()),
            Err(e) => println!("  {:<12} failed: {e}", key.name()),
        }
    }

    if !report.all_ok() {
        bail!(
            "failed to {} keys on {} of {} nodes",
            if state { "disable" } else { "enable" },
            report.failed().len(),
            KeyPath::ALL.len()
        );
    }
    println!("Keys {}", if state { "disabled" } else { "enabled" });
    Ok(())
}
