//! WLAN MAC persist file command handler.

use std::path::Path;

use anyhow::Context as _;
use sagit_hw::{ensure_wlan_mac, MacAddress, MacOutcome};

use super::CommandResult;

pub fn readmac(path: &Path, mac: Option<&str>) -> CommandResult {
    let known = mac.map(str::parse::<MacAddress>).transpose()?;
    let outcome =
        ensure_wlan_mac(path, known).with_context(|| format!("writing {}", path.display()))?;

    match outcome {
        MacOutcome::AlreadyValid => println!("{} already valid", path.display()),
        MacOutcome::Written(mac) => println!("{}: wrote {mac}", path.display()),
        MacOutcome::Randomized(mac) => println!("{}: wrote randomized {mac}", path.display()),
    }
    Ok(())
}
