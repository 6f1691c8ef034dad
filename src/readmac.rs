//! WLAN MAC persist file
//!
//! The WLAN driver takes its MAC addresses from `/persist/wlan_mac.bin`:
//!
//! ```text
//! Intf0MacAddress=3480B3123456
//! Intf1MacAddress=3480B3123457
//! END
//! ```
//!
//! If the file is missing or incomplete it is regenerated, from a known
//! address when one is available and otherwise from a random address under
//! Xiaomi's OUI.

use std::fmt;
use std::fs;
use std::io;
use std::path::Path;
use std::str::FromStr;

use rand::Rng;
use thiserror::Error;
use tracing::{debug, info};

pub const WLAN_MAC_BIN: &str = "/persist/wlan_mac.bin";

/// Xiaomi OUI used for generated addresses
pub const XIAOMI_MAC_PREFIX: [u8; 3] = [0x34, 0x80, 0xb3];

#[derive(Error, Debug, PartialEq, Eq)]
#[error("Invalid MAC address: {0:?}")]
pub struct MacParseError(String);

/// 48-bit MAC address
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MacAddress(pub [u8; 6]);

impl MacAddress {
    /// Random address under the Xiaomi OUI
    pub fn random_xiaomi<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut bytes = [0u8; 6];
        bytes[..3].copy_from_slice(&XIAOMI_MAC_PREFIX);
        rng.fill(&mut bytes[3..]);
        Self(bytes)
    }

    /// Address of the second interface (last byte + 1, wrapping)
    pub fn next_interface(&self) -> Self {
        let mut bytes = self.0;
        bytes[5] = bytes[5].wrapping_add(1);
        Self(bytes)
    }

    /// Uppercase hex without separators, as used in the persist file
    pub fn to_hex(&self) -> String {
        self.0.iter().map(|b| format!("{b:02X}")).collect()
    }
}

impl fmt::Display for MacAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let b = self.0;
        write!(
            f,
            "{:02X}:{:02X}:{:02X}:{:02X}:{:02X}:{:02X}",
            b[0], b[1], b[2], b[3], b[4], b[5]
        )
    }
}

impl FromStr for MacAddress {
    type Err = MacParseError;

    /// Accepts `34:80:B3:12:34:56`, `34-80-b3-12-34-56` or `3480B3123456`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || MacParseError(s.to_string());
        let hex: String = s.chars().filter(|c| *c != ':' && *c != '-').collect();
        if hex.len() != 12 || !hex.is_ascii() {
            return Err(err());
        }
        let mut bytes = [0u8; 6];
        for (i, byte) in bytes.iter_mut().enumerate() {
            *byte = u8::from_str_radix(&hex[i * 2..i * 2 + 2], 16).map_err(|_| err())?;
        }
        Ok(Self(bytes))
    }
}

/// What `ensure_wlan_mac` did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MacOutcome {
    /// File already had both interface entries; left untouched
    AlreadyValid,
    /// Written from the supplied address
    Written(MacAddress),
    /// Written from a random address
    Randomized(MacAddress),
}

/// True if the file content carries both interface entries
pub fn is_valid_mac_file(content: &str) -> bool {
    if !content.contains("Intf0MacAddress") {
        debug!("missing Intf0MacAddress entry");
        return false;
    }
    if !content.contains("Intf1MacAddress") {
        debug!("missing Intf1MacAddress entry");
        return false;
    }
    true
}

/// Persist file content for an address
pub fn format_mac_file(mac: &MacAddress) -> String {
    format!(
        "Intf0MacAddress={}\nIntf1MacAddress={}\nEND\n",
        mac.to_hex(),
        mac.next_interface().to_hex()
    )
}

/// Make sure a valid persist file exists at `path`
pub fn ensure_wlan_mac(path: &Path, known: Option<MacAddress>) -> io::Result<MacOutcome> {
    ensure_wlan_mac_with(path, known, &mut rand::thread_rng())
}

/// `ensure_wlan_mac` with a caller-provided random source
pub fn ensure_wlan_mac_with<R: Rng + ?Sized>(
    path: &Path,
    known: Option<MacAddress>,
    rng: &mut R,
) -> io::Result<MacOutcome> {
    // The file may carry bytes that are not UTF-8; only the markers matter
    let valid = fs::read(path)
        .map(|content| is_valid_mac_file(&String::from_utf8_lossy(&content)))
        .unwrap_or(false);
    if valid {
        debug!("{} already exists and is valid", path.display());
        return Ok(MacOutcome::AlreadyValid);
    }

    let (mac, outcome) = match known {
        Some(mac) => (mac, MacOutcome::Written(mac)),
        None => {
            let mac = MacAddress::random_xiaomi(rng);
            info!("Using randomized MAC address {}", mac);
            (mac, MacOutcome::Randomized(mac))
        }
    };

    fs::write(path, format_mac_file(&mac))?;
    debug!("{} was successfully generated", path.display());
    Ok(outcome)
}
