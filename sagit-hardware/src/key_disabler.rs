//! Capacitive key disabler
//!
//! The Mi 6 home button is a capacitive key wired through the touch panel on
//! some board revisions and through the fingerprint sensor on others (FPC or
//! Goodix, depending on the module fitted). Disabling the keys means writing
//! `0` to every one of these nodes; `1` turns them back on.
//!
//! This is intended for devices on which the keys can be fully replaced by a
//! software navigation bar.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use sagit_sysfs::{NodeIo, SysfsError};
use tracing::{debug, warn};

use crate::error::HardwareError;

/// Touch panel key control
pub const TOUCH_PANEL_PATH: &str = "/proc/touchpanel/capacitive_keys_enable";
/// FPC fingerprint sensor key events
pub const FPC_PATH: &str = "/sys/devices/soc/soc:fingerprint_fpc/enable_key_events";
/// Goodix fingerprint sensor key events
pub const GOODIX_PATH: &str = "/sys/devices/soc/soc:fingerprint_goodix/enable_key_events";

/// Node value meaning "key events disabled"
const KEYS_DISABLED: &str = "0";
/// Node value meaning "key events enabled"
const KEYS_ENABLED: &str = "1";

/// One of the three key control nodes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyPath {
    TouchPanel,
    Fpc,
    Goodix,
}

impl KeyPath {
    /// All nodes, in write order
    pub const ALL: [KeyPath; 3] = [KeyPath::TouchPanel, KeyPath::Fpc, KeyPath::Goodix];

    pub fn name(&self) -> &'static str {
        match self {
            KeyPath::TouchPanel => "touch panel",
            KeyPath::Fpc => "fpc",
            KeyPath::Goodix => "goodix",
        }
    }
}

impl fmt::Display for KeyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Locations of the three key control nodes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyDisablerPaths {
    pub touch_panel: PathBuf,
    pub fpc: PathBuf,
    pub goodix: PathBuf,
}

impl KeyDisablerPaths {
    pub fn get(&self, key: KeyPath) -> &Path {
        match key {
            KeyPath::TouchPanel => &self.touch_panel,
            KeyPath::Fpc => &self.fpc,
            KeyPath::Goodix => &self.goodix,
        }
    }
}

impl Default for KeyDisablerPaths {
    fn default() -> Self {
        Self {
            touch_panel: PathBuf::from(TOUCH_PANEL_PATH),
            fpc: PathBuf::from(FPC_PATH),
            goodix: PathBuf::from(GOODIX_PATH),
        }
    }
}

/// Per-node outcome of `KeyDisabler::set_active_report`
#[derive(Debug)]
pub struct KeyWriteReport {
    value: &'static str,
    results: Vec<(KeyPath, Result<(), SysfsError>)>,
}

impl KeyWriteReport {
    /// Value that was written to every node
    pub fn value(&self) -> &'static str {
        self.value
    }

    /// Result for each node, in write order
    pub fn results(&self) -> &[(KeyPath, Result<(), SysfsError>)] {
        &self.results
    }

    /// True only if every write succeeded
    pub fn all_ok(&self) -> bool {
        self.results.iter().all(|(_, r)| r.is_ok())
    }

    /// Nodes whose write failed
    pub fn failed(&self) -> Vec<KeyPath> {
        self.results
            .iter()
            .filter(|(_, r)| r.is_err())
            .map(|(key, _)| *key)
            .collect()
    }
}

/// Capacitive key disabler over the three key control nodes
///
/// "Active" means the keys are disabled.
pub struct KeyDisabler {
    nodes: Arc<dyn NodeIo>,
    paths: KeyDisablerPaths,
}

impl KeyDisabler {
    /// Create a disabler using the stock node locations
    pub fn new(nodes: Arc<dyn NodeIo>) -> Self {
        Self::with_paths(nodes, KeyDisablerPaths::default())
    }

    /// Create a disabler using custom node locations
    pub fn with_paths(nodes: Arc<dyn NodeIo>, paths: KeyDisablerPaths) -> Self {
        Self { nodes, paths }
    }

    pub fn paths(&self) -> &KeyDisablerPaths {
        &self.paths
    }

    /// True only if all three nodes exist and are writable
    pub fn is_supported(&self) -> bool {
        KeyPath::ALL
            .iter()
            .all(|key| self.nodes.is_writable(self.paths.get(*key)))
    }

    /// True if any present node reports key events disabled
    ///
    /// Nodes that do not exist are skipped; a board only carries the driver
    /// for the sensor actually fitted. A node that exists but cannot be read
    /// is an error.
    pub fn is_active(&self) -> Result<bool, HardwareError> {
        let mut active = false;
        for key in KeyPath::ALL {
            let path = self.paths.get(key);
            if !self.nodes.exists(path) {
                debug!("{} node {} absent, skipping", key, path.display());
                continue;
            }
            if self.nodes.read_line(path)? == KEYS_DISABLED {
                active = true;
            }
        }
        Ok(active)
    }

    /// Disable (`true`) or enable (`false`) the keys on every node
    ///
    /// Returns true only if all three writes succeeded. Writes are not rolled
    /// back when some of them fail.
    pub fn set_active(&self, state: bool) -> bool {
        self.set_active_report(state).all_ok()
    }

    /// Same as `set_active`, keeping the result of each write
    pub fn set_active_report(&self, state: bool) -> KeyWriteReport {
        let value = if state { KEYS_DISABLED } else { KEYS_ENABLED };
        let results = KeyPath::ALL
            .iter()
            .map(|key| {
                let path = self.paths.get(*key);
                let result = self.nodes.write_line(path, value);
                if let Err(e) = &result {
                    warn!("Failed to write {}: {}", path.display(), e);
                }
                (*key, result)
            })
            .collect();
        KeyWriteReport { value, results }
    }
}
