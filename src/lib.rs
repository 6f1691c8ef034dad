// Xiaomi Mi 6 (sagit) hardware helpers - shared library
// Config file, Android service adapters and the WLAN MAC persist file

pub mod config;
pub mod host;
pub mod readmac;

pub use config::{Config, KeyPathsConfig, ToggleConfig, ToggleEnv, ToggleKind};
pub use host::{ActivityManager, PackageManager};
pub use readmac::{ensure_wlan_mac, MacAddress, MacOutcome, WLAN_MAC_BIN};

pub use sagit_configpanel as configpanel;
pub use sagit_hardware as hardware;
pub use sagit_sysfs as sysfs;
