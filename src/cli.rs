// CLI definitions using clap

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use sagit_hw::WLAN_MAC_BIN;

#[derive(Parser)]
#[command(name = "sagit-hw")]
#[command(author, version, about = "Xiaomi Mi 6 (sagit) hardware helpers")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Config file path (default: ~/.config/sagit-hw/config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Resolve every kernel node under this directory instead of /
    #[arg(long, global = true, value_name = "DIR")]
    pub root: Option<PathBuf>,

    /// Print broadcasts and node writes instead of performing them
    #[arg(long, global = true)]
    pub dry_run: bool,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Capacitive key control
    #[command(subcommand, visible_alias = "k")]
    Keys(KeysCommands),

    /// Settings panel switches from the config file
    #[command(subcommand, visible_alias = "t")]
    Toggle(ToggleCommands),

    /// Set a light (backlight, buttons, battery, notifications, attention)
    #[command(visible_alias = "l")]
    Light {
        /// Light name
        id: String,
        /// ARGB color (e.g. 0xFFFFFFFF, #FF0000)
        #[arg(long, value_parser = parse_color)]
        color: u32,
        /// Blink on time in milliseconds
        #[arg(long, default_value_t = 0)]
        on_ms: u32,
        /// Blink off time in milliseconds
        #[arg(long, default_value_t = 0)]
        off_ms: u32,
        /// Backlight brightness mode
        #[arg(long, value_enum, default_value = "user")]
        mode: ModeArg,
    },

    /// Make sure the WLAN MAC persist file exists and is complete
    Readmac {
        /// Persist file location
        #[arg(long, default_value = WLAN_MAC_BIN)]
        path: PathBuf,
        /// Known MAC address to store instead of a random one
        #[arg(long)]
        mac: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum KeysCommands {
    /// Show support and current state of every key node
    #[command(visible_alias = "s")]
    Status,
    /// Exit successfully only if all key nodes are writable
    Supported,
    /// Disable the capacitive keys
    #[command(visible_alias = "off")]
    Disable,
    /// Enable the capacitive keys
    #[command(visible_alias = "on")]
    Enable,
}

#[derive(Subcommand)]
pub enum ToggleCommands {
    /// List configured switches
    #[command(visible_alias = "ls")]
    List,
    /// Apply a value to a switch
    Set {
        /// Switch name
        name: String,
        #[arg(value_enum)]
        state: OnOff,
    },
    /// Re-apply a switch's default value
    Reset {
        /// Switch name
        name: String,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum OnOff {
    On,
    Off,
}

impl OnOff {
    pub fn as_bool(self) -> bool {
        matches!(self, OnOff::On)
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum ModeArg {
    User,
    Sensor,
    LowPersistence,
}

/// Parse a hex color with optional `0x` or `#` prefix
pub fn parse_color(s: &str) -> Result<u32, String> {
    let hex = s
        .strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .or_else(|| s.strip_prefix('#'))
        .unwrap_or(s);
    u32::from_str_radix(hex, 16).map_err(|e| format!("invalid color '{s}': {e}"))
}
