//! Configuration file for sagit-hw
//!
//! TOML, by default at `~/.config/sagit-hw/config.toml` (or
//! `/vendor/etc/sagit-hw.toml` when there is no per-user config directory).
//! A missing file yields the built-in defaults.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context};
use sagit_configpanel::{
    BroadcastDispatcher, IntentBackend, PackageQuery, SwitchBackend, SysfsSwitchBackend,
};
use sagit_hardware::KeyDisablerPaths;
use sagit_sysfs::NodeIo;
use serde::{Deserialize, Serialize};
use tracing::info;

/// System-wide config location
pub const VENDOR_CONFIG_PATH: &str = "/vendor/etc/sagit-hw.toml";

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Directory every node path is resolved under (default `/`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root: Option<PathBuf>,

    /// Overrides for the key control nodes
    #[serde(default)]
    pub keys: KeyPathsConfig,

    /// Switches offered by the settings panel
    #[serde(default, rename = "toggle", skip_serializing_if = "Vec::is_empty")]
    pub toggles: Vec<ToggleConfig>,
}

/// Key control node overrides; unset entries keep the stock path
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KeyPathsConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub touch_panel: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fpc: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub goodix: Option<PathBuf>,
}

impl KeyPathsConfig {
    pub fn to_paths(&self) -> KeyDisablerPaths {
        let stock = KeyDisablerPaths::default();
        KeyDisablerPaths {
            touch_panel: self.touch_panel.clone().unwrap_or(stock.touch_panel),
            fpc: self.fpc.clone().unwrap_or(stock.fpc),
            goodix: self.goodix.clone().unwrap_or(stock.goodix),
        }
    }
}

/// Backend kind of a configured switch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToggleKind {
    /// Broadcast to a companion app
    Intent,
    /// Write a kernel node
    Sysfs,
}

/// One `[[toggle]]` entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToggleConfig {
    pub name: String,
    pub kind: ToggleKind,
    #[serde(default)]
    pub default: bool,

    // Intent switches
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub package: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extra: Option<String>,

    // Node switches
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub off: Option<String>,
}

/// Collaborators needed to turn a `ToggleConfig` into a backend
pub struct ToggleEnv<'a> {
    pub nodes: Arc<dyn NodeIo>,
    pub packages: &'a dyn PackageQuery,
    pub dispatcher: Arc<dyn BroadcastDispatcher>,
}

impl ToggleConfig {
    /// Build the backend described by this entry
    pub fn build(&self, env: &ToggleEnv<'_>) -> anyhow::Result<Box<dyn SwitchBackend>> {
        match self.kind {
            ToggleKind::Intent => {
                let (package, action, extra) = self.intent_fields()?;
                Ok(Box::new(IntentBackend::new(
                    env.packages,
                    Arc::clone(&env.dispatcher),
                    package,
                    action,
                    extra,
                    self.default,
                )))
            }
            ToggleKind::Sysfs => {
                let path = self.node_path()?;
                let backend = SysfsSwitchBackend::new(Arc::clone(&env.nodes), path, self.default)
                    .with_values(
                        self.on.as_deref().unwrap_or("1"),
                        self.off.as_deref().unwrap_or("0"),
                    );
                Ok(Box::new(backend))
            }
        }
    }

    /// Check that the fields required by this entry's kind are set
    pub fn check(&self) -> anyhow::Result<()> {
        match self.kind {
            ToggleKind::Intent => self.intent_fields().map(|_| ()),
            ToggleKind::Sysfs => self.node_path().map(|_| ()),
        }
    }

    fn intent_fields(&self) -> anyhow::Result<(&str, &str, &str)> {
        let (Some(package), Some(action), Some(extra)) =
            (&self.package, &self.action, &self.extra)
        else {
            bail!(
                "toggle '{}': intent switches need package, action and extra",
                self.name
            );
        };
        if package.is_empty() || action.is_empty() || extra.is_empty() {
            bail!("toggle '{}': package, action and extra must not be empty", self.name);
        }
        Ok((package.as_str(), action.as_str(), extra.as_str()))
    }

    fn node_path(&self) -> anyhow::Result<&Path> {
        match &self.path {
            Some(path) if !path.as_os_str().is_empty() => Ok(path.as_path()),
            _ => bail!("toggle '{}': sysfs switches need a path", self.name),
        }
    }
}

impl Config {
    /// Default config file location
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .map(|dir| dir.join("sagit-hw").join("config.toml"))
            .unwrap_or_else(|| PathBuf::from(VENDOR_CONFIG_PATH))
    }

    /// Load config from a file, falling back to defaults if it does not exist
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            info!("No config at {:?}, using defaults", path);
            return Ok(Self::default());
        }
        let content =
            std::fs::read_to_string(path).with_context(|| format!("reading {:?}", path))?;
        Self::parse(&content).with_context(|| format!("parsing {:?}", path))
    }

    /// Parse config from TOML text
    pub fn parse(content: &str) -> anyhow::Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save config to a file
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Look up a toggle by name
    pub fn toggle(&self, name: &str) -> Option<&ToggleConfig> {
        self.toggles.iter().find(|t| t.name == name)
    }

    fn validate(&self) -> anyhow::Result<()> {
        for (i, toggle) in self.toggles.iter().enumerate() {
            if toggle.name.is_empty() {
                bail!("toggle #{} has an empty name", i + 1);
            }
            if self.toggles[..i].iter().any(|t| t.name == toggle.name) {
                bail!("duplicate toggle name '{}'", toggle.name);
            }
            toggle.check()?;
        }
        Ok(())
    }
}
