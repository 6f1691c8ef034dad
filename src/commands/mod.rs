//! Command handlers for the CLI application.
//!
//! - `keys`: capacitive key disabler (status, supported, disable, enable)
//! - `toggle`: settings panel switches (list, set, reset)
//! - `lights`: set a light
//! - `readmac`: WLAN MAC persist file

pub mod keys;
pub mod lights;
pub mod readmac;
pub mod toggle;

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;
use sagit_hw::configpanel::{Broadcast, BroadcastDispatcher, PanelError};
use sagit_hw::sysfs::{NodeIo, RootedNodes, SysfsError};
use sagit_hw::{ActivityManager, Config};
use tracing::info;

use crate::cli::Cli;

/// Result type for command handlers
pub type CommandResult = anyhow::Result<()>;

/// Config plus the node and broadcast backends a command runs against
pub struct Context {
    pub config: Config,
    pub nodes: Arc<dyn NodeIo>,
    pub dispatcher: Arc<dyn BroadcastDispatcher>,
}

impl Context {
    /// Build the context from global CLI options
    pub fn from_cli(cli: &Cli) -> anyhow::Result<Self> {
        let config_path = cli.config.clone().unwrap_or_else(Config::default_path);
        let config = Config::load(&config_path)?;

        let root = cli
            .root
            .clone()
            .or_else(|| config.root.clone())
            .unwrap_or_else(|| PathBuf::from("/"));
        info!("Resolving nodes under {:?}", root);

        let mut nodes: Arc<dyn NodeIo> = Arc::new(RootedNodes::with_root(root));
        let dispatcher: Arc<dyn BroadcastDispatcher> = if cli.dry_run {
            nodes = Arc::new(DryRunNodes::new(nodes));
            Arc::new(DryRunDispatcher)
        } else {
            Arc::new(ActivityManager::new())
        };

        Ok(Self {
            config,
            nodes,
            dispatcher,
        })
    }
}

/// Prints broadcasts as JSON instead of sending them
pub struct DryRunDispatcher;

impl BroadcastDispatcher for DryRunDispatcher {
    fn send_as_user(&self, broadcast: &Broadcast) -> Result<(), PanelError> {
        let json = serde_json::to_string(broadcast)
            .map_err(|e| PanelError::Dispatch(format!("serializing broadcast: {e}")))?;
        println!("broadcast (dry run): {json}");
        Ok(())
    }
}

/// Reads real nodes but prints writes instead of performing them
///
/// A dry-run write is remembered, so later reads of the same node in this
/// process see the value that would have been written.
pub struct DryRunNodes {
    inner: Arc<dyn NodeIo>,
    pending: Mutex<HashMap<PathBuf, String>>,
}

impl DryRunNodes {
    pub fn new(inner: Arc<dyn NodeIo>) -> Self {
        Self {
            inner,
            pending: Mutex::new(HashMap::new()),
        }
    }
}

impl NodeIo for DryRunNodes {
    fn exists(&self, path: &Path) -> bool {
        self.inner.exists(path)
    }

    fn is_writable(&self, path: &Path) -> bool {
        self.inner.is_writable(path)
    }

    fn read_line(&self, path: &Path) -> Result<String, SysfsError> {
        if let Some(value) = self.pending.lock().get(path) {
            return Ok(value.clone());
        }
        self.inner.read_line(path)
    }

    fn write_line(&self, path: &Path, value: &str) -> Result<(), SysfsError> {
        // Writes never create nodes
        if !self.inner.exists(path) {
            return Err(SysfsError::NotFound(path.to_path_buf()));
        }
        println!("write (dry run): {} <- {}", path.display(), value);
        self.pending
            .lock()
            .insert(path.to_path_buf(), value.trim().to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use sagit_hw::sysfs::MemoryNodes;
    use std::fs;
    use tempfile::TempDir;

    const NODE: &str = "/proc/touchpanel/capacitive_keys_enable";

    #[test]
    fn test_dry_run_nodes_leave_inner_untouched() {
        let inner = Arc::new(MemoryNodes::new());
        inner.insert(NODE, "1");
        let nodes = DryRunNodes::new(Arc::clone(&inner) as Arc<dyn NodeIo>);

        nodes.write_line(Path::new(NODE), "0").unwrap();
        assert_eq!(nodes.read_line(Path::new(NODE)).unwrap(), "0");
        assert_eq!(inner.content(NODE).unwrap(), "1");
        assert!(inner.write_attempts().is_empty());
    }

    #[test]
    fn test_dry_run_dispatcher_accepts_broadcast() {
        let broadcast = Broadcast::to_current_user("org.example.SET", "enabled", true);
        assert!(DryRunDispatcher.send_as_user(&broadcast).is_ok());
    }

    #[test]
    fn test_dry_run_nodes_missing_node_fails() {
        let nodes = DryRunNodes::new(Arc::new(MemoryNodes::new()));
        assert!(matches!(
            nodes.write_line(Path::new(NODE), "0"),
            Err(SysfsError::NotFound(_))
        ));
    }

    #[test]
    fn test_dry_run_context_does_not_write_nodes() {
        let dir = TempDir::new().unwrap();
        let node = dir.path().join(NODE.trim_start_matches('/'));
        fs::create_dir_all(node.parent().unwrap()).unwrap();
        fs::write(&node, "1\n").unwrap();

        let root = dir.path().to_str().unwrap();
        let config = dir.path().join("absent.toml");
        let config = config.to_str().unwrap();
        let cli = Cli::try_parse_from([
            "sagit-hw", "--config", config, "--root", root, "--dry-run", "keys", "disable",
        ])
        .unwrap();
        let ctx = Context::from_cli(&cli).unwrap();

        ctx.nodes.write_line(Path::new(NODE), "0").unwrap();
        assert_eq!(fs::read_to_string(&node).unwrap(), "1\n");

        let cli =
            Cli::try_parse_from(["sagit-hw", "--config", config, "--root", root, "keys", "disable"])
                .unwrap();
        let ctx = Context::from_cli(&cli).unwrap();
        ctx.nodes.write_line(Path::new(NODE), "0").unwrap();
        assert_eq!(fs::read_to_string(&node).unwrap(), "0\n");
    }
}
