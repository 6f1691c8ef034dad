//! Node-backed switch backend
//!
//! The switch value lives in a single kernel node holding an "on" or "off"
//! string (`1`/`0` unless configured otherwise).

use std::path::{Path, PathBuf};
use std::sync::Arc;

use sagit_sysfs::NodeIo;
use tracing::debug;

use crate::backend::{BackendState, SwitchBackend};
use crate::error::PanelError;

/// Switch backed by one kernel node
pub struct SysfsSwitchBackend {
    state: BackendState,
    nodes: Arc<dyn NodeIo>,
    path: PathBuf,
    on: String,
    off: String,
}

impl SysfsSwitchBackend {
    pub fn new(nodes: Arc<dyn NodeIo>, path: impl Into<PathBuf>, default_value: bool) -> Self {
        Self {
            state: BackendState::new(default_value),
            nodes,
            path: path.into(),
            on: "1".to_string(),
            off: "0".to_string(),
        }
    }

    /// Use custom strings for the on and off states
    pub fn with_values(mut self, on: &str, off: &str) -> Self {
        self.on = on.to_string();
        self.off = off.to_string();
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Adopt whatever the node currently holds
    ///
    /// Anything other than the "on" string reads as off.
    pub fn sync_from_node(&mut self) -> Result<bool, PanelError> {
        let current = self.nodes.read_line(&self.path)? == self.on;
        debug!("{} currently {}", self.path.display(), current);
        self.state.applied(current);
        Ok(current)
    }
}

impl SwitchBackend for SysfsSwitchBackend {
    fn value(&self) -> bool {
        self.state.value()
    }

    fn default_value(&self) -> bool {
        self.state.default_value()
    }

    fn set_value(&mut self, value: bool) -> Result<(), PanelError> {
        let text = if value { &self.on } else { &self.off };
        self.nodes.write_line(&self.path, text)?;
        self.state.applied(value);
        Ok(())
    }

    fn is_valid(&self) -> bool {
        self.nodes.is_writable(&self.path)
    }
}
