//! Real filesystem backend
//!
//! Nodes are resolved relative to a root directory, `/` on a device. Tests and
//! bench setups point the root at a scratch directory that mirrors the sysfs
//! layout.

use std::ffi::CString;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::os::unix::ffi::OsStrExt;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::SysfsError;
use crate::{first_line, NodeIo};

/// Filesystem-backed node access
#[derive(Debug, Clone)]
pub struct RootedNodes {
    root: PathBuf,
}

impl RootedNodes {
    /// Access nodes at their real location
    pub fn new() -> Self {
        Self::with_root(PathBuf::from("/"))
    }

    /// Access nodes relative to `root`
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root directory nodes are resolved against
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Map an on-device path to the path actually opened
    pub fn resolve(&self, path: &Path) -> PathBuf {
        let relative = path.strip_prefix("/").unwrap_or(path);
        self.root.join(relative)
    }
}

impl Default for RootedNodes {
    fn default() -> Self {
        Self::new()
    }
}

impl NodeIo for RootedNodes {
    fn exists(&self, path: &Path) -> bool {
        self.resolve(path).exists()
    }

    fn is_writable(&self, path: &Path) -> bool {
        let resolved = self.resolve(path);
        let Ok(c_path) = CString::new(resolved.as_os_str().as_bytes()) else {
            return false;
        };
        // SAFETY: c_path is a valid NUL-terminated string for the whole call
        unsafe { libc::access(c_path.as_ptr(), libc::W_OK) == 0 }
    }

    fn read_line(&self, path: &Path) -> Result<String, SysfsError> {
        let resolved = self.resolve(path);
        let content = fs::read_to_string(&resolved).map_err(|e| SysfsError::io(path, e))?;
        let line = first_line(&content);
        debug!("read {} = {:?}", path.display(), line);
        Ok(line)
    }

    fn write_line(&self, path: &Path, value: &str) -> Result<(), SysfsError> {
        let resolved = self.resolve(path);
        let mut file = OpenOptions::new()
            .write(true)
            .truncate(true)
            .open(&resolved)
            .map_err(|e| SysfsError::io(path, e))?;
        writeln!(file, "{}", value).map_err(|e| SysfsError::io(path, e))?;
        debug!("wrote {} = {:?}", path.display(), value);
        Ok(())
    }
}
