//! Node access layer for the sagit hardware helpers
//!
//! Every hardware feature on this device is driven through small text nodes
//! exposed by the kernel under `/sys` and `/proc`. This crate provides a single
//! interface for touching those nodes, with two backends:
//!
//! - `RootedNodes` - the real filesystem, optionally under a root prefix
//! - `MemoryNodes` - an in-memory node table for tests

pub mod error;
pub mod memory;
pub mod rooted;

pub use error::SysfsError;
pub use memory::MemoryNodes;
pub use rooted::RootedNodes;

use std::path::Path;

/// Core node I/O trait - all backends implement this
///
/// Paths are always given in their on-device form (e.g.
/// `/proc/touchpanel/capacitive_keys_enable`); a backend may map them
/// somewhere else.
pub trait NodeIo: Send + Sync {
    /// Check whether the node exists
    fn exists(&self, path: &Path) -> bool;

    /// Check whether the node exists and the current process may write it
    fn is_writable(&self, path: &Path) -> bool;

    /// Read the first line of a node, with surrounding whitespace trimmed
    fn read_line(&self, path: &Path) -> Result<String, SysfsError>;

    /// Replace the content of a node with `value` followed by a newline
    ///
    /// # Arguments
    /// * `path` - Node path
    /// * `value` - Text to write (without trailing newline)
    fn write_line(&self, path: &Path, value: &str) -> Result<(), SysfsError>;

    /// Read a node holding a decimal integer
    fn read_int(&self, path: &Path) -> Result<i64, SysfsError> {
        let line = self.read_line(path)?;
        line.parse().map_err(|_| SysfsError::InvalidValue {
            path: path.to_path_buf(),
            content: line,
        })
    }

    /// Write a decimal integer to a node
    fn write_int(&self, path: &Path, value: i64) -> Result<(), SysfsError> {
        self.write_line(path, &value.to_string())
    }
}

/// First line of `content` with surrounding whitespace removed
pub(crate) fn first_line(content: &str) -> String {
    content.lines().next().unwrap_or("").trim().to_string()
}
