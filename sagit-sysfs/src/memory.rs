//! In-memory node backend
//!
//! Holds a table of simulated nodes for tests across the workspace. Every
//! write attempt is recorded, including the ones that fail, so callers can
//! check that an operation touched every node it was supposed to.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;

use crate::error::SysfsError;
use crate::{first_line, NodeIo};

#[derive(Debug, Clone)]
struct Node {
    content: String,
    writable: bool,
    fail_reads: bool,
    fail_writes: bool,
}

/// A write attempt seen by `MemoryNodes`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteAttempt {
    pub path: PathBuf,
    pub value: String,
    pub succeeded: bool,
}

/// Simulated node table
#[derive(Debug, Default)]
pub struct MemoryNodes {
    nodes: Mutex<HashMap<PathBuf, Node>>,
    writes: Mutex<Vec<WriteAttempt>>,
}

impl MemoryNodes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or replace) a writable node
    pub fn insert(&self, path: impl Into<PathBuf>, content: &str) {
        self.put(path.into(), content, true);
    }

    /// Add (or replace) a node that rejects writes
    pub fn insert_readonly(&self, path: impl Into<PathBuf>, content: &str) {
        self.put(path.into(), content, false);
    }

    fn put(&self, path: PathBuf, content: &str, writable: bool) {
        self.nodes.lock().insert(
            path,
            Node {
                content: content.to_string(),
                writable,
                fail_reads: false,
                fail_writes: false,
            },
        );
    }

    /// Remove a node
    pub fn remove(&self, path: impl AsRef<Path>) {
        self.nodes.lock().remove(path.as_ref());
    }

    /// Make writes to an existing node fail with an I/O error while it still
    /// reports itself as writable (e.g. the driver returning -EINVAL)
    pub fn fail_writes(&self, path: impl AsRef<Path>) {
        if let Some(node) = self.nodes.lock().get_mut(path.as_ref()) {
            node.fail_writes = true;
        }
    }

    /// Make reads of an existing node fail with an I/O error
    pub fn fail_reads(&self, path: impl AsRef<Path>) {
        if let Some(node) = self.nodes.lock().get_mut(path.as_ref()) {
            node.fail_reads = true;
        }
    }

    /// Raw content of a node
    pub fn content(&self, path: impl AsRef<Path>) -> Option<String> {
        self.nodes
            .lock()
            .get(path.as_ref())
            .map(|node| node.content.clone())
    }

    /// All write attempts so far, in order
    pub fn write_attempts(&self) -> Vec<WriteAttempt> {
        self.writes.lock().clone()
    }

    /// Write attempts against a single node
    pub fn writes_to(&self, path: impl AsRef<Path>) -> Vec<WriteAttempt> {
        self.writes
            .lock()
            .iter()
            .filter(|w| w.path == path.as_ref())
            .cloned()
            .collect()
    }

    /// Forget recorded write attempts
    pub fn clear_writes(&self) {
        self.writes.lock().clear();
    }
}

impl NodeIo for MemoryNodes {
    fn exists(&self, path: &Path) -> bool {
        self.nodes.lock().contains_key(path)
    }

    fn is_writable(&self, path: &Path) -> bool {
        self.nodes
            .lock()
            .get(path)
            .is_some_and(|node| node.writable)
    }

    fn read_line(&self, path: &Path) -> Result<String, SysfsError> {
        let nodes = self.nodes.lock();
        let node = nodes
            .get(path)
            .ok_or_else(|| SysfsError::NotFound(path.to_path_buf()))?;
        if node.fail_reads {
            return Err(SysfsError::io(
                path,
                std::io::Error::from_raw_os_error(libc::EIO),
            ));
        }
        Ok(first_line(&node.content))
    }

    fn write_line(&self, path: &Path, value: &str) -> Result<(), SysfsError> {
        let result = {
            let mut nodes = self.nodes.lock();
            match nodes.get_mut(path) {
                None => Err(SysfsError::NotFound(path.to_path_buf())),
                Some(node) if !node.writable => Err(SysfsError::io(
                    path,
                    std::io::Error::from_raw_os_error(libc::EACCES),
                )),
                Some(node) if node.fail_writes => Err(SysfsError::io(
                    path,
                    std::io::Error::from_raw_os_error(libc::EINVAL),
                )),
                Some(node) => {
                    node.content = format!("{value}\n");
                    Ok(())
                }
            }
        };

        self.writes.lock().push(WriteAttempt {
            path: path.to_path_buf(),
            value: value.to_string(),
            succeeded: result.is_ok(),
        });
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_updates_content() {
        let nodes = MemoryNodes::new();
        nodes.insert("/sys/a", "1");
        nodes.write_line(Path::new("/sys/a"), "0").unwrap();

        assert_eq!(nodes.content("/sys/a").unwrap(), "0\n");
        assert_eq!(nodes.read_line(Path::new("/sys/a")).unwrap(), "0");
        assert_eq!(
            nodes.write_attempts(),
            vec![WriteAttempt {
                path: PathBuf::from("/sys/a"),
                value: "0".into(),
                succeeded: true,
            }]
        );
    }

    #[test]
    fn test_failed_writes_are_recorded() {
        let nodes = MemoryNodes::new();
        nodes.insert_readonly("/sys/ro", "1");
        nodes.insert("/sys/flaky", "1");
        nodes.fail_writes("/sys/flaky");

        assert!(!nodes.is_writable(Path::new("/sys/ro")));
        assert!(nodes.is_writable(Path::new("/sys/flaky")));

        assert!(nodes.write_line(Path::new("/sys/ro"), "0").is_err());
        assert!(nodes.write_line(Path::new("/sys/flaky"), "0").is_err());
        assert!(nodes.write_line(Path::new("/sys/missing"), "0").is_err());

        let attempts = nodes.write_attempts();
        assert_eq!(attempts.len(), 3);
        assert!(attempts.iter().all(|w| !w.succeeded));
        assert_eq!(nodes.content("/sys/flaky").unwrap(), "1");
    }

    #[test]
    fn test_read_failures() {
        let nodes = MemoryNodes::new();
        nodes.insert("/sys/a", "0");
        nodes.fail_reads("/sys/a");

        assert!(matches!(
            nodes.read_line(Path::new("/sys/a")),
            Err(SysfsError::Io { .. })
        ));
        assert!(matches!(
            nodes.read_line(Path::new("/sys/b")),
            Err(SysfsError::NotFound(_))
        ));
    }
}
