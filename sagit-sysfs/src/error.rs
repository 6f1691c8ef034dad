//! Node I/O error types

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while reading or writing a kernel node
#[derive(Error, Debug)]
pub enum SysfsError {
    #[error("Node not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Invalid value in {}: {content:?}", path.display())]
    InvalidValue { path: PathBuf, content: String },
}

impl SysfsError {
    /// Wrap an `io::Error`, mapping `NotFound` to the dedicated variant
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        let path = path.into();
        if source.kind() == io::ErrorKind::NotFound {
            SysfsError::NotFound(path)
        } else {
            SysfsError::Io { path, source }
        }
    }

    /// Path the error refers to
    pub fn path(&self) -> &std::path::Path {
        match self {
            SysfsError::NotFound(path) => path,
            SysfsError::Io { path, .. } => path,
            SysfsError::InvalidValue { path, .. } => path,
        }
    }
}
