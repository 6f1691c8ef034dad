//! Settings panel error types

use sagit_sysfs::SysfsError;
use thiserror::Error;

/// Errors from switch backends
#[derive(Error, Debug)]
pub enum PanelError {
    /// Node access error (file-backed switches)
    #[error("Node error: {0}")]
    Sysfs(#[from] SysfsError),

    /// Broadcast could not be handed to the system
    #[error("Broadcast dispatch failed: {0}")]
    Dispatch(String),

    /// Installed-package lookup failed
    #[error("Package query failed: {0}")]
    PackageQuery(String),
}
