//! Hardware helper error types

use sagit_sysfs::SysfsError;
use thiserror::Error;

/// Errors from hardware operations
#[derive(Error, Debug)]
pub enum HardwareError {
    /// Node access error
    #[error("Node error: {0}")]
    Sysfs(#[from] SysfsError),

    /// Feature not present on this device
    #[error("Feature not supported: {0}")]
    NotSupported(String),

    /// Invalid parameter value
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}
