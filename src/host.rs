//! Android system service adapters
//!
//! Reach the activity manager and package manager through their shell
//! front-ends (`am`, `pm`), which is what a native helper running on the
//! device has available.

use std::process::{Command, Output};

use sagit_configpanel::{Broadcast, BroadcastDispatcher, PackageQuery, PanelError};
use tracing::debug;

/// Broadcast dispatcher backed by `am broadcast`
#[derive(Debug, Clone)]
pub struct ActivityManager {
    program: String,
}

impl ActivityManager {
    pub fn new() -> Self {
        Self::with_program("am")
    }

    /// Use a different executable (e.g. `cmd activity` wrappers or tests)
    pub fn with_program(program: &str) -> Self {
        Self {
            program: program.to_string(),
        }
    }

    /// Arguments passed to `am` for a broadcast
    pub fn broadcast_args(broadcast: &Broadcast) -> Vec<String> {
        vec![
            "broadcast".to_string(),
            "--user".to_string(),
            broadcast.user.as_str().to_string(),
            "-a".to_string(),
            broadcast.action.clone(),
            "--ez".to_string(),
            broadcast.extra_key.clone(),
            broadcast.extra_value.to_string(),
        ]
    }
}

impl Default for ActivityManager {
    fn default() -> Self {
        Self::new()
    }
}

impl BroadcastDispatcher for ActivityManager {
    fn send_as_user(&self, broadcast: &Broadcast) -> Result<(), PanelError> {
        let args = Self::broadcast_args(broadcast);
        debug!("{} {}", self.program, args.join(" "));

        let output = Command::new(&self.program)
            .args(&args)
            .output()
            .map_err(|e| PanelError::Dispatch(format!("failed to run {}: {e}", self.program)))?;

        if !output.status.success() {
            return Err(PanelError::Dispatch(format!(
                "{} exited with {}: {}",
                self.program,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }
        Ok(())
    }
}

/// Package lookup backed by `pm path`
#[derive(Debug, Clone)]
pub struct PackageManager {
    program: String,
}

impl PackageManager {
    pub fn new() -> Self {
        Self::with_program("pm")
    }

    pub fn with_program(program: &str) -> Self {
        Self {
            program: program.to_string(),
        }
    }
}

impl Default for PackageManager {
    fn default() -> Self {
        Self::new()
    }
}

/// Interpret the result of `pm path <package>`
///
/// An installed package prints one `package:<apk path>` line per APK.
pub fn pm_path_reports_installed(output: &Output) -> bool {
    output.status.success()
        && String::from_utf8_lossy(&output.stdout)
            .lines()
            .any(|line| line.trim_start().starts_with("package:"))
}

impl PackageQuery for PackageManager {
    fn is_installed(&self, package: &str) -> Result<bool, PanelError> {
        let output = Command::new(&self.program)
            .args(["path", package])
            .output()
            .map_err(|e| {
                PanelError::PackageQuery(format!("failed to run {}: {e}", self.program))
            })?;
        let installed = pm_path_reports_installed(&output);
        debug!("{} path {} -> {}", self.program, package, installed);
        Ok(installed)
    }
}
