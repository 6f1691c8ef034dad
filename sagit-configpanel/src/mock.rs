//! Test doubles for the panel's system collaborators.
//!
//! Deterministic stand-ins for the package manager and the broadcast
//! dispatcher; they record what they are asked so tests can assert on it.

use std::collections::HashSet;

use parking_lot::Mutex;

use crate::error::PanelError;
use crate::intent::{Broadcast, BroadcastDispatcher, PackageQuery};

/// Dispatcher that keeps every broadcast it is given
#[derive(Debug, Default)]
pub struct RecordingDispatcher {
    sent: Mutex<Vec<Broadcast>>,
}

impl RecordingDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Broadcasts received so far, oldest first
    pub fn sent(&self) -> Vec<Broadcast> {
        self.sent.lock().clone()
    }

    pub fn clear(&self) {
        self.sent.lock().clear();
    }
}

impl BroadcastDispatcher for RecordingDispatcher {
    fn send_as_user(&self, broadcast: &Broadcast) -> Result<(), PanelError> {
        self.sent.lock().push(broadcast.clone());
        Ok(())
    }
}

/// Dispatcher that rejects everything
#[derive(Debug, Default, Clone, Copy)]
pub struct FailingDispatcher;

impl BroadcastDispatcher for FailingDispatcher {
    fn send_as_user(&self, broadcast: &Broadcast) -> Result<(), PanelError> {
        Err(PanelError::Dispatch(format!(
            "refusing {}",
            broadcast.action
        )))
    }
}

/// Package list that can be changed while a test runs
#[derive(Debug, Default)]
pub struct StaticPackages {
    installed: Mutex<HashSet<String>>,
    failing: Mutex<bool>,
}

impl StaticPackages {
    /// No packages installed
    pub fn new() -> Self {
        Self::default()
    }

    /// The given packages installed
    pub fn with(packages: &[&str]) -> Self {
        let this = Self::new();
        for package in packages {
            this.install(package);
        }
        this
    }

    pub fn install(&self, package: &str) {
        self.installed.lock().insert(package.to_string());
    }

    pub fn uninstall(&self, package: &str) {
        self.installed.lock().remove(package);
    }

    /// Make every later query fail
    pub fn fail_queries(&self) {
        *self.failing.lock() = true;
    }
}

impl PackageQuery for StaticPackages {
    fn is_installed(&self, package: &str) -> Result<bool, PanelError> {
        if *self.failing.lock() {
            return Err(PanelError::PackageQuery(format!(
                "package service unavailable ({package})"
            )));
        }
        Ok(self.installed.lock().contains(package))
    }
}
