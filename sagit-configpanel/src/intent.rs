//! Broadcast-driven switch backend
//!
//! Some features are owned by a separate app (e.g. an audio effects
//! service). The panel does not touch their state directly; it sends a
//! broadcast carrying the new value and lets the app apply it. The switch is
//! only offered when that app is installed.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, warn};

use crate::backend::{BackendState, SwitchBackend};
use crate::error::PanelError;

/// User a broadcast is delivered to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UserScope {
    /// The current foreground user
    Current,
}

impl UserScope {
    /// Name understood by the activity manager's `--user` option
    pub fn as_str(&self) -> &'static str {
        match self {
            UserScope::Current => "current",
        }
    }
}

/// Outbound broadcast carrying one boolean extra
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Broadcast {
    pub action: String,
    pub extra_key: String,
    pub extra_value: bool,
    pub user: UserScope,
}

impl Broadcast {
    /// Broadcast to the current user
    pub fn to_current_user(action: &str, extra_key: &str, extra_value: bool) -> Self {
        Self {
            action: action.to_string(),
            extra_key: extra_key.to_string(),
            extra_value,
            user: UserScope::Current,
        }
    }
}

/// Sends broadcasts to the system
pub trait BroadcastDispatcher: Send + Sync {
    /// Hand a broadcast to the system
    ///
    /// Success only means the broadcast was accepted for delivery.
    fn send_as_user(&self, broadcast: &Broadcast) -> Result<(), PanelError>;
}

/// Answers whether a package is installed
pub trait PackageQuery {
    fn is_installed(&self, package: &str) -> Result<bool, PanelError>;
}

/// Switch backed by a broadcast to a companion app
pub struct IntentBackend {
    state: BackendState,
    valid: bool,
    package_check: String,
    intent_action: String,
    intent_extra: String,
    dispatcher: Arc<dyn BroadcastDispatcher>,
}

impl IntentBackend {
    /// Create the backend and check once whether `package_check` is installed
    ///
    /// # Arguments
    /// * `packages` - Package lookup used for the validity check
    /// * `dispatcher` - Where broadcasts are sent
    /// * `package_check` - Package that must be installed for the switch to apply
    /// * `intent_action` - Broadcast action
    /// * `intent_extra` - Name of the boolean extra carrying the value
    /// * `default_value` - Initial and reset value
    pub fn new(
        packages: &dyn PackageQuery,
        dispatcher: Arc<dyn BroadcastDispatcher>,
        package_check: &str,
        intent_action: &str,
        intent_extra: &str,
        default_value: bool,
    ) -> Self {
        let mut backend = Self {
            state: BackendState::new(default_value),
            valid: false,
            package_check: package_check.to_string(),
            intent_action: intent_action.to_string(),
            intent_extra: intent_extra.to_string(),
            dispatcher,
        };
        backend.refresh_validity(packages);
        backend
    }

    /// Re-check whether the companion package is installed
    ///
    /// Validity is otherwise fixed at construction.
    pub fn refresh_validity(&mut self, packages: &dyn PackageQuery) {
        self.valid = match packages.is_installed(&self.package_check) {
            Ok(installed) => installed,
            Err(e) => {
                warn!("Package check for {} failed: {}", self.package_check, e);
                false
            }
        };
        debug!("{} installed: {}", self.package_check, self.valid);
    }

    pub fn package_check(&self) -> &str {
        &self.package_check
    }

    pub fn intent_action(&self) -> &str {
        &self.intent_action
    }

    pub fn intent_extra(&self) -> &str {
        &self.intent_extra
    }
}

impl SwitchBackend for IntentBackend {
    fn value(&self) -> bool {
        self.state.value()
    }

    fn default_value(&self) -> bool {
        self.state.default_value()
    }

    fn set_value(&mut self, value: bool) -> Result<(), PanelError> {
        let broadcast = Broadcast::to_current_user(&self.intent_action, &self.intent_extra, value);
        self.dispatcher.send_as_user(&broadcast)?;
        self.state.applied(value);
        Ok(())
    }

    fn is_valid(&self) -> bool {
        self.valid
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{FailingDispatcher, RecordingDispatcher, StaticPackages};

    const PACKAGE: &str = "com.example.effects";
    const ACTION: &str = "com.example.effects.action.SET";
    const EXTRA: &str = "enabled";

    fn backend(
        packages: &StaticPackages,
        dispatcher: &Arc<RecordingDispatcher>,
        default: bool,
    ) -> IntentBackend {
        IntentBackend::new(
            packages,
            Arc::clone(dispatcher) as Arc<dyn BroadcastDispatcher>,
            PACKAGE,
            ACTION,
            EXTRA,
            default,
        )
    }

    #[test]
    fn test_validity_follows_package() {
        let dispatcher = Arc::new(RecordingDispatcher::new());

        let installed = StaticPackages::with(&[PACKAGE]);
        assert!(backend(&installed, &dispatcher, false).is_valid());

        let missing = StaticPackages::new();
        assert!(!backend(&missing, &dispatcher, false).is_valid());
    }

    #[test]
    fn test_validity_is_cached() {
        let dispatcher = Arc::new(RecordingDispatcher::new());
        let packages = StaticPackages::new();
        let mut toggle = backend(&packages, &dispatcher, false);
        assert!(!toggle.is_valid());

        packages.install(PACKAGE);
        assert!(!toggle.is_valid());

        toggle.refresh_validity(&packages);
        assert!(toggle.is_valid());

        packages.uninstall(PACKAGE);
        assert!(toggle.is_valid());
    }

    #[test]
    fn test_failed_package_query_is_invalid() {
        let dispatcher = Arc::new(RecordingDispatcher::new());
        let packages = StaticPackages::with(&[PACKAGE]);
        packages.fail_queries();
        assert!(!backend(&packages, &dispatcher, true).is_valid());
    }

    #[test]
    fn test_set_value_sends_one_broadcast() {
        let dispatcher = Arc::new(RecordingDispatcher::new());
        let packages = StaticPackages::with(&[PACKAGE]);
        let mut toggle = backend(&packages, &dispatcher, false);

        for value in [true, false, true] {
            dispatcher.clear();
            toggle.set_value(value).unwrap();

            let sent = dispatcher.sent();
            assert_eq!(sent.len(), 1);
            assert_eq!(sent[0].action, ACTION);
            assert_eq!(sent[0].extra_key, EXTRA);
            assert_eq!(sent[0].extra_value, value);
            assert_eq!(sent[0].user, UserScope::Current);
            assert_eq!(toggle.value(), value);
        }
    }

    #[test]
    fn test_set_value_on_invalid_switch() {
        let dispatcher = Arc::new(RecordingDispatcher::new());
        let mut toggle = backend(&StaticPackages::new(), &dispatcher, false);
        assert!(!toggle.is_valid());
        toggle.set_value(true).unwrap();
        assert_eq!(dispatcher.sent().len(), 1);
    }

    #[test]
    fn test_reset_to_default() {
        for default in [true, false] {
            let dispatcher = Arc::new(RecordingDispatcher::new());
            let mut toggle = backend(&StaticPackages::with(&[PACKAGE]), &dispatcher, default);

            toggle.set_value(!default).unwrap();
            toggle.reset_to_default().unwrap();

            assert_eq!(toggle.value(), toggle.default_value());
            let sent = dispatcher.sent();
            assert_eq!(sent.len(), 2);
            assert_eq!(sent[1].extra_value, default);
        }
    }

    #[test]
    fn test_dispatch_error_propagates() {
        let mut toggle = IntentBackend::new(
            &StaticPackages::with(&[PACKAGE]),
            Arc::new(FailingDispatcher),
            PACKAGE,
            ACTION,
            EXTRA,
            false,
        );
        assert!(matches!(
            toggle.set_value(true),
            Err(PanelError::Dispatch(_))
        ));
        assert!(!toggle.value());
    }

    #[test]
    fn test_broadcast_json() {
        let broadcast = Broadcast::to_current_user(ACTION, EXTRA, true);
        let json = serde_json::to_string(&broadcast).unwrap();
        assert!(json.contains("\"extra_value\":true"));
        assert!(json.contains("\"user\":\"current\""));
    }
}
