//! Integration tests for config-driven settings panel switches.
//!
//! Parses a config, builds every switch against test doubles and drives
//! them the way the settings screen does: check validity, set, reset.

use std::sync::Arc;

use sagit_hw::configpanel::mock::{RecordingDispatcher, StaticPackages};
use sagit_hw::configpanel::{BroadcastDispatcher, SwitchBackend, UserScope};
use sagit_hw::sysfs::{MemoryNodes, NodeIo};
use sagit_hw::{Config, ToggleConfig, ToggleEnv, ToggleKind};

const CONFIG: &str = r#"
[[toggle]]
name = "dirac"
kind = "intent"
package = "com.dirac.acs"
action = "com.dirac.acs.action.SET_ENABLED"
extra = "enabled"
default = true

[[toggle]]
name = "glove"
kind = "sysfs"
path = "/proc/touchpanel/glove_mode_enable"

[[toggle]]
name = "hbm"
kind = "sysfs"
path = "/sys/class/graphics/fb0/hbm"
on = "enabled"
off = "disabled"
"#;

struct Harness {
    config: Config,
    nodes: Arc<MemoryNodes>,
    packages: StaticPackages,
    dispatcher: Arc<RecordingDispatcher>,
}

impl Harness {
    fn new() -> Self {
        let nodes = Arc::new(MemoryNodes::new());
        nodes.insert("/proc/touchpanel/glove_mode_enable", "0");
        nodes.insert("/sys/class/graphics/fb0/hbm", "disabled");
        Self {
            config: Config::parse(CONFIG).unwrap(),
            nodes,
            packages: StaticPackages::with(&["com.dirac.acs"]),
            dispatcher: Arc::new(RecordingDispatcher::new()),
        }
    }

    fn build(&self, name: &str) -> Box<dyn SwitchBackend> {
        let env = ToggleEnv {
            nodes: Arc::clone(&self.nodes) as Arc<dyn NodeIo>,
            packages: &self.packages,
            dispatcher: Arc::clone(&self.dispatcher) as Arc<dyn BroadcastDispatcher>,
        };
        self.config.toggle(name).unwrap().build(&env).unwrap()
    }
}

// ── Intent switch ──

#[test]
fn intent_switch_broadcasts_each_change() {
    let h = Harness::new();
    let mut dirac = h.build("dirac");

    assert!(dirac.is_valid());
    assert!(dirac.value());

    dirac.set_value(false).unwrap();
    dirac.reset_to_default().unwrap();

    let sent = h.dispatcher.sent();
    assert_eq!(sent.len(), 2);
    assert!(sent
        .iter()
        .all(|b| b.action == "com.dirac.acs.action.SET_ENABLED"
            && b.extra_key == "enabled"
            && b.user == UserScope::Current));
    assert!(!sent[0].extra_value);
    assert!(sent[1].extra_value);
    assert_eq!(dirac.value(), dirac.default_value());
}

#[test]
fn intent_switch_validity_fixed_at_build() {
    let h = Harness::new();
    h.packages.uninstall("com.dirac.acs");
    let dirac = h.build("dirac");
    assert!(!dirac.is_valid());

    h.packages.install("com.dirac.acs");
    assert!(!dirac.is_valid());
    assert!(h.build("dirac").is_valid());
}

// ── Node switches ──

#[test]
fn sysfs_switch_writes_node() {
    let h = Harness::new();
    let mut glove = h.build("glove");

    assert!(glove.is_valid());
    assert!(!glove.value());

    glove.set_value(true).unwrap();
    assert_eq!(
        h.nodes.content("/proc/touchpanel/glove_mode_enable").unwrap(),
        "1\n"
    );

    glove.reset_to_default().unwrap();
    assert!(!glove.value());
    assert_eq!(
        h.nodes.content("/proc/touchpanel/glove_mode_enable").unwrap(),
        "0\n"
    );
    assert!(h.dispatcher.sent().is_empty());
}

#[test]
fn sysfs_switch_custom_strings() {
    let h = Harness::new();
    let mut hbm = h.build("hbm");
    hbm.set_value(true).unwrap();
    assert_eq!(
        h.nodes.content("/sys/class/graphics/fb0/hbm").unwrap(),
        "enabled\n"
    );
}

#[test]
fn sysfs_switch_without_node_is_invalid() {
    let h = Harness::new();
    h.nodes.remove("/proc/touchpanel/glove_mode_enable");
    let mut glove = h.build("glove");

    assert!(!glove.is_valid());
    assert!(glove.set_value(true).is_err());
    assert!(!glove.value());
}

// ── Bad entries ──

#[test]
fn incomplete_entries_are_rejected_on_load() {
    let broken = r#"
[[toggle]]
name = "good"
kind = "sysfs"
path = "/proc/touchpanel/glove_mode_enable"

[[toggle]]
name = "broken-intent"
kind = "intent"
package = "com.example"
"#;
    let err = Config::parse(broken).unwrap_err();
    assert!(err.to_string().contains("broken-intent"), "{err}");

    let broken = r#"
[[toggle]]
name = "broken-node"
kind = "sysfs"
"#;
    assert!(Config::parse(broken).is_err());
}

#[test]
fn hand_built_incomplete_entry_fails_to_build() {
    let toggle = ToggleConfig {
        name: "broken-intent".to_string(),
        kind: ToggleKind::Intent,
        default: false,
        package: Some("com.example".to_string()),
        action: None,
        extra: None,
        path: None,
        on: None,
        off: None,
    };
    assert!(toggle.check().is_err());

    let packages = StaticPackages::new();
    let env = ToggleEnv {
        nodes: Arc::new(MemoryNodes::new()),
        packages: &packages,
        dispatcher: Arc::new(RecordingDispatcher::new()),
    };
    assert!(toggle.build(&env).is_err());
}
