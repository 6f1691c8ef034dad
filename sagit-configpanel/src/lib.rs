//! Switch preference backends for the device settings panel
//!
//! A settings screen shows one switch per backend. Backends decide whether
//! they apply to the device (`is_valid`) and what applying a value means:
//!
//! - `IntentBackend` - broadcast the value to a companion app
//! - `SysfsSwitchBackend` - write the value to a kernel node

pub mod backend;
pub mod error;
pub mod intent;
pub mod mock;
pub mod sysfs_switch;

pub use backend::{BackendState, SwitchBackend};
pub use error::PanelError;
pub use intent::{Broadcast, BroadcastDispatcher, IntentBackend, PackageQuery, UserScope};
pub use sysfs_switch::SysfsSwitchBackend;
