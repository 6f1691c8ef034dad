//! Hardware helpers for the Xiaomi Mi 6 (sagit)
//!
//! Builds on the node access layer in `sagit-sysfs`:
//!
//! - `KeyDisabler` - turn the capacitive home key off and on
//! - `Lights` - backlight, button backlight and notification LED

pub mod error;
pub mod key_disabler;
pub mod lights;

pub use error::HardwareError;
pub use key_disabler::{KeyDisabler, KeyDisablerPaths, KeyPath, KeyWriteReport};
pub use lights::{BrightnessMode, Flash, LightId, LightState, Lights, LightsPaths};
