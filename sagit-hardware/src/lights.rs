//! Lights control
//!
//! Drives the LCD backlight, the two button backlights and the white
//! notification LED. The notification LED is shared by the battery,
//! notification and attention lights; the highest-priority lit one wins
//! (attention, then notification, then battery).
//!
//! Timed flashing uses the LED driver's LUT ramp: the driver ramps up through
//! `duty_pcts`, holds for `pause_hi`, ramps down and holds dark for `pause_lo`.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use parking_lot::Mutex;
use sagit_sysfs::NodeIo;
use tracing::{debug, warn};

use crate::error::HardwareError;

pub const LCD_BRIGHTNESS_PATH: &str = "/sys/class/leds/lcd-backlight/brightness";
pub const LCD_MAX_BRIGHTNESS_PATH: &str = "/sys/class/leds/lcd-backlight/max_brightness";
pub const BUTTON_1_BRIGHTNESS_PATH: &str = "/sys/class/leds/button-backlight/brightness";
pub const BUTTON_2_BRIGHTNESS_PATH: &str = "/sys/class/leds/button-backlight1/brightness";
pub const PERSISTENCE_PATH: &str = "/sys/class/graphics/fb0/msm_fb_persist_mode";
pub const WHITE_LED_DIR: &str = "/sys/class/leds/white";

/// Brightness scale the framework works in
pub const DEFAULT_MAX_BRIGHTNESS: u32 = 255;
/// Backlight level forced while low persistence mode is on
pub const LOW_PERSISTENCE_BRIGHTNESS: u32 = 0x80;

/// Duty cycle ramp (percent) programmed into the LED LUT
const BRIGHTNESS_RAMP: [u32; 8] = [0, 12, 25, 37, 50, 72, 85, 100];
/// Default time per ramp step (ms)
const RAMP_STEP_DURATION: u32 = 50;

/// Light identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LightId {
    Backlight,
    Buttons,
    Battery,
    Notifications,
    Attention,
}

impl LightId {
    pub const ALL: &'static [LightId] = &[
        LightId::Backlight,
        LightId::Buttons,
        LightId::Battery,
        LightId::Notifications,
        LightId::Attention,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            LightId::Backlight => "backlight",
            LightId::Buttons => "buttons",
            LightId::Battery => "battery",
            LightId::Notifications => "notifications",
            LightId::Attention => "attention",
        }
    }
}

impl fmt::Display for LightId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for LightId {
    type Err = HardwareError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LightId::ALL
            .iter()
            .find(|id| id.name() == s)
            .copied()
            .ok_or_else(|| HardwareError::InvalidParameter(format!("unknown light: {s}")))
    }
}

/// Flash behaviour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Flash {
    #[default]
    None,
    Timed { on_ms: u32, off_ms: u32 },
}

/// Backlight brightness mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BrightnessMode {
    #[default]
    User,
    Sensor,
    LowPersistence,
}

/// Requested state of a light
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LightState {
    /// ARGB color; alpha is only honoured for notifications
    pub color: u32,
    pub flash: Flash,
    pub brightness_mode: BrightnessMode,
}

impl LightState {
    /// Steady light of the given color
    pub fn solid(color: u32) -> Self {
        Self {
            color,
            ..Default::default()
        }
    }

    /// Blinking light of the given color
    pub fn blinking(color: u32, on_ms: u32, off_ms: u32) -> Self {
        Self {
            color,
            flash: Flash::Timed { on_ms, off_ms },
            ..Default::default()
        }
    }

    pub fn is_lit(&self) -> bool {
        self.color & 0x00ff_ffff != 0
    }
}

/// Perceived brightness (0-255) of the RGB part of a color
pub fn rgb_to_brightness(color: u32) -> u32 {
    let color = color & 0x00ff_ffff;
    ((77 * ((color >> 16) & 0xff)) + (150 * ((color >> 8) & 0xff)) + (29 * (color & 0xff))) >> 8
}

/// Comma-separated LUT duty cycles for a ramp peaking at `brightness`
pub fn scaled_duty_pcts(brightness: u32) -> String {
    BRIGHTNESS_RAMP
        .iter()
        .map(|pct| (pct * brightness / 255).to_string())
        .collect::<Vec<_>>()
        .join(",")
}

/// Fold a user-chosen alpha (1-254) into the RGB channels
///
/// Fully transparent and fully opaque colors are returned unchanged.
pub fn apply_alpha(color: u32) -> u32 {
    let alpha = (color >> 24) & 0xff;
    if alpha == 0 || alpha == 0xff {
        return color;
    }
    let scale = |c: u32| c * alpha / 0xff;
    let r = scale((color >> 16) & 0xff);
    let g = scale((color >> 8) & 0xff);
    let b = scale(color & 0xff);
    (r << 16) | (g << 8) | b
}

/// Node locations used by `Lights`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LightsPaths {
    pub lcd_brightness: PathBuf,
    pub lcd_max_brightness: PathBuf,
    pub button_brightness: [PathBuf; 2],
    pub persistence: PathBuf,
    pub white: PathBuf,
}

impl LightsPaths {
    fn white(&self, attr: &str) -> PathBuf {
        self.white.join(attr)
    }
}

impl Default for LightsPaths {
    fn default() -> Self {
        Self {
            lcd_brightness: PathBuf::from(LCD_BRIGHTNESS_PATH),
            lcd_max_brightness: PathBuf::from(LCD_MAX_BRIGHTNESS_PATH),
            button_brightness: [
                PathBuf::from(BUTTON_1_BRIGHTNESS_PATH),
                PathBuf::from(BUTTON_2_BRIGHTNESS_PATH),
            ],
            persistence: PathBuf::from(PERSISTENCE_PATH),
            white: PathBuf::from(WHITE_LED_DIR),
        }
    }
}

#[derive(Debug, Default)]
struct LightsInner {
    attention: LightState,
    notification: LightState,
    battery: LightState,
    last_backlight_mode: BrightnessMode,
}

/// Lights controller
///
/// All updates are serialised behind one lock, so the shared notification
/// LED always reflects a single consistent choice of state.
pub struct Lights {
    nodes: Arc<dyn NodeIo>,
    paths: LightsPaths,
    max_brightness: u32,
    inner: Mutex<LightsInner>,
}

impl Lights {
    /// Open the lights, reading the panel's maximum brightness
    pub fn open(nodes: Arc<dyn NodeIo>, paths: LightsPaths) -> Self {
        let max_brightness = match nodes
            .read_int(&paths.lcd_max_brightness)
            .map(u32::try_from)
        {
            Ok(Ok(max)) if max > 0 => max,
            _ => {
                warn!(
                    "Failed to read max panel brightness, falling back to {}",
                    DEFAULT_MAX_BRIGHTNESS
                );
                DEFAULT_MAX_BRIGHTNESS
            }
        };

        Self {
            nodes,
            paths,
            max_brightness,
            inner: Mutex::new(LightsInner::default()),
        }
    }

    pub fn max_brightness(&self) -> u32 {
        self.max_brightness
    }

    /// Apply a state to one light
    pub fn set_light(&self, id: LightId, state: &LightState) -> Result<(), HardwareError> {
        debug!("set_light {} {:?}", id, state);
        match id {
            LightId::Backlight => self.set_backlight(state),
            LightId::Buttons => self.set_buttons(state),
            LightId::Battery => {
                let mut inner = self.inner.lock();
                inner.battery = *state;
                self.update_white_led(&inner);
                Ok(())
            }
            LightId::Notifications => {
                let mut inner = self.inner.lock();
                inner.notification = LightState {
                    color: apply_alpha(state.color),
                    ..*state
                };
                self.update_white_led(&inner);
                Ok(())
            }
            LightId::Attention => {
                let mut inner = self.inner.lock();
                inner.attention = *state;
                self.update_white_led(&inner);
                Ok(())
            }
        }
    }

    fn set_backlight(&self, state: &LightState) -> Result<(), HardwareError> {
        let mut brightness = rgb_to_brightness(state.color);
        if self.max_brightness != DEFAULT_MAX_BRIGHTNESS {
            let scaled = u64::from(brightness) * u64::from(self.max_brightness)
                / u64::from(DEFAULT_MAX_BRIGHTNESS);
            // scaled <= max_brightness, which fits in u32
            let scaled = u32::try_from(scaled).unwrap_or(self.max_brightness);
            debug!("scaling brightness {} => {}", brightness, scaled);
            brightness = scaled;
        }

        let mut inner = self.inner.lock();
        let low_persistence = state.brightness_mode == BrightnessMode::LowPersistence;
        let leaving = inner.last_backlight_mode == BrightnessMode::LowPersistence;
        let entering = inner.last_backlight_mode != state.brightness_mode && low_persistence;

        let mut result: Result<(), HardwareError> = Ok(());
        if entering || (!low_persistence && leaving) {
            if let Err(e) = self
                .nodes
                .write_int(&self.paths.persistence, i64::from(low_persistence))
            {
                warn!("Failed to write {}: {}", self.paths.persistence.display(), e);
                result = Err(e.into());
            }
            if low_persistence {
                brightness = LOW_PERSISTENCE_BRIGHTNESS;
            }
        }
        inner.last_backlight_mode = state.brightness_mode;

        result?;
        self.nodes
            .write_int(&self.paths.lcd_brightness, i64::from(brightness))?;
        Ok(())
    }

    fn set_buttons(&self, state: &LightState) -> Result<(), HardwareError> {
        let brightness = i64::from(rgb_to_brightness(state.color));
        let _inner = self.inner.lock();

        let first = self
            .nodes
            .write_int(&self.paths.button_brightness[0], brightness);
        let second = self
            .nodes
            .write_int(&self.paths.button_brightness[1], brightness);
        first.and(second)?;
        Ok(())
    }

    fn update_white_led(&self, inner: &LightsInner) {
        let state = if inner.attention.is_lit() {
            &inner.attention
        } else if inner.notification.is_lit() {
            &inner.notification
        } else {
            &inner.battery
        };
        self.set_white_led(state);
    }

    fn set_white_led(&self, state: &LightState) {
        let (on_ms, off_ms) = match state.flash {
            Flash::Timed { on_ms, off_ms } => (on_ms, off_ms),
            Flash::None => (0, 0),
        };
        let white = rgb_to_brightness(state.color);
        let blink = on_ms > 0 && off_ms > 0;

        debug!(
            "white led: color={:08X} on={} off={} brightness={}",
            state.color, on_ms, off_ms, white
        );

        self.write_quiet("blink", "0");

        if blink {
            let mut step = RAMP_STEP_DURATION;
            let ramp_len = BRIGHTNESS_RAMP.len() as u32 * 2;
            let mut pause_hi = on_ms.saturating_sub(step * ramp_len);
            if step * ramp_len > on_ms {
                step = on_ms / ramp_len;
                pause_hi = 0;
            }

            self.write_quiet("start_idx", "0");
            self.write_quiet("duty_pcts", &scaled_duty_pcts(white));
            self.write_quiet("pause_lo", &off_ms.to_string());
            self.write_quiet("pause_hi", &pause_hi.to_string());
            self.write_quiet("ramp_step_ms", &step.to_string());
            self.write_quiet("blink", "1");
        } else {
            if white == 0 {
                self.write_quiet("blink", "0");
            }
            self.write_quiet("brightness", &white.to_string());
        }
    }

    /// Write a white LED attribute, logging failures
    fn write_quiet(&self, attr: &str, value: &str) {
        let path = self.paths.white(attr);
        if let Err(e) = self.nodes.write_line(&path, value) {
            warn!("Failed to write {}: {}", path.display(), e);
        }
    }
}
