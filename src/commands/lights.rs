//! Light command handler.

use sagit_hw::hardware::{BrightnessMode, Flash, LightId, LightState, Lights, LightsPaths};

use super::{CommandResult, Context};
use crate::cli::ModeArg;

/// Set one light
pub fn set_light(
    ctx: &Context,
    id: &str,
    color: u32,
    on_ms: u32,
    off_ms: u32,
    mode: ModeArg,
) -> CommandResult {
    let id: LightId = id.parse()?;
    let flash = if on_ms > 0 && off_ms > 0 {
        Flash::Timed { on_ms, off_ms }
    } else {
        Flash::None
    };
    let brightness_mode = match mode {
        ModeArg::User => BrightnessMode::User,
        ModeArg::Sensor => BrightnessMode::Sensor,
        ModeArg::LowPersistence => BrightnessMode::LowPersistence,
    };
    let state = LightState {
        color,
        flash,
        brightness_mode,
    };

    let lights = Lights::open(ctx.nodes.clone(), LightsPaths::default());
    lights.set_light(id, &state)?;
    println!("{id}: color={color:08X} flash={flash:?}");
    Ok(())
}
