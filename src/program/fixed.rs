//! Fixed color program.
//!
//! Shows one externally configured color on every device. While the alarm
//! is running its factor preempts the configured color with a red flash;
//! the configured color comes back untouched afterwards.

use super::{
    ColorSource, INACTIVE_FACTOR, Lifecycle, LightProgram, ProgramError, Tick,
    PROGRAM_NAME_FIXED,
};
use crate::color::Rgb;
use crate::settings::DeviceLayout;

/// Fixed color program.
#[derive(Debug)]
pub struct Fixed {
    state: Lifecycle,
    color: Rgb,
    alarm_factor: f32,
}

impl Fixed {
    pub fn new(color: Rgb) -> Self {
        Self {
            state: Lifecycle::default(),
            color,
            alarm_factor: INACTIVE_FACTOR,
        }
    }

    /// Replace the configured color.
    pub fn set_color(&mut self, color: Rgb) {
        self.color = color;
    }

    /// The configured color, ignoring any running alarm.
    pub fn color(&self) -> Rgb {
        self.color
    }

    fn displayed(&self) -> Rgb {
        if self.alarm_factor == INACTIVE_FACTOR {
            self.color
        } else {
            Rgb::new(self.alarm_factor, 0.0, 0.0)
        }
    }
}

impl Default for Fixed {
    fn default() -> Self {
        Self::new(Rgb::BLACK)
    }
}

impl LightProgram for Fixed {
    fn name(&self) -> &'static str {
        PROGRAM_NAME_FIXED
    }

    fn lifecycle(&self) -> &Lifecycle {
        &self.state
    }

    fn lifecycle_mut(&mut self) -> &mut Lifecycle {
        &mut self.state
    }

    fn compute(&mut self, tick: &mut Tick<'_>) {
        self.alarm_factor = tick.alarm_factor;
    }
}

impl ColorSource for Fixed {
    fn ring_colors(&self, layout: &DeviceLayout) -> Result<Vec<Rgb>, ProgramError> {
        Ok(vec![self.displayed(); layout.ring_leds])
    }

    fn wled_colors(&self, layout: &DeviceLayout) -> Result<Vec<Rgb>, ProgramError> {
        Ok(vec![self.displayed(); layout.wled_leds])
    }

    fn strip_color(&self) -> Result<Rgb, ProgramError> {
        Ok(self.displayed())
    }
}
