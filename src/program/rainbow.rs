//! Rainbow cycling program.
//!
//! Continuously cycles through all hues using the cyclic wheel remap.
//! Affected by the configured speed multiplier.

use super::{
    ColorSource, Lifecycle, LightProgram, ProgramError, Tick, PROGRAM_NAME_RAINBOW,
};
use crate::color::{Rgb, hsv_to_rgb};
use crate::hue_curve::wheel_hues;
use crate::settings::DeviceLayout;

/// Length of one full color cycle in seconds, before the speed multiplier.
const PROGRAM_DURATION: f32 = 1.0;

/// Rainbow cycling program.
#[derive(Debug, Default)]
pub struct Rainbow {
    state: Lifecycle,
    time_passed: f32,
    current_fraction: f32,
}

impl Rainbow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current position in the cycle, in `[0, 1)`.
    pub fn current_fraction(&self) -> f32 {
        self.current_fraction
    }

    fn colors(&self, led_count: usize) -> Vec<Rgb> {
        wheel_hues(led_count, self.current_fraction)
            .into_iter()
            .map(|hue| hsv_to_rgb(hue, 1.0, 1.0))
            .collect()
    }
}

impl LightProgram for Rainbow {
    fn name(&self) -> &'static str {
        PROGRAM_NAME_RAINBOW
    }

    fn lifecycle(&self) -> &Lifecycle {
        &self.state
    }

    fn lifecycle_mut(&mut self) -> &mut Lifecycle {
        &mut self.state
    }

    fn start(&mut self, _hooks: &mut dyn super::DeviceHooks) -> Result<(), ProgramError> {
        self.time_passed = 0.0;
        Ok(())
    }

    fn compute(&mut self, tick: &mut Tick<'_>) {
        self.time_passed =
            (self.time_passed + tick.seconds * tick.speed).rem_euclid(PROGRAM_DURATION);
        self.current_fraction = self.time_passed / PROGRAM_DURATION;
    }
}

impl ColorSource for Rainbow {
    fn ring_colors(&self, layout: &DeviceLayout) -> Result<Vec<Rgb>, ProgramError> {
        Ok(self.colors(layout.ring_leds))
    }

    fn wled_colors(&self, layout: &DeviceLayout) -> Result<Vec<Rgb>, ProgramError> {
        Ok(self.colors(layout.wled_leds))
    }

    fn strip_color(&self) -> Result<Rgb, ProgramError> {
        Ok(hsv_to_rgb(self.current_fraction, 1.0, 1.0))
    }
}
