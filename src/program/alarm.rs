//! Alarm flash state machine.
//!
//! Tracks the brightness of a red flash synchronized to a repeating alarm
//! sound. The program produces no colors itself; other programs read
//! [`Alarm::factor`] and render it.

use super::{DeviceHooks, Lifecycle, LightProgram, ProgramError, Tick, PROGRAM_NAME_ALARM};

/// Sentinel factor reported while the alarm is not running.
///
/// Distinct from `0.0`, which occurs between flashes of a running alarm.
pub const INACTIVE_FACTOR: f32 = -1.0;

/// Seconds to ramp the flash from 0 to full brightness.
const INCREASING_DURATION: f32 = 0.45;
/// Seconds to ramp the flash back down at the end of the sound.
const DECREASING_DURATION: f32 = 0.8;
/// Length of one alarm sound.
const SOUND_DURATION: f32 = 2.1;
/// Interval at which the sound repeats.
const REPEAT_PERIOD: f32 = 2.5;
/// Number of sound repetitions before the alarm goes quiet.
const MAX_REPETITIONS: u32 = 4;

/// Indicator switch point. The hysteresis check keeps the indicator from
/// being retoggled on every tick at low tick rates.
const INDICATOR_THRESHOLD: f32 = 0.7;

/// Alarm flash state machine.
#[derive(Debug)]
pub struct Alarm {
    state: Lifecycle,
    time_passed: f32,
    sound_count: u32,
    factor: f32,
    indicator_on: bool,
}

impl Default for Alarm {
    fn default() -> Self {
        Self {
            state: Lifecycle::default(),
            time_passed: 0.0,
            sound_count: 0,
            factor: INACTIVE_FACTOR,
            indicator_on: false,
        }
    }
}

impl Alarm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current flash brightness in `[0, 1]`, or [`INACTIVE_FACTOR`].
    pub fn factor(&self) -> f32 {
        self.factor
    }

    /// Number of completed sound repetitions.
    pub fn sound_count(&self) -> u32 {
        self.sound_count
    }
}

impl LightProgram for Alarm {
    fn name(&self) -> &'static str {
        PROGRAM_NAME_ALARM
    }

    fn lifecycle(&self) -> &Lifecycle {
        &self.state
    }

    fn lifecycle_mut(&mut self) -> &mut Lifecycle {
        &mut self.state
    }

    fn start(&mut self, _hooks: &mut dyn DeviceHooks) -> Result<(), ProgramError> {
        self.time_passed = 0.0;
        self.sound_count = 0;
        self.factor = 0.0;
        Ok(())
    }

    fn compute(&mut self, tick: &mut Tick<'_>) {
        if !self.is_active() {
            return;
        }

        self.time_passed += tick.seconds;
        if self.time_passed >= REPEAT_PERIOD {
            self.sound_count += 1;
            self.time_passed = self.time_passed.rem_euclid(REPEAT_PERIOD);
        }

        if self.sound_count >= MAX_REPETITIONS {
            self.factor = 0.0;
            return;
        }

        self.factor = if self.time_passed < INCREASING_DURATION {
            self.time_passed / INCREASING_DURATION
        } else if self.time_passed < SOUND_DURATION - DECREASING_DURATION {
            1.0
        } else if self.time_passed < SOUND_DURATION {
            1.0 - (self.time_passed - (SOUND_DURATION - DECREASING_DURATION))
                / DECREASING_DURATION
        } else {
            0.0
        };

        if self.indicator_on && self.factor < INDICATOR_THRESHOLD {
            tick.hooks.set_indicator(false);
            self.indicator_on = false;
        } else if !self.indicator_on && self.factor >= INDICATOR_THRESHOLD {
            tick.hooks.set_indicator(true);
            self.indicator_on = true;
        }
    }

    fn stop(&mut self, _hooks: &mut dyn DeviceHooks) {
        self.factor = INACTIVE_FACTOR;
    }
}
