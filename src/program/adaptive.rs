//! Music-reactive program driven by the audio bridge.
//!
//! The ring and the WLED device show the live frequency spectrum mapped
//! onto hues; the strip blends everything into a single color. Base hues
//! are precomputed per device so each tick only scales them by the
//! current spectrum intensities.

use super::{
    ColorSource, DeviceHooks, Lifecycle, LightProgram, ProgramError,
    PROGRAM_NAME_ADAPTIVE,
};
use crate::audio::{aggregate_bins, SharedAudioBridge};
use crate::color::{Rgb, hsv_to_rgb};
use crate::hue_curve::{crossover_coefficients, spectrum_hues, StripCoefficients};
use crate::settings::DeviceLayout;

/// Number of spectrum bins the single strip color is mixed from.
const STRIP_GRANULARITY: usize = 16;

/// Music-reactive spectrum program.
pub struct Adaptive {
    state: Lifecycle,
    bridge: SharedAudioBridge,
    ring_base: Vec<Rgb>,
    wled_base: Vec<Rgb>,
    coefficients: StripCoefficients,
}

impl Adaptive {
    pub fn new(layout: &DeviceLayout, bridge: SharedAudioBridge) -> Self {
        let base = |led_count| {
            spectrum_hues(led_count)
                .into_iter()
                .map(|hue| hsv_to_rgb(hue, 1.0, 1.0))
                .collect()
        };
        Self {
            state: Lifecycle::default(),
            bridge,
            ring_base: base(layout.ring_leds),
            wled_base: base(layout.wled_leds),
            coefficients: crossover_coefficients(STRIP_GRANULARITY),
        }
    }

    fn scaled_colors(&self, base: &[Rgb]) -> Vec<Rgb> {
        let bridge = self.bridge.borrow();
        let amplitudes = aggregate_bins(bridge.frame(), base.len());
        base.iter()
            .zip(&amplitudes)
            .map(|(color, &amplitude)| color.scaled(amplitude))
            .collect()
    }
}

impl LightProgram for Adaptive {
    fn name(&self) -> &'static str {
        PROGRAM_NAME_ADAPTIVE
    }

    fn lifecycle(&self) -> &Lifecycle {
        &self.state
    }

    fn lifecycle_mut(&mut self) -> &mut Lifecycle {
        &mut self.state
    }

    fn start(&mut self, hooks: &mut dyn DeviceHooks) -> Result<(), ProgramError> {
        self.bridge.borrow_mut().acquire(hooks)
    }

    fn stop(&mut self, hooks: &mut dyn DeviceHooks) {
        self.bridge.borrow_mut().release(hooks);
    }
}

impl ColorSource for Adaptive {
    fn ring_colors(&self, _layout: &DeviceLayout) -> Result<Vec<Rgb>, ProgramError> {
        Ok(self.scaled_colors(&self.ring_base))
    }

    fn wled_colors(&self, _layout: &DeviceLayout) -> Result<Vec<Rgb>, ProgramError> {
        Ok(self.scaled_colors(&self.wled_base))
    }

    /// Mix the whole spectrum into one color.
    ///
    /// Each channel is a weighted sum over [`STRIP_GRANULARITY`] bins,
    /// normalized so a uniform full-scale spectrum yields white, then
    /// clipped to the valid range.
    fn strip_color(&self) -> Result<Rgb, ProgramError> {
        let bridge = self.bridge.borrow();
        let amplitudes = aggregate_bins(bridge.frame(), STRIP_GRANULARITY);

        let mix = |weights: &[f32]| {
            let sum: f32 = weights
                .iter()
                .zip(&amplitudes)
                .map(|(w, a)| w * a)
                .sum();
            (sum * 3.0 / STRIP_GRANULARITY as f32).min(1.0)
        };

        Ok(Rgb::new(
            mix(&self.coefficients.red),
            mix(&self.coefficients.green),
            mix(&self.coefficients.blue),
        ))
    }
}
