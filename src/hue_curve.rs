//! Logistic hue remapping curves.
//!
//! A plain `hue = i / led_count` assignment spends as much of the strip on
//! green and pink as it does on red and blue, which reads poorly on real
//! hardware. These curves run the position through one or two logistic
//! functions first, compressing the less useful bands so the prominent
//! colors get more LEDs.
//!
//! The base curve is `L(x) = M / (1 + e^(-k (x - c)))`, vertically shifted
//! and rescaled per use so the piecewise result spans its target range.

use libm::expf;

const WHEEL_STEEPNESS: f32 = 16.0;
const SPECTRUM_STEEPNESS: f32 = 12.0;
const SPECTRUM_CENTER: f32 = 9.0 / 16.0;

/// Input positions below this produce a flat red band in the spectrum remap.
const RED_BAND: f32 = 1.0 / 8.0;

/// Crossover steepness for the strip coefficient curves.
const CROSSOVER_STEEPNESS: f32 = 6.0 * core::f32::consts::E;

fn logistic(amplitude: f32, steepness: f32, center: f32, x: f32) -> f32 {
    amplitude / (1.0 + expf(-steepness * (x - center)))
}

/// Cyclic remap for a rotating color wheel.
///
/// Two logistic curves are combined: one compresses the band centered at
/// hue 1/3 (green), the other the band centered at 5/6 (pink), switching at
/// input 2/3. The pieces are rescaled so the result is continuous at the
/// boundary and wraps cleanly modulo 1.
fn wheel_remap(x: f32) -> f32 {
    const M1: f32 = 2.0 / 3.0;
    const M2: f32 = 1.0 / 3.0;

    if x < 2.0 / 3.0 {
        let y0 = logistic(M1, WHEEL_STEEPNESS, 1.0 / 3.0, 0.0);
        let scale = M1 / (M1 - 2.0 * y0);
        scale * (logistic(M1, WHEEL_STEEPNESS, 1.0 / 3.0, x) - y0)
    } else {
        let y0 = logistic(M2, WHEEL_STEEPNESS, 5.0 / 6.0, 2.0 / 3.0);
        let scale = M2 / (M2 - 2.0 * y0);
        scale * (logistic(M2, WHEEL_STEEPNESS, 5.0 / 6.0, x) - y0) + M1
    }
}

/// One wheel hue per LED, rotated by `offset`.
///
/// Index `i` is evaluated at `(offset + i / led_count) mod 1` and the output
/// is taken modulo 1 as well, so the strip can rotate forever.
pub fn wheel_hues(led_count: usize, offset: f32) -> Vec<f32> {
    (0..led_count)
        .map(|led| {
            let x = (offset + led as f32 / led_count as f32).rem_euclid(1.0);
            wheel_remap(x).rem_euclid(1.0)
        })
        .collect()
}

/// Non-cyclic remap for a frequency spectrum.
///
/// A single curve compresses green while keeping red and blue wide. Inputs
/// below [`RED_BAND`] are forced to exactly zero, reserving a solid red
/// section for the lowest frequencies. The endpoints intentionally do not
/// match up, so this is only valid for a linear, non-wrapping display.
fn spectrum_remap(x: f32) -> f32 {
    const M: f32 = 2.0 / 3.0;

    if x < RED_BAND {
        return 0.0;
    }
    let y0 = logistic(M, SPECTRUM_STEEPNESS, SPECTRUM_CENTER, RED_BAND);
    let scale = M / (M - 2.0 * y0);
    scale * logistic(M, SPECTRUM_STEEPNESS, SPECTRUM_CENTER, x) - y0
}

/// One spectrum hue per LED, low frequencies red, high frequencies blue.
pub fn spectrum_hues(led_count: usize) -> Vec<f32> {
    (0..led_count)
        .map(|led| spectrum_remap(led as f32 / led_count as f32))
        .collect()
}

/// Per-channel weights distributing a spectrum over a three-channel output.
#[derive(Debug, Clone)]
pub struct StripCoefficients {
    pub red: Vec<f32>,
    pub green: Vec<f32>,
    pub blue: Vec<f32>,
}

/// Smooth three-way partition of `granularity` spectrum positions.
///
/// Red and blue are logistic crossovers at 1/3 and 2/3 of the span; green is
/// the remainder. At every position the three coefficients sum to 1 and each
/// channel's curve integrates to `granularity / 3`, so no channel is favored
/// overall while avoiding hard cuts between them.
pub fn crossover_coefficients(granularity: usize) -> StripCoefficients {
    let span = (granularity - 1).max(1) as f32;

    let red: Vec<f32> = (0..granularity)
        .map(|i| 1.0 - logistic(1.0, CROSSOVER_STEEPNESS, 1.0 / 3.0, i as f32 / span))
        .collect();
    let blue: Vec<f32> = (0..granularity)
        .map(|i| logistic(1.0, CROSSOVER_STEEPNESS, 2.0 / 3.0, i as f32 / span))
        .collect();
    let green: Vec<f32> = red
        .iter()
        .zip(&blue)
        .map(|(r, b)| 1.0 - r - b)
        .collect();

    StripCoefficients { red, green, blue }
}
