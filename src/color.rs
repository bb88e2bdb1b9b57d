//! Floating-point RGB color support.
//!
//! Device renderers consume channel values in `[0, 1]`; conversion to
//! whatever integer depth the hardware wants happens outside this crate.

use serde::{Deserialize, Serialize};

/// An RGB triple with each channel in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0);
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0);

    /// Create a new color from channel values.
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Scale every channel by `factor` without clamping.
    pub fn scaled(self, factor: f32) -> Self {
        Self {
            r: self.r * factor,
            g: self.g * factor,
            b: self.b * factor,
        }
    }
}

/// Convert an HSV color to RGB.
///
/// All inputs are in `[0, 1]`; the hue wraps around the unit circle, so
/// values outside that range are folded back in before conversion.
pub fn hsv_to_rgb(hue: f32, sat: f32, val: f32) -> Rgb {
    let h = hue.rem_euclid(1.0) * 6.0;
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let sector = (h as u32) % 6;
    let f = h - h.floor();

    let p = val * (1.0 - sat);
    let q = val * (1.0 - sat * f);
    let t = val * (1.0 - sat * (1.0 - f));

    match sector {
        0 => Rgb::new(val, t, p),
        1 => Rgb::new(q, val, p),
        2 => Rgb::new(p, val, t),
        3 => Rgb::new(p, q, val),
        4 => Rgb::new(t, p, val),
        _ => Rgb::new(val, p, q),
    }
}
