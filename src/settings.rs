//! Configuration loaded from a TOML file.
//!
//! Every field has a default so a missing or partial file still yields a
//! working configuration. Parse problems are logged and fall back to the
//! defaults instead of aborting, lights are not worth crashing over.

use std::env;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::color::Rgb;

/// Top-level configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Target tick rate of the engine loop.
    pub frames_per_second: u32,
    /// Speed multiplier applied to time-based programs.
    pub program_speed: f32,
    /// Color shown by the fixed program until changed.
    pub fixed_color: Rgb,
    pub ring: DeviceSettings,
    pub wled: DeviceSettings,
    pub strip: DeviceSettings,
    pub audio: AudioSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            frames_per_second: 20,
            program_speed: 1.0,
            fixed_color: Rgb::WHITE,
            ring: DeviceSettings::with_led_count(16),
            wled: DeviceSettings::with_led_count(60),
            strip: DeviceSettings::with_led_count(1),
            audio: AudioSettings::default(),
        }
    }
}

/// Settings for one physical output.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DeviceSettings {
    pub led_count: usize,
    /// Output brightness in `[0, 1]`, applied by the device layer.
    pub brightness: f32,
    /// Collapse colors to a single channel, for single-color hardware.
    pub monochrome: bool,
    /// Name of the initially assigned program.
    pub program: String,
}

impl DeviceSettings {
    fn with_led_count(led_count: usize) -> Self {
        Self {
            led_count,
            brightness: 1.0,
            monochrome: false,
            program: "disabled".into(),
        }
    }
}

impl Default for DeviceSettings {
    fn default() -> Self {
        Self::with_led_count(1)
    }
}

/// Settings for the external spectrum analyzer.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AudioSettings {
    /// Frequency bars per spectrum frame, one byte each on the wire.
    pub bars: usize,
    /// Named pipe carrying the analyzer's output.
    pub fifo_path: PathBuf,
    /// Analyzer executable.
    pub command: String,
    pub args: Vec<String>,
    /// Update rate requested from the capture side, frames per second.
    pub capture_rate: u32,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            bars: 256,
            fifo_path: env::temp_dir().join("spectrum.fifo"),
            command: "cava".into(),
            args: Vec::new(),
            capture_rate: 20,
        }
    }
}

/// LED counts the color-producing programs render for.
#[derive(Debug, Clone, Copy)]
pub struct DeviceLayout {
    pub ring_leds: usize,
    pub wled_leds: usize,
}

impl Settings {
    /// Read settings from `path`, falling back to defaults on any problem.
    pub fn load(path: &Path) -> Self {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) => {
                tracing::warn!(path = %path.display(), %err, "settings unreadable, using defaults");
                return Self::default();
            }
        };
        match Self::from_toml(&text) {
            Ok(settings) => settings,
            Err(err) => {
                tracing::warn!(path = %path.display(), %err, "settings invalid, using defaults");
                Self::default()
            }
        }
    }

    /// Parse settings from TOML text.
    pub fn from_toml(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    pub fn layout(&self) -> DeviceLayout {
        DeviceLayout {
            ring_leds: self.ring.led_count,
            wled_leds: self.wled.led_count,
        }
    }
}
