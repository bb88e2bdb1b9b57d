//! Program lifecycle contract and the color-producing capability.
//!
//! Every program is reference counted: `acquire` starts it on the first
//! consumer, `release` stops it after the last one. Scarce resources (the
//! audio bridge's capture process) are opened and closed exactly once no
//! matter how many devices funnel through them.

mod adaptive;
mod alarm;
mod disabled;
mod fixed;
mod rainbow;

use std::io;
use std::path::PathBuf;

use thiserror::Error;

pub use adaptive::Adaptive;
pub use alarm::{Alarm, INACTIVE_FACTOR};
pub use disabled::Disabled;
pub use fixed::Fixed;
pub use rainbow::Rainbow;

use crate::color::Rgb;
use crate::settings::DeviceLayout;

const PROGRAM_NAME_DISABLED: &str = "disabled";
const PROGRAM_NAME_FIXED: &str = "fixed";
const PROGRAM_NAME_RAINBOW: &str = "rainbow";
const PROGRAM_NAME_ADAPTIVE: &str = "adaptive";
const PROGRAM_NAME_ALARM: &str = "alarm";
pub(crate) const PROGRAM_NAME_AUDIO: &str = "audio";

const PROGRAM_ID_DISABLED: u8 = 0;
const PROGRAM_ID_FIXED: u8 = 1;
const PROGRAM_ID_RAINBOW: u8 = 2;
const PROGRAM_ID_ADAPTIVE: u8 = 3;

/// Errors surfaced by program operations.
#[derive(Debug, Error)]
pub enum ProgramError {
    /// Color query on a program that produces no colors.
    #[error("program `{program}` does not produce colors")]
    Unsupported { program: &'static str },

    /// The spectrum analyzer process could not be launched.
    #[error("failed to launch spectrum analyzer: {0}")]
    Spawn(#[source] io::Error),

    /// The audio pipe could not be created or opened.
    #[error("audio pipe at `{path}` unavailable: {source}")]
    Pipe {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Callbacks into the device layer that programs may trigger.
///
/// Implemented by the scheduler that owns the physical outputs; the core
/// never talks to hardware directly.
pub trait DeviceHooks {
    /// Switch the auxiliary alarm indicator (e.g. a board power LED).
    fn set_indicator(&mut self, on: bool);

    /// Tell the capture side which update rate the analyzer should produce.
    fn set_capture_rate(&mut self, ticks_per_second: u32);
}

/// Hooks implementation that ignores every callback.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullHooks;

impl DeviceHooks for NullHooks {
    fn set_indicator(&mut self, _on: bool) {}
    fn set_capture_rate(&mut self, _ticks_per_second: u32) {}
}

/// Per-tick parameters handed to every program's `compute`.
pub struct Tick<'a> {
    /// Length of this tick in seconds.
    pub seconds: f32,
    /// User-configured speed multiplier.
    pub speed: f32,
    /// Alarm brightness factor for this tick, [`INACTIVE_FACTOR`] when the
    /// alarm is not running.
    pub alarm_factor: f32,
    /// Device layer callbacks.
    pub hooks: &'a mut dyn DeviceHooks,
}

/// Consumer counter backing the lifecycle contract.
#[derive(Debug, Default, Clone, Copy)]
pub struct Lifecycle {
    consumers: u32,
}

impl Lifecycle {
    /// Number of active consumers.
    pub const fn consumers(&self) -> u32 {
        self.consumers
    }

    pub(crate) fn add(&mut self) {
        self.consumers += 1;
    }

    pub(crate) fn remove(&mut self) {
        self.consumers -= 1;
    }
}

/// The base capability shared by all programs.
///
/// `start`/`stop` allocate and free resources; `compute` runs once per tick
/// for every program and must stay free of external side effects while the
/// consumer count is zero.
pub trait LightProgram {
    fn name(&self) -> &'static str;

    fn lifecycle(&self) -> &Lifecycle;

    fn lifecycle_mut(&mut self) -> &mut Lifecycle;

    /// Initialize the program, allocating resources.
    fn start(&mut self, hooks: &mut dyn DeviceHooks) -> Result<(), ProgramError> {
        let _ = hooks;
        Ok(())
    }

    /// Advance per-tick state. Called once per tick regardless of consumers.
    fn compute(&mut self, tick: &mut Tick<'_>) {
        let _ = tick;
    }

    /// Stop the program, releasing resources.
    fn stop(&mut self, hooks: &mut dyn DeviceHooks) {
        let _ = hooks;
    }

    /// Whether at least one consumer is using the program.
    fn is_active(&self) -> bool {
        self.lifecycle().consumers() > 0
    }

    /// Register a consumer, starting the program on the 0 -> 1 transition.
    ///
    /// A failing `start` leaves the count at zero so the caller may retry
    /// or fall back to another program.
    fn acquire(&mut self, hooks: &mut dyn DeviceHooks) -> Result<(), ProgramError> {
        if self.lifecycle().consumers() == 0 {
            self.start(hooks)?;
        }
        self.lifecycle_mut().add();
        Ok(())
    }

    /// Drop a consumer, stopping the program on the 1 -> 0 transition.
    ///
    /// A release without a matching acquire is logged and ignored; the
    /// count never goes below zero.
    fn release(&mut self, hooks: &mut dyn DeviceHooks) {
        if self.lifecycle().consumers() == 0 {
            tracing::warn!(program = self.name(), "release without matching acquire");
            return;
        }
        self.lifecycle_mut().remove();
        if self.lifecycle().consumers() == 0 {
            self.stop(hooks);
        }
    }
}

/// Capability implemented by programs that produce device colors.
///
/// The alarm and the audio bridge deliberately do not implement this; they
/// only feed state into programs that do.
pub trait ColorSource {
    /// Colors for the ring, one triple per LED.
    fn ring_colors(&self, layout: &DeviceLayout) -> Result<Vec<Rgb>, ProgramError>;

    /// Colors for the WLED device, one triple per LED.
    fn wled_colors(&self, layout: &DeviceLayout) -> Result<Vec<Rgb>, ProgramError>;

    /// The single color for the strip.
    fn strip_color(&self) -> Result<Rgb, ProgramError>;
}

/// Known program ids that can be assigned to a device.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum ProgramId {
    Disabled = PROGRAM_ID_DISABLED,
    Fixed = PROGRAM_ID_FIXED,
    Rainbow = PROGRAM_ID_RAINBOW,
    Adaptive = PROGRAM_ID_ADAPTIVE,
}

impl ProgramId {
    pub fn from_raw(value: u8) -> Option<Self> {
        Some(match value {
            PROGRAM_ID_DISABLED => Self::Disabled,
            PROGRAM_ID_FIXED => Self::Fixed,
            PROGRAM_ID_RAINBOW => Self::Rainbow,
            PROGRAM_ID_ADAPTIVE => Self::Adaptive,
            _ => return None,
        })
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Disabled => PROGRAM_NAME_DISABLED,
            Self::Fixed => PROGRAM_NAME_FIXED,
            Self::Rainbow => PROGRAM_NAME_RAINBOW,
            Self::Adaptive => PROGRAM_NAME_ADAPTIVE,
        }
    }

    pub fn parse_from_str(s: &str) -> Option<Self> {
        match s {
            PROGRAM_NAME_DISABLED => Some(Self::Disabled),
            PROGRAM_NAME_FIXED => Some(Self::Fixed),
            PROGRAM_NAME_RAINBOW => Some(Self::Rainbow),
            PROGRAM_NAME_ADAPTIVE => Some(Self::Adaptive),
            _ => None,
        }
    }
}
