//! Tick loop core: owns all programs and the per-device assignments.
//!
//! The engine does no I/O toward the lights themselves. Each tick it
//! advances every program's state, then the device layer pulls colors for
//! whatever is assigned and pushes them to the hardware.

use tracing::{error, info, warn};

use crate::audio::{AudioBridge, SharedAudioBridge};
use crate::color::Rgb;
use crate::program::{
    Adaptive, Alarm, ColorSource, DeviceHooks, Disabled, Fixed, LightProgram, ProgramError,
    ProgramId, Rainbow, Tick, INACTIVE_FACTOR,
};
use crate::settings::{DeviceLayout, Settings};

/// The three physical outputs the engine renders for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Device {
    Ring,
    Wled,
    Strip,
}

impl Device {
    pub const ALL: [Self; 3] = [Self::Ring, Self::Wled, Self::Strip];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ring => "ring",
            Self::Wled => "wled",
            Self::Strip => "strip",
        }
    }

    const fn index(self) -> usize {
        match self {
            Self::Ring => 0,
            Self::Wled => 1,
            Self::Strip => 2,
        }
    }
}

/// One instance of every program.
///
/// A separate struct so program access and the hooks box borrow disjoint
/// engine fields.
struct ProgramSet {
    disabled: Disabled,
    fixed: Fixed,
    rainbow: Rainbow,
    adaptive: Adaptive,
    alarm: Alarm,
    bridge: SharedAudioBridge,
}

impl ProgramSet {
    fn get_mut(&mut self, id: ProgramId) -> &mut dyn LightProgram {
        match id {
            ProgramId::Disabled => &mut self.disabled,
            ProgramId::Fixed => &mut self.fixed,
            ProgramId::Rainbow => &mut self.rainbow,
            ProgramId::Adaptive => &mut self.adaptive,
        }
    }

    fn color_source(&self, id: ProgramId) -> &dyn ColorSource {
        match id {
            ProgramId::Disabled => &self.disabled,
            ProgramId::Fixed => &self.fixed,
            ProgramId::Rainbow => &self.rainbow,
            ProgramId::Adaptive => &self.adaptive,
        }
    }
}

/// Tick-driven program engine.
pub struct Engine {
    programs: ProgramSet,
    hooks: Box<dyn DeviceHooks>,
    layout: DeviceLayout,
    speed: f32,
    assigned: [ProgramId; 3],
}

impl Engine {
    /// Build the engine, assign every device its configured program.
    ///
    /// A configured program that fails to start leaves its device disabled
    /// rather than failing construction.
    pub fn new(settings: &Settings, hooks: Box<dyn DeviceHooks>) -> Self {
        let layout = settings.layout();
        let bridge = AudioBridge::shared(settings.audio.clone());
        let mut engine = Self {
            programs: ProgramSet {
                disabled: Disabled::new(),
                fixed: Fixed::new(settings.fixed_color),
                rainbow: Rainbow::new(),
                adaptive: Adaptive::new(&layout, bridge.clone()),
                alarm: Alarm::new(),
                bridge,
            },
            hooks,
            layout,
            speed: settings.program_speed,
            assigned: [ProgramId::Disabled; 3],
        };

        for device in Device::ALL {
            if let Err(err) = engine
                .programs
                .get_mut(ProgramId::Disabled)
                .acquire(&mut *engine.hooks)
            {
                error!(%err, "disabled program refused to start");
            }
            let name = match device {
                Device::Ring => &settings.ring.program,
                Device::Wled => &settings.wled.program,
                Device::Strip => &settings.strip.program,
            };
            match ProgramId::parse_from_str(name) {
                Some(id) => {
                    if let Err(err) = engine.set_program(device, id) {
                        warn!(device = device.as_str(), %err, "configured program unavailable");
                    }
                }
                None => warn!(device = device.as_str(), program = %name, "unknown program"),
            }
        }
        engine
    }

    /// Advance every program by `seconds`.
    ///
    /// The alarm runs first so its factor for this tick is visible to the
    /// color programs in the same tick.
    pub fn tick(&mut self, seconds: f32) {
        let mut tick = Tick {
            seconds,
            speed: self.speed,
            alarm_factor: INACTIVE_FACTOR,
            hooks: &mut *self.hooks,
        };
        self.programs.alarm.compute(&mut tick);
        tick.alarm_factor = self.programs.alarm.factor();

        self.programs.bridge.borrow_mut().compute(&mut tick);
        self.programs.fixed.compute(&mut tick);
        self.programs.rainbow.compute(&mut tick);
        self.programs.adaptive.compute(&mut tick);
        self.programs.disabled.compute(&mut tick);
    }

    /// Assign `id` to `device`, swapping the lifecycle registrations.
    ///
    /// If the new program fails to start the device falls back to the
    /// disabled program and the error is returned.
    pub fn set_program(&mut self, device: Device, id: ProgramId) -> Result<(), ProgramError> {
        let current = self.assigned[device.index()];
        if current == id {
            return Ok(());
        }

        self.programs.get_mut(current).release(&mut *self.hooks);
        match self.programs.get_mut(id).acquire(&mut *self.hooks) {
            Ok(()) => {
                info!(device = device.as_str(), program = id.as_str(), "program assigned");
                self.assigned[device.index()] = id;
                Ok(())
            }
            Err(err) => {
                if let Err(fallback_err) = self
                    .programs
                    .get_mut(ProgramId::Disabled)
                    .acquire(&mut *self.hooks)
                {
                    error!(%fallback_err, "disabled program refused to start");
                }
                self.assigned[device.index()] = ProgramId::Disabled;
                Err(err)
            }
        }
    }

    /// The program currently assigned to `device`.
    pub fn program(&self, device: Device) -> ProgramId {
        self.assigned[device.index()]
    }

    /// Start flashing, keeping the assigned programs registered.
    pub fn begin_alarm(&mut self) {
        if let Err(err) = self.programs.alarm.acquire(&mut *self.hooks) {
            error!(%err, "alarm refused to start");
        }
    }

    pub fn end_alarm(&mut self) {
        self.programs.alarm.release(&mut *self.hooks);
    }

    /// Alarm brightness for the current tick, [`INACTIVE_FACTOR`] when idle.
    pub fn alarm_factor(&self) -> f32 {
        self.programs.alarm.factor()
    }

    pub fn set_fixed_color(&mut self, color: Rgb) {
        self.programs.fixed.set_color(color);
    }

    pub fn set_speed(&mut self, speed: f32) {
        self.speed = speed;
    }

    pub fn ring_colors(&self) -> Result<Vec<Rgb>, ProgramError> {
        self.programs
            .color_source(self.assigned[Device::Ring.index()])
            .ring_colors(&self.layout)
    }

    pub fn wled_colors(&self) -> Result<Vec<Rgb>, ProgramError> {
        self.programs
            .color_source(self.assigned[Device::Wled.index()])
            .wled_colors(&self.layout)
    }

    pub fn strip_color(&self) -> Result<Rgb, ProgramError> {
        self.programs
            .color_source(self.assigned[Device::Strip.index()])
            .strip_color()
    }
}
