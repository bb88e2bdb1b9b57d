pub mod audio;
pub mod color;
pub mod engine;
pub mod hue_curve;
pub mod program;
pub mod settings;

pub use audio::{AudioBridge, SharedAudioBridge};
pub use color::{Rgb, hsv_to_rgb};
pub use engine::{Device, Engine};
pub use program::{
    ColorSource, DeviceHooks, LightProgram, NullHooks, ProgramError, ProgramId, Tick,
    INACTIVE_FACTOR,
};
pub use settings::{DeviceLayout, Settings};
