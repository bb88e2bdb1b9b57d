//! Placeholder program for devices that should stay dark.

use super::{
    ColorSource, Lifecycle, LightProgram, ProgramError, PROGRAM_NAME_DISABLED,
};
use crate::color::Rgb;
use crate::settings::DeviceLayout;

/// Program assigned to a device that is switched off.
///
/// Color queries fail so the device layer can tell "render black" apart
/// from "do not render at all".
#[derive(Debug, Default)]
pub struct Disabled {
    state: Lifecycle,
}

impl Disabled {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LightProgram for Disabled {
    fn name(&self) -> &'static str {
        PROGRAM_NAME_DISABLED
    }

    fn lifecycle(&self) -> &Lifecycle {
        &self.state
    }

    fn lifecycle_mut(&mut self) -> &mut Lifecycle {
        &mut self.state
    }
}

impl ColorSource for Disabled {
    fn ring_colors(&self, _layout: &DeviceLayout) -> Result<Vec<Rgb>, ProgramError> {
        Err(ProgramError::Unsupported {
            program: PROGRAM_NAME_DISABLED,
        })
    }

    fn wled_colors(&self, _layout: &DeviceLayout) -> Result<Vec<Rgb>, ProgramError> {
        Err(ProgramError::Unsupported {
            program: PROGRAM_NAME_DISABLED,
        })
    }

    fn strip_color(&self) -> Result<Rgb, ProgramError> {
        Err(ProgramError::Unsupported {
            program: PROGRAM_NAME_DISABLED,
        })
    }
}
