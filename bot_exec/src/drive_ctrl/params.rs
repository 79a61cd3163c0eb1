//! Parameters structure for DriveCtrl

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::Deserialize;
use crate::chassis::{Axis, MAX_ANALOG};
use super::DriveCtrlError;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for drive control.
#[derive(Debug, Clone, Deserialize)]
pub struct Params {

    // ---- AXES ----

    /// Gamepad axis which drives forwards (positive) and backwards.
    pub forward_axis: Axis,

    /// Gamepad axis which turns clockwise (positive) and anticlockwise.
    pub turn_axis: Axis,

    /// Axis readings with a magnitude at or below this are treated as zero.
    pub deadband: i32,

    // ---- OUTPUTS ----

    /// Negate the left side command, for motors mounted the other way round.
    pub invert_left: bool,

    /// Negate the right side command.
    pub invert_right: bool,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for Params {
    fn default() -> Self {
        Self {
            forward_axis: Axis::LeftY,
            turn_axis: Axis::RightX,
            deadband: 0,
            invert_left: false,
            invert_right: false,
        }
    }
}

impl Params {
    pub fn validate(&self) -> Result<(), DriveCtrlError> {
        if self.deadband < 0 || self.deadband >= MAX_ANALOG {
            return Err(DriveCtrlError::InvalidParams(format!(
                "deadband must be in [0, {}), found {}",
                MAX_ANALOG, self.deadband
            )));
        }

        if self.forward_axis == self.turn_axis {
            return Err(DriveCtrlError::InvalidParams(format!(
                "forward and turn must use different axes, both are {:?}",
                self.forward_axis
            )));
        }

        Ok(())
    }
}
