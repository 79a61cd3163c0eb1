//! # Robot Executable Parameters
//!
//! This module provide parameters for the robot executable.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::Deserialize;

use crate::{calib::CalibParams, motion_ctrl::Motion, sim::SimParams};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct BotExecParams {

    /// Target period of one control cycle.
    ///
    /// Units: milliseconds
    pub cycle_period_ms: u64,

    /// Number of consecutive cycle overruns after which the executable stops.
    pub max_consec_overruns: u64,

    /// Calibration sequence parameters.
    #[serde(default)]
    pub calib: CalibParams,

    /// Simulated drivetrain parameters.
    #[serde(default)]
    pub sim: SimParams,

    /// Motions performed in order by the autonomous routine.
    #[serde(default)]
    pub auto_routine: Vec<Motion>,
}
