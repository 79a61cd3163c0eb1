//! # Robot context
//!
//! The robot owns its hardware handles and modules. Nothing reaches for
//! hardware through globals: each cycle function borrows what it needs from
//! here.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use std::time::Duration;
use log::debug;

// Internal
use crate::{
    calib::{self, CalibError, CalibParams},
    chassis::{Chassis, Gamepad, Inertial, MotorGroup, Pose},
    drive_ctrl::{self, DriveCtrl, DriveCtrlError},
    motion_ctrl::{self, Motion, MotionCtrl, MotionCtrlError},
};
use util::module::State;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// The hardware the robot is built from.
pub struct Hardware {
    pub left_motors: Box<dyn MotorGroup>,
    pub right_motors: Box<dyn MotorGroup>,
    pub inertial: Box<dyn Inertial>,
    pub chassis: Box<dyn Chassis>,
    pub gamepad: Box<dyn Gamepad>,
}

/// The robot context.
pub struct Robot {
    hw: Hardware,

    pub drive_ctrl: DriveCtrl,
    pub motion_ctrl: MotionCtrl,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Robot {
    pub fn new(hw: Hardware, drive_ctrl: DriveCtrl, motion_ctrl: MotionCtrl) -> Self {
        Self { hw, drive_ctrl, motion_ctrl }
    }

    /// Run the one-shot calibration sequence.
    pub fn calibrate<W>(&mut self, params: &CalibParams, wait: W) -> Result<(), CalibError>
    where
        W: FnMut(Duration)
    {
        calib::calibrate(
            self.hw.inertial.as_mut(),
            self.hw.chassis.as_mut(),
            params,
            wait
        )
    }

    /// One cycle of operator control: read the gamepad, mix, command motors.
    pub fn teleop_cycle(&mut self)
        -> Result<(drive_ctrl::OutputData, drive_ctrl::StatusReport), DriveCtrlError>
    {
        let input = self.drive_ctrl.read_input(self.hw.gamepad.as_ref())?;
        let (output, report) = self.drive_ctrl.proc(&input)?;

        self.command(output.left, output.right);

        let pose = self.pose();
        debug!("X: {:.2} Y: {:.2} A: {:.2}", pose.x, pose.y, pose.theta);

        Ok((output, report))
    }

    /// One cycle of motion control.
    ///
    /// `cmd` starts a new motion, abandoning any current one.
    pub fn motion_cycle(&mut self, cmd: Option<Motion>, dt_ms: f64)
        -> Result<(motion_ctrl::OutputData, motion_ctrl::StatusReport), MotionCtrlError>
    {
        let input = motion_ctrl::InputData {
            cmd,
            pose: self.pose(),
            dt_ms,
        };

        let (output, report) = self.motion_ctrl.proc(&input)?;

        self.command(output.left, output.right);

        Ok((output, report))
    }

    /// Stop all drive motors and abandon any motion.
    pub fn stop(&mut self) {
        self.motion_ctrl.abort();
        self.command(0, 0);
    }

    pub fn pose(&self) -> Pose {
        self.hw.chassis.get_pose()
    }

    fn command(&mut self, left: i32, right: i32) {
        self.hw.left_motors.move_voltage(left);
        self.hw.right_motors.move_voltage(right);
    }
}
