//! # Chassis module
//!
//! Interfaces to the hardware the robot is wired from: motor groups, the
//! inertial sensor, the operator's gamepad and the chassis (odometry and
//! pose keeping). Implementations are owned by the [`Robot`](crate::robot::Robot)
//! context and handed to the modules that need them.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Largest magnitude of a motor voltage command.
pub const MAX_MOTOR_CMD: i32 = 127;

/// Largest magnitude of a gamepad analog axis reading.
pub const MAX_ANALOG: i32 = 127;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// The position and heading of the robot on the field.
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    /// Units: inches
    pub x: f64,

    /// Units: inches
    pub y: f64,

    /// Heading, clockwise from the +y axis.
    ///
    /// Units: degrees
    pub theta: f64,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// The analog axes of a gamepad.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Axis {
    LeftX,
    LeftY,
    RightX,
    RightY,
}

// ---------------------------------------------------------------------------
// TRAITS
// ---------------------------------------------------------------------------

/// A group of motors commanded together.
pub trait MotorGroup {
    /// Command a voltage in `[-MAX_MOTOR_CMD, MAX_MOTOR_CMD]`.
    fn move_voltage(&mut self, voltage: i32);
}

/// An inertial sensor which must be calibrated before use.
pub trait Inertial {
    /// Start calibrating the sensor.
    fn reset(&mut self);

    /// True while calibration is still running.
    fn is_calibrating(&self) -> bool;
}

/// The operator's gamepad.
pub trait Gamepad {
    /// Read an analog axis in `[-MAX_ANALOG, MAX_ANALOG]`.
    fn get_analog(&self, axis: Axis) -> i32;
}

/// The chassis, which keeps track of the robot's pose.
pub trait Chassis {
    /// Calibrate the odometry sensors.
    fn calibrate(&mut self);

    /// Overwrite the current pose.
    fn set_pose(&mut self, pose: Pose);

    /// Get the current pose.
    fn get_pose(&self) -> Pose;
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Pose {
    pub fn new(x: f64, y: f64, theta: f64) -> Self {
        Self { x, y, theta }
    }

    /// Distance travelled from `start` along the heading `start` faced.
    ///
    /// Sideways motion does not count, and driving backwards is negative.
    pub fn dist_along(&self, start: &Pose) -> f64 {
        let (sin, cos) = start.theta.to_radians().sin_cos();
        (self.x - start.x) * sin + (self.y - start.y) * cos
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_dist_along() {
        let start = Pose::new(0.0, 0.0, 0.0);
        assert_eq!(Pose::new(3.0, 10.0, 0.0).dist_along(&start), 10.0);
        assert_eq!(Pose::new(0.0, -4.0, 0.0).dist_along(&start), -4.0);

        let start = Pose::new(1.0, 1.0, 90.0);
        let d = Pose::new(6.0, 1.0, 90.0).dist_along(&start);
        assert!((d - 5.0).abs() < 1e-9);
    }
}
