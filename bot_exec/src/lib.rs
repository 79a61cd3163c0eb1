//! # Robot library.
//!
//! This library allows the executable, tests and benchmarks to access items
//! defined inside the robot crate.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// Calibration sequence - readies the sensors and zeroes the pose
pub mod calib;

/// Chassis interfaces - the hardware seams the robot is wired from
pub mod chassis;

/// Drive control module - converts gamepad axes into drivetrain voltages
pub mod drive_ctrl;

/// Motion control module - drives distances and turns to headings
pub mod motion_ctrl;

/// Executable parameters
pub mod params;

/// Closed-loop controllers
pub mod pid;

/// Robot context - owns the hardware and modules
pub mod robot;

/// Simulation - a differential drive plant for running off-robot
pub mod sim;
