//! Simulated drivetrain plant

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use std::cell::RefCell;
use std::rc::Rc;
use log::trace;
use serde::Deserialize;

// Internal
use crate::chassis::{Chassis, Inertial, MotorGroup, Pose, MAX_MOTOR_CMD};
use util::maths::wrap_deg;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters of the simulated drivetrain.
#[derive(Debug, Clone, Deserialize)]
pub struct SimParams {
    /// Distance between the left and right wheels.
    ///
    /// Units: inches
    pub track_width_in: f64,

    /// Units: inches
    pub wheel_diameter_in: f64,

    /// Wheel speed at full voltage.
    ///
    /// Units: revolutions/minute
    pub wheel_rpm: f64,

    /// First order time constant of the wheel speed response.
    ///
    /// Units: milliseconds
    pub time_constant_ms: f64,

    /// How long the inertial sensor takes to calibrate.
    ///
    /// Units: milliseconds
    pub imu_calibration_ms: f64,
}

/// A handle onto the shared simulated plant.
#[derive(Clone)]
pub struct SimPlant {
    inner: Rc<RefCell<PlantState>>,
}

/// Which side of the drivetrain a motor group drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

/// A simulated motor group.
pub struct SimMotorGroup {
    side: Side,
    plant: SimPlant,
}

/// A simulated inertial sensor.
pub struct SimInertial {
    plant: SimPlant,
}

/// A simulated chassis, dead-reckoning the plant's true pose.
pub struct SimChassis {
    plant: SimPlant,
    calibrated: bool,
}

#[derive(Debug)]
struct PlantState {
    params: SimParams,
    left_cmd: i32,
    right_cmd: i32,
    left_speed_ips: f64,
    right_speed_ips: f64,
    pose: Pose,
    imu_calib_remaining_ms: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for SimParams {
    fn default() -> Self {
        Self {
            track_width_in: 12.0,
            wheel_diameter_in: 2.75,
            wheel_rpm: 200.0,
            time_constant_ms: 50.0,
            imu_calibration_ms: 200.0,
        }
    }
}

impl SimParams {
    /// Linear wheel speed at full voltage.
    ///
    /// Units: inches/second
    pub fn max_speed_ips(&self) -> f64 {
        self.wheel_rpm * std::f64::consts::PI * self.wheel_diameter_in / 60.0
    }
}

impl SimPlant {
    pub fn new(params: SimParams) -> Self {
        Self {
            inner: Rc::new(RefCell::new(PlantState {
                params,
                left_cmd: 0,
                right_cmd: 0,
                left_speed_ips: 0.0,
                right_speed_ips: 0.0,
                pose: Pose::default(),
                imu_calib_remaining_ms: 0.0,
            }))
        }
    }

    pub fn motor_group(&self, side: Side) -> SimMotorGroup {
        SimMotorGroup { side, plant: self.clone() }
    }

    pub fn inertial(&self) -> SimInertial {
        SimInertial { plant: self.clone() }
    }

    pub fn chassis(&self) -> SimChassis {
        SimChassis { plant: self.clone(), calibrated: false }
    }

    /// The true pose of the simulated robot.
    pub fn pose(&self) -> Pose {
        self.inner.borrow().pose
    }

    /// The last voltage commanded to each side, `(left, right)`.
    pub fn commands(&self) -> (i32, i32) {
        let s = self.inner.borrow();
        (s.left_cmd, s.right_cmd)
    }

    /// Advance the simulation by `dt_ms`.
    pub fn step(&self, dt_ms: f64) {
        if !(dt_ms > 0.0) {
            return;
        }

        let mut s = self.inner.borrow_mut();

        s.imu_calib_remaining_ms = (s.imu_calib_remaining_ms - dt_ms).max(0.0);

        // First order response of each side towards the commanded speed
        let max_speed = s.params.max_speed_ips();
        let alpha = if s.params.time_constant_ms > 0.0 {
            (dt_ms / s.params.time_constant_ms).min(1.0)
        }
        else {
            1.0
        };
        let left_dem = s.left_cmd as f64 / MAX_MOTOR_CMD as f64 * max_speed;
        let right_dem = s.right_cmd as f64 / MAX_MOTOR_CMD as f64 * max_speed;
        s.left_speed_ips += (left_dem - s.left_speed_ips) * alpha;
        s.right_speed_ips += (right_dem - s.right_speed_ips) * alpha;

        // Differential drive kinematics, heading clockwise from +y
        let dt_s = dt_ms / 1000.0;
        let speed = 0.5 * (s.left_speed_ips + s.right_speed_ips);
        let rate_rads = (s.left_speed_ips - s.right_speed_ips) / s.params.track_width_in;

        let mid_theta = s.pose.theta.to_radians() + 0.5 * rate_rads * dt_s;
        s.pose.x += speed * mid_theta.sin() * dt_s;
        s.pose.y += speed * mid_theta.cos() * dt_s;
        s.pose.theta = wrap_deg(s.pose.theta + rate_rads.to_degrees() * dt_s);

        trace!("Sim pose: {:?}", s.pose);
    }
}

impl MotorGroup for SimMotorGroup {
    fn move_voltage(&mut self, voltage: i32) {
        let voltage = voltage.max(-MAX_MOTOR_CMD).min(MAX_MOTOR_CMD);
        let mut s = self.plant.inner.borrow_mut();
        match self.side {
            Side::Left => s.left_cmd = voltage,
            Side::Right => s.right_cmd = voltage,
        }
    }
}

impl Inertial for SimInertial {
    fn reset(&mut self) {
        let mut s = self.plant.inner.borrow_mut();
        s.imu_calib_remaining_ms = s.params.imu_calibration_ms;
    }

    fn is_calibrating(&self) -> bool {
        self.plant.inner.borrow().imu_calib_remaining_ms > 0.0
    }
}

impl SimChassis {
    pub fn is_calibrated(&self) -> bool {
        self.calibrated
    }
}

impl Chassis for SimChassis {
    fn calibrate(&mut self) {
        self.calibrated = true;
    }

    fn set_pose(&mut self, pose: Pose) {
        self.plant.inner.borrow_mut().pose = pose;
    }

    fn get_pose(&self) -> Pose {
        self.plant.pose()
    }
}
