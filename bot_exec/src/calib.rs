//! # Calibration sequence
//!
//! One-shot sequence run before the robot is driven: calibrate the inertial
//! sensor, calibrate the chassis odometry and zero the pose.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use std::time::Duration;
use log::{debug, info};
use serde::Deserialize;

// Internal
use crate::chassis::{Chassis, Inertial, Pose};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for the calibration sequence.
#[derive(Debug, Clone, Deserialize)]
pub struct CalibParams {
    /// How often to check whether the inertial sensor has finished.
    ///
    /// Units: milliseconds
    pub poll_period_ms: u64,

    /// Give up on the inertial sensor after this long.
    ///
    /// Units: milliseconds
    pub imu_timeout_ms: u64,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum CalibError {
    #[error("The inertial sensor did not finish calibrating within {0} ms")]
    ImuTimeout(u64),

    #[error("Calibration poll period must be greater than zero")]
    InvalidPollPeriod,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for CalibParams {
    fn default() -> Self {
        Self {
            poll_period_ms: 10,
            imu_timeout_ms: 3000,
        }
    }
}

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Run the calibration sequence.
///
/// `wait` is called between polls of the inertial sensor and must block for
/// (or simulate) the given duration.
pub fn calibrate<W>(
    imu: &mut dyn Inertial,
    chassis: &mut dyn Chassis,
    params: &CalibParams,
    mut wait: W
) -> Result<(), CalibError>
where
    W: FnMut(Duration)
{
    if params.poll_period_ms == 0 {
        return Err(CalibError::InvalidPollPeriod);
    }

    info!("Calibrating inertial sensor");
    imu.reset();

    let mut waited_ms = 0;
    while imu.is_calibrating() {
        if waited_ms >= params.imu_timeout_ms {
            return Err(CalibError::ImuTimeout(params.imu_timeout_ms));
        }

        wait(Duration::from_millis(params.poll_period_ms));
        waited_ms += params.poll_period_ms;
    }
    debug!("Inertial sensor calibrated after {} ms", waited_ms);

    chassis.calibrate();
    chassis.set_pose(Pose::new(0.0, 0.0, 0.0));

    info!("Calibration complete, pose zeroed");

    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::sim::{SimParams, SimPlant};

    #[test]
    fn test_calibration_zeroes_pose() {
        let plant = SimPlant::new(SimParams::default());
        let mut imu = plant.inertial();
        let mut chassis = plant.chassis();
        chassis.set_pose(Pose::new(4.0, 5.0, 90.0));

        let mut polls = 0;
        calibrate(&mut imu, &mut chassis, &CalibParams::default(), |d| {
            polls += 1;
            plant.step(d.as_millis() as f64);
        }).unwrap();

        // 200 ms of calibration at 10 ms per poll
        assert_eq!(polls, 20);
        assert!(chassis.is_calibrated());
        assert_eq!(chassis.get_pose(), Pose::default());
    }

    #[test]
    fn test_stuck_imu_times_out() {
        struct StuckImu;
        impl Inertial for StuckImu {
            fn reset(&mut self) {}
            fn is_calibrating(&self) -> bool { true }
        }

        let plant = SimPlant::new(SimParams::default());
        let mut chassis = plant.chassis();
        let params = CalibParams { poll_period_ms: 10, imu_timeout_ms: 50 };

        let mut polls = 0;
        let res = calibrate(&mut StuckImu, &mut chassis, &params, |_| polls += 1);

        assert!(matches!(res, Err(CalibError::ImuTimeout(50))));
        assert_eq!(polls, 5);
        assert!(!chassis.is_calibrated());
    }
}
