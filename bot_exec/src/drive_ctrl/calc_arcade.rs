//! Arcade mixing calculations

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use crate::chassis::MAX_MOTOR_CMD;
use super::{Params, OutputData, StatusReport};

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Zero an axis reading inside the deadband.
pub fn apply_deadband(value: i32, deadband: i32) -> i32 {
    if value.abs() <= deadband {
        0
    }
    else {
        value
    }
}

/// Mix forward and turn demands into left and right side voltages.
///
/// `left = forward + turn`, `right = forward - turn`, each clamped to the
/// motor range. Clamping is flagged in the report.
pub fn calc_arcade(
    forward: i32,
    turn: i32,
    params: &Params,
    report: &mut StatusReport
) -> OutputData {
    let forward = apply_deadband(forward, params.deadband);
    let turn = apply_deadband(turn, params.deadband);

    let (mut left, left_limited) = limit(forward + turn);
    let (mut right, right_limited) = limit(forward - turn);

    if params.invert_left {
        left = -left;
    }
    if params.invert_right {
        right = -right;
    }

    report.left_limited = left_limited;
    report.right_limited = right_limited;

    OutputData { left, right }
}

fn limit(cmd: i32) -> (i32, bool) {
    if cmd > MAX_MOTOR_CMD {
        (MAX_MOTOR_CMD, true)
    }
    else if cmd < -MAX_MOTOR_CMD {
        (-MAX_MOTOR_CMD, true)
    }
    else {
        (cmd, false)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_mixing() {
        let params = Params::default();
        let mut report = StatusReport::default();

        assert_eq!(calc_arcade(100, 0, &params, &mut report), OutputData { left: 100, right: 100 });
        assert_eq!(calc_arcade(0, 50, &params, &mut report), OutputData { left: 50, right: -50 });
        assert_eq!(calc_arcade(60, 20, &params, &mut report), OutputData { left: 80, right: 40 });
        assert!(!report.left_limited && !report.right_limited);
    }

    #[test]
    fn test_clamping_is_reported() {
        let params = Params::default();
        let mut report = StatusReport::default();

        let out = calc_arcade(127, 127, &params, &mut report);
        assert_eq!(out, OutputData { left: 127, right: 0 });
        assert!(report.left_limited);
        assert!(!report.right_limited);

        let out = calc_arcade(-127, 127, &params, &mut report);
        assert_eq!(out, OutputData { left: 0, right: -127 });
        assert!(report.right_limited);
    }

    #[test]
    fn test_deadband_and_inversion() {
        let params = Params {
            deadband: 5,
            invert_right: true,
            ..Params::default()
        };
        let mut report = StatusReport::default();

        assert_eq!(calc_arcade(4, -5, &params, &mut report), OutputData { left: 0, right: 0 });
        assert_eq!(calc_arcade(40, 3, &params, &mut report), OutputData { left: 40, right: -40 });
    }
}
