//! Integral accumulation with anti-windup

use super::ControllerState;

/// Accumulate `error * dt` into the state's integral.
///
/// Outside of `integral_band` the integral is cleared instead, so a large
/// error far from the target never builds up a saturated integral term.
pub fn accumulate(
    state: &mut ControllerState,
    error: f64,
    dt: f64,
    integral_band: f64
) -> f64 {
    if error.abs() > integral_band {
        state.integral = 0.0;
    }
    else {
        state.integral += error * dt;
    }

    state.integral
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_accumulates_inside_band() {
        let mut state = ControllerState::default();

        assert_eq!(accumulate(&mut state, 2.0, 10.0, 3.0), 20.0);
        assert_eq!(accumulate(&mut state, -1.0, 10.0, 3.0), 10.0);
        assert_eq!(accumulate(&mut state, 3.0, 10.0, 3.0), 40.0);
    }

    #[test]
    fn test_clears_outside_band() {
        let mut state = ControllerState::default();
        state.integral = 1234.0;

        assert_eq!(accumulate(&mut state, 3.5, 10.0, 3.0), 0.0);
        assert_eq!(state.integral, 0.0);
        assert_eq!(accumulate(&mut state, -50.0, 10.0, 3.0), 0.0);
    }
}
