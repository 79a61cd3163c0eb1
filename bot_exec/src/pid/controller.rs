//! Closed-loop controller

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::{debug, trace, warn};
use serde::Serialize;

// Internal
use super::{integral, settle, slew, ControllerSettings, ControllerState};
use util::maths::get_ang_dist_deg;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// The kind of quantity being controlled, which decides how error is found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ErrorKind {
    /// Plain difference between target and current value.
    Linear,

    /// Shortest signed angle between target and current value, in degrees
    /// within (-180, 180].
    Angular,
}

/// Execution mode of a controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ControllerMode {
    /// No target has been armed yet.
    Idle,

    /// Driving towards the armed target.
    Running,

    /// The current target has been reached. Output is still computed so the
    /// robot holds position, but the motion is complete.
    Settled,
}

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A PID controller with anti-windup, slew limiting and settle detection.
///
/// The controller is stepped from a single control loop through `&mut self`
/// and never blocks, so it can run inside a fixed period cycle.
#[derive(Debug, Clone)]
pub struct ClosedLoopController {
    settings: ControllerSettings,
    kind: ErrorKind,
    target: f64,
    mode: ControllerMode,
    state: ControllerState,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl ClosedLoopController {

    /// Create a new idle controller.
    pub fn new(settings: ControllerSettings, kind: ErrorKind) -> Self {
        Self {
            settings,
            kind,
            target: 0.0,
            mode: ControllerMode::Idle,
            state: ControllerState::default(),
        }
    }

    /// Arm a new target, clearing all accumulated state.
    pub fn set_target(&mut self, target: f64) {
        debug!("Controller ({:?}) target set to {}", self.kind, target);
        self.target = target;
        self.reset();
    }

    /// Restart the current motion, clearing the integral, dwell timers and
    /// previous error/output. Calling this twice is the same as calling it
    /// once.
    pub fn reset(&mut self) {
        self.state = ControllerState::default();
        self.mode = ControllerMode::Running;
    }

    /// Compute the output for this tick.
    ///
    /// `dt_ms` is the time since the previous tick. A non-positive (or
    /// non-finite) interval carries no information, so the previous output
    /// is returned and nothing is changed. The same applies to a non-finite
    /// reading and to an idle controller.
    pub fn compute(&mut self, current: f64, dt_ms: f64) -> f64 {
        if !(dt_ms > 0.0) || !dt_ms.is_finite() {
            trace!("Controller ({:?}) skipping tick with dt = {}", self.kind, dt_ms);
            return self.state.previous_output;
        }

        if self.mode == ControllerMode::Idle {
            return self.state.previous_output;
        }

        let error = self.error(current);

        if !error.is_finite() {
            warn!(
                "Controller ({:?}) ignoring non-finite reading {} (target {})",
                self.kind, current, self.target
            );
            return self.state.previous_output;
        }

        let integral = integral::accumulate(
            &mut self.state, error, dt_ms, self.settings.integral_band()
        );

        let derivative = (error - self.state.previous_error) / dt_ms;

        let raw = self.settings.k_p() * error
            + self.settings.k_i() * integral
            + self.settings.k_d() * derivative;

        let output = slew::limit(
            raw,
            self.state.previous_output,
            self.settings.max_slew() * dt_ms
        );

        if settle::update(&mut self.state, &self.settings, error, dt_ms)
            && self.mode == ControllerMode::Running
        {
            debug!(
                "Controller ({:?}) settled at error {:.3} (target {})",
                self.kind, error, self.target
            );
            self.state.settled = true;
            self.mode = ControllerMode::Settled;
        }

        trace!(
            "Controller ({:?}): err = {:.3}, int = {:.3}, der = {:.3}, raw = {:.3}, out = {:.3}",
            self.kind, error, integral, derivative, raw, output
        );

        self.state.previous_error = error;
        self.state.previous_output = output;

        output
    }

    /// Error between the target and the given value.
    pub fn error(&self, current: f64) -> f64 {
        match self.kind {
            ErrorKind::Linear => self.target - current,
            ErrorKind::Angular => get_ang_dist_deg(self.target, current),
        }
    }

    /// True once the current motion has settled.
    pub fn settled(&self) -> bool {
        self.state.settled
    }

    pub fn mode(&self) -> ControllerMode {
        self.mode
    }

    pub fn target(&self) -> f64 {
        self.target
    }

    pub fn state(&self) -> &ControllerState {
        &self.state
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use super::super::{settings::test::competition_params, ControllerParams};
    use std::convert::TryFrom;

    fn controller(params: ControllerParams, kind: ErrorKind) -> ClosedLoopController {
        ClosedLoopController::new(ControllerSettings::try_from(params).unwrap(), kind)
    }

    /// Gains which make the output equal to the error, no slew.
    fn unity_params() -> ControllerParams {
        ControllerParams {
            k_p: 1.0,
            k_i: 0.0,
            k_d: 0.0,
            max_slew: 0.0,
            ..competition_params()
        }
    }

    #[test]
    fn test_idle_until_armed() {
        let mut c = controller(unity_params(), ErrorKind::Linear);
        assert_eq!(c.mode(), ControllerMode::Idle);
        assert_eq!(c.compute(5.0, 10.0), 0.0);
        assert_eq!(*c.state(), ControllerState::default());

        c.set_target(10.0);
        assert_eq!(c.mode(), ControllerMode::Running);
        assert_eq!(c.compute(4.0, 10.0), 6.0);
    }

    #[test]
    fn test_non_positive_dt_is_noop() {
        let mut c = controller(competition_params(), ErrorKind::Linear);
        c.set_target(10.0);
        c.compute(0.0, 20.0);
        let out = c.compute(2.0, 20.0);

        let state = *c.state();
        let mode = c.mode();

        for dt in [0.0, -20.0, f64::NAN].iter() {
            assert_eq!(c.compute(9.0, *dt), out);
            assert_eq!(*c.state(), state);
            assert_eq!(c.mode(), mode);
        }
    }

    #[test]
    fn test_non_finite_reading_is_noop() {
        let mut c = controller(competition_params(), ErrorKind::Linear);
        c.set_target(1.0);
        let out = c.compute(0.0, 20.0);
        let state = *c.state();

        for bad in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY].iter() {
            assert_eq!(c.compute(*bad, 20.0), out);
            assert_eq!(*c.state(), state);
        }

        // Good readings afterwards carry on from the last good tick
        let mut last = out;
        for _ in 0..50 {
            last = c.compute(1.0, 20.0);
        }
        assert!(last.is_finite());
        assert!(c.state().integral.is_finite());
        assert!(c.settled());

        // Angular readings are guarded the same way
        let mut c = controller(competition_params(), ErrorKind::Angular);
        c.set_target(90.0);
        assert_eq!(c.compute(f64::NAN, 20.0), 0.0);
        assert_eq!(*c.state(), ControllerState::default());
    }

    #[test]
    fn test_integral_zero_outside_band() {
        let mut c = controller(ControllerParams {
            k_p: 0.0,
            k_i: 1.0,
            k_d: 0.0,
            max_slew: 0.0,
            ..competition_params()
        }, ErrorKind::Linear);
        c.set_target(0.0);

        // Error of 2 is inside the band of 3 so accumulates
        c.compute(-2.0, 10.0);
        c.compute(-2.0, 10.0);
        assert_eq!(c.state().integral, 40.0);

        // Error of 5 is outside, so the integral term vanishes entirely
        assert_eq!(c.compute(-5.0, 10.0), 0.0);
        assert_eq!(c.state().integral, 0.0);
    }

    #[test]
    fn test_settles_in_small_band() {
        let mut c = controller(unity_params(), ErrorKind::Linear);
        c.set_target(0.0);

        for i in 0..10 {
            assert!(!c.settled(), "settled early on tick {}", i);
            c.compute(0.5, 10.0);
        }
        assert!(c.settled());
        assert_eq!(c.mode(), ControllerMode::Settled);
    }

    #[test]
    fn test_settles_in_large_band_only_after_dwell() {
        let mut c = controller(unity_params(), ErrorKind::Linear);
        c.set_target(0.0);

        for _ in 0..49 {
            c.compute(-2.0, 10.0);
            assert!(!c.settled());
        }
        c.compute(-2.0, 10.0);
        assert!(c.settled());
    }

    #[test]
    fn test_settled_is_latched_until_rearmed() {
        let mut c = controller(unity_params(), ErrorKind::Linear);
        c.set_target(0.0);
        for _ in 0..10 {
            c.compute(0.0, 10.0);
        }
        assert!(c.settled());

        // Drifting away does not un-settle the motion
        c.compute(50.0, 10.0);
        assert!(c.settled());

        c.set_target(100.0);
        assert!(!c.settled());
        assert_eq!(c.mode(), ControllerMode::Running);
    }

    #[test]
    fn test_slew_bounds_output_change() {
        let mut c = controller(ControllerParams {
            k_p: 1000.0,
            ..competition_params()
        }, ErrorKind::Linear);
        c.set_target(100.0);

        let dt = 20.0;
        let max_delta = 5.0 * dt;
        let mut prev = 0.0;

        for _ in 0..20 {
            let out = c.compute(0.0, dt);
            assert!((out - prev).abs() <= max_delta + 1e-9);
            prev = out;
        }
        assert_eq!(prev, 20.0 * max_delta);
    }

    #[test]
    fn test_reset_is_idempotent() {
        let mut c = controller(competition_params(), ErrorKind::Linear);
        c.set_target(10.0);
        for i in 0..5 {
            c.compute(i as f64, 20.0);
        }

        c.reset();
        let once = (*c.state(), c.mode(), c.target());
        c.reset();
        let twice = (*c.state(), c.mode(), c.target());

        assert_eq!(once, twice);
        assert_eq!(once.0, ControllerState::default());
        assert_eq!(once.1, ControllerMode::Running);
    }

    #[test]
    fn test_angular_error_takes_shortest_path() {
        let mut c = controller(unity_params(), ErrorKind::Angular);
        c.set_target(179.0);

        // -179 to 179 is 2 degrees the negative way round, never 358
        assert_eq!(c.error(-179.0), -2.0);
        assert_eq!(c.compute(-179.0, 10.0), -2.0);

        c.set_target(-179.0);
        assert_eq!(c.error(179.0), 2.0);
    }

    #[test]
    fn test_step_response_settles() {
        let mut c = controller(competition_params(), ErrorKind::Linear);
        c.set_target(10.0);

        // Integrating plant, position moves by gain * dt * output
        let dt = 20.0;
        let plant_gain = 0.0025;
        let mut position = 0.0;
        let mut prev_out = 0.0;
        let mut ticks = 0;

        while !c.settled() && ticks < 100 {
            let out = c.compute(position, dt);
            assert!((out - prev_out).abs() <= 5.0 * dt + 1e-9);

            if ticks == 0 {
                // Raw output is 101.5, clipped by the slew limit
                assert_eq!(out, 100.0);
            }

            position += plant_gain * dt * out;
            prev_out = out;
            ticks += 1;
        }

        assert!(c.settled(), "did not settle after {} ticks", ticks);
        assert!((10.0 - position).abs() <= 1.0);
        // Must dwell in the small band for 100 ms, i.e. 5 ticks
        assert!(ticks >= 5);
        assert!(c.state().small_timer_ms >= 100.0);
    }
}
