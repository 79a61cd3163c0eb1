//! Dual-band settle detection
//!
//! Two dwell timers run side by side. The small band gives a quick exit
//! when the error is held tightly, the large band accepts a coarser error
//! after a longer wait (useful when friction stops the robot just short of
//! the target).

use super::{ControllerSettings, ControllerState};

/// Advance the dwell timers by `dt` and report whether either has expired.
///
/// A timer grows while `|error|` is within its band and is reset to zero as
/// soon as the error leaves it. A timeout of zero expires on the first tick
/// observed inside the band.
pub fn update(
    state: &mut ControllerState,
    settings: &ControllerSettings,
    error: f64,
    dt: f64
) -> bool {
    let abs_error = error.abs();

    state.small_timer_ms = if abs_error <= settings.small_error() {
        state.small_timer_ms + dt
    }
    else {
        0.0
    };

    state.large_timer_ms = if abs_error <= settings.large_error() {
        state.large_timer_ms + dt
    }
    else {
        0.0
    };

    let small_expired = abs_error <= settings.small_error()
        && state.small_timer_ms >= settings.small_error_timeout_ms();
    let large_expired = abs_error <= settings.large_error()
        && state.large_timer_ms >= settings.large_error_timeout_ms();

    small_expired || large_expired
}
