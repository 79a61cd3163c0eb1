//! Controller state

use serde::Serialize;

/// Mutable state of a single closed-loop controller.
///
/// Owned exclusively by one [`ClosedLoopController`](super::ClosedLoopController)
/// and cleared whenever a new target is armed.
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize)]
pub struct ControllerState {
    /// Accumulated error, in error units times milliseconds.
    pub integral: f64,

    /// Error on the previous tick.
    pub previous_error: f64,

    /// Output produced on the previous tick.
    pub previous_output: f64,

    /// Time continuously spent within the small error band.
    ///
    /// Units: milliseconds
    pub small_timer_ms: f64,

    /// Time continuously spent within the large error band.
    ///
    /// Units: milliseconds
    pub large_timer_ms: f64,

    /// True once the current motion has settled.
    pub settled: bool,
}
