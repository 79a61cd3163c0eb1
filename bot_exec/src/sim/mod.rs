//! # Simulation module
//!
//! A simple differential drive plant so the executable and tests can run
//! off-robot. The simulated motor groups, inertial sensor and chassis are
//! cheap handles onto one shared plant, which is stepped once per cycle.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod gamepad;
mod plant;

// ---------------------------------------------------------------------------
// EXPORTS
// ---------------------------------------------------------------------------

pub use gamepad::*;
pub use plant::*;
