//! # Closed-loop control module
//!
//! Bounded PID-style controllers used to drive the robot to a target
//! distance or heading. A controller is composed of three pieces:
//!
//! - [`slew`] bounds how quickly the commanded output may change,
//! - [`integral`] accumulates error only close to the target,
//! - [`settle`] decides when the target has been held for long enough.
//!
//! All times in this module are in milliseconds.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod controller;
pub mod integral;
mod settings;
pub mod settle;
pub mod slew;
mod state;

// ---------------------------------------------------------------------------
// EXPORTS
// ---------------------------------------------------------------------------

pub use controller::*;
pub use settings::*;
pub use state::*;
