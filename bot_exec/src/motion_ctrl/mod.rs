//! # Motion control module
//!
//! Drives the robot through single motions (drive a distance, turn to a
//! heading) using the closed-loop controllers in [`crate::pid`]. A motion
//! finishes when its controller settles, or is abandoned once its timeout
//! runs out, since a target the robot cannot reach would otherwise never
//! settle.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod motion;
mod params;
mod state;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

pub use motion::*;
pub use params::*;
pub use state::*;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Possible errors that can occur during MotionCtrl operation.
#[derive(Debug, thiserror::Error)]
pub enum MotionCtrlError {
    #[error("Could not load parameters: {0}")]
    ParamLoadError(util::params::LoadError),

    #[error("Invalid parameters: {0}")]
    InvalidParams(String),

    #[error("Could not set up the archive: {0}")]
    ArchiveError(util::archive::ArchiveError),

    #[error("Invalid motion command: {0:?}")]
    InvalidMotion(Motion),

    #[error("MotionCtrl has not been initialised")]
    NotInitialised,
}
