//! Drive control module
//!
//! Converts the operator's gamepad axes into left and right drivetrain
//! voltages using an arcade scheme: one stick axis drives forward and back,
//! another turns.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod calc_arcade;
mod params;
mod state;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// Internal
pub use calc_arcade::*;
pub use params::*;
pub use state::*;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Possible errors that can occur during DriveCtrl operation.
#[derive(Debug, thiserror::Error)]
pub enum DriveCtrlError {
    #[error("Could not load parameters: {0}")]
    ParamLoadError(util::params::LoadError),

    #[error("Invalid parameters: {0}")]
    InvalidParams(String),

    #[error("Could not set up the archive: {0}")]
    ArchiveError(util::archive::ArchiveError),

    #[error("DriveCtrl has not been initialised")]
    NotInitialised,
}
