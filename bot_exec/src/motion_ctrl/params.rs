//! Parameters structure for MotionCtrl

use serde::Deserialize;
use crate::pid::ControllerSettings;

/// Parameters for motion control.
#[derive(Debug, Clone, Deserialize)]
pub struct Params {
    /// Controller for distance travelled.
    ///
    /// Error units: inches
    pub linear: ControllerSettings,

    /// Controller for heading, also used to hold heading while driving.
    ///
    /// Error units: degrees
    pub angular: ControllerSettings,

    /// Largest side voltage motion control will command.
    pub max_cmd: i32,
}
