//! Motion commands

use serde::{Deserialize, Serialize};

/// A single motion for the robot to perform.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Motion {
    /// Drive along the current heading. Negative distances drive backwards.
    Drive {
        /// Units: inches
        distance_in: f64,

        /// Units: milliseconds
        timeout_ms: f64,
    },

    /// Turn on the spot to face an absolute heading.
    TurnTo {
        /// Units: degrees
        heading_deg: f64,

        /// Units: milliseconds
        timeout_ms: f64,
    },
}

/// How a motion ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MotionOutcome {
    /// The controller settled on the target.
    Settled,

    /// The timeout ran out before the controller settled.
    TimedOut,
}

impl Motion {
    pub fn timeout_ms(&self) -> f64 {
        match self {
            Motion::Drive { timeout_ms, .. } => *timeout_ms,
            Motion::TurnTo { timeout_ms, .. } => *timeout_ms,
        }
    }

    /// Determine if the motion is valid (finite target, positive timeout).
    pub fn is_valid(&self) -> bool {
        let target = match self {
            Motion::Drive { distance_in, .. } => *distance_in,
            Motion::TurnTo { heading_deg, .. } => *heading_deg,
        };

        target.is_finite() && self.timeout_ms().is_finite() && self.timeout_ms() > 0.0
    }
}
