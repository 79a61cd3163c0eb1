//! Scripted gamepad

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use std::cell::Cell;
use std::rc::Rc;
use serde::Deserialize;

use crate::chassis::{Axis, Gamepad, MAX_ANALOG};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A snapshot of the gamepad's analog axes, as recorded in drive scripts.
///
/// Axes missing from a script entry read as zero.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct GamepadState {
    pub left_x: i32,
    pub left_y: i32,
    pub right_x: i32,
    pub right_y: i32,
}

/// A gamepad whose axes are set by the executable, for example from a
/// drive script. Clones share the same axes.
#[derive(Debug, Default, Clone)]
pub struct ScriptedGamepad {
    state: Rc<Cell<GamepadState>>,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl ScriptedGamepad {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the current axes.
    pub fn set(&self, state: GamepadState) {
        self.state.set(state);
    }
}

impl Gamepad for ScriptedGamepad {
    fn get_analog(&self, axis: Axis) -> i32 {
        let s = self.state.get();
        let raw = match axis {
            Axis::LeftX => s.left_x,
            Axis::LeftY => s.left_y,
            Axis::RightX => s.right_x,
            Axis::RightY => s.right_y,
        };

        raw.max(-MAX_ANALOG).min(MAX_ANALOG)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_clones_share_axes() {
        let pad = ScriptedGamepad::new();
        let reader = pad.clone();

        pad.set(GamepadState { left_y: 90, right_x: -300, ..Default::default() });
        assert_eq!(reader.get_analog(Axis::LeftY), 90);
        assert_eq!(reader.get_analog(Axis::RightX), -127);
        assert_eq!(reader.get_analog(Axis::LeftX), 0);
    }

    #[test]
    fn test_partial_script_entry() {
        let s: GamepadState = serde_json::from_str("{\"left_y\": 50}").unwrap();
        assert_eq!(s, GamepadState { left_y: 50, ..Default::default() });
    }
}
