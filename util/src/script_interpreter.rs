//! # Drive script interpreter module
//!
//! This module provides an interpreter for timestamped scripts, allowing
//! commands (for example recorded gamepad states) to be replayed at the time
//! they were scripted for.
//!
//! A script is a series of `<time_s>: <json payload>;` entries, for example:
//!
//! ```text
//! 0.0: {"left_y": 0, "right_x": 0};
//! 0.5: {"left_y": 127, "right_x": 0};
//! ```

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::fs;
use regex::RegexBuilder;
use serde::de::DeserializeOwned;
use thiserror::Error;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A command which is scripted to occur at a specific time.
struct Command<T> {
    /// The time the command is supposed to execute at
    exec_time_s: f64,

    /// The payload to run
    payload: T
}

/// A script interpreter.
///
/// After initialising with the path to the script to run use `.get_pending` to
/// acquire a list of commands that need executing.
pub struct ScriptInterpreter<T> {
    _script_path: Option<PathBuf>,
    cmds: VecDeque<Command<T>>
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("Could not find the script at {0}")]
    ScriptNotFound(String),

    #[error("Could not load the script: {0}")]
    ScriptLoadError(std::io::Error),

    #[error("The script is empty (or is so bad it can't be read)")]
    ScriptEmpty,

    #[error(
        "Script contains an invalid timestamp: {0}. \
        Should be a float (like 1.0)")]
    InvalidTimestamp(String),

    #[error("Script contains an invalid command at {0} s: {1}")]
    InvalidCommand(f64, serde_json::Error),

    #[error("Script timestamps must not decrease, found {1} s after {0} s")]
    OutOfOrder(f64, f64)
}

/// The commands that are due for execution.
#[derive(Debug, PartialEq)]
pub enum Pending<T> {
    None,
    Some(Vec<T>),
    EndOfScript
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl<T> ScriptInterpreter<T>
where
    T: DeserializeOwned
{

    /// Create a new interpreter from the given script path.
    pub fn new<P: AsRef<Path>>(script_path: P) -> Result<Self, ScriptError> {

        // Get the path in a buffer
        let path = PathBuf::from(script_path.as_ref());
        
        // Check that the script file exists.
        if !path.exists() {
            return Err(
                ScriptError::ScriptNotFound(path.display().to_string()));
        }

        // Load the script into a string
        let script = match fs::read_to_string(&path) {
            Ok(s) => s,
            Err(e) => return Err(ScriptError::ScriptLoadError(e))
        };

        let mut si = Self::from_script_str(&script)?;
        si._script_path = Some(path);

        Ok(si)
    }

    /// Create a new interpreter from the contents of a script.
    pub fn from_script_str(script: &str) -> Result<Self, ScriptError> {

        // Empty queue of commands
        let mut cmd_queue: VecDeque<Command<T>> = VecDeque::new();

        // Go through the script executing __the magic regex__.
        let re = RegexBuilder::
            new(r"^\s*(\d+(\.\d+)?)\s*:\s*([^;]*);")
            .multi_line(true)
            .build()
            .expect("script regex is valid");

        for cap in re.captures_iter(script) {
            // Both groups are mandatory in the regex so always present
            let (time_str, payload_str) = match (cap.get(1), cap.get(3)) {
                (Some(t), Some(p)) => (t.as_str(), p.as_str()),
                _ => continue
            };

            // Parse the exec time
            let exec_time_s: f64 = match time_str.parse() {
                Ok(t) => t,
                Err(e) => return Err(
                    ScriptError::InvalidTimestamp(format!("{}", e)))
            };

            if let Some(last) = cmd_queue.back() {
                if exec_time_s < last.exec_time_s {
                    return Err(ScriptError::OutOfOrder(
                        last.exec_time_s, exec_time_s
                    ))
                }
            }

            // Parse the payload, scripts contain JSON only.
            let payload = match serde_json::from_str(payload_str) {
                Ok(c) => c,
                Err(e) => return Err(ScriptError::InvalidCommand(
                    exec_time_s, e
                ))
            };

            // Build command from the match
            cmd_queue.push_back(Command {
                exec_time_s,
                payload
            });
        }

        if cmd_queue.is_empty() {
            return Err(ScriptError::ScriptEmpty)
        }

        Ok(ScriptInterpreter {
            _script_path: None,
            cmds: cmd_queue
        })
    }

    /// Return the commands whose execution time is at or before
    /// `current_time_s`.
    pub fn get_pending(&mut self, current_time_s: f64) -> Pending<T> {

        // If the queue is empty the script is over and we return the end of
        // script variant
        if self.cmds.is_empty() {
            return Pending::EndOfScript
        }

        let mut cmd_vec: Vec<T> = vec![];

        // Pop items from the queue while the head's exec time has passed.
        while let Some(c) = self.cmds.front() {
            if c.exec_time_s > current_time_s {
                break;
            }
            if let Some(c) = self.cmds.pop_front() {
                cmd_vec.push(c.payload);
            }
        }

        // If the vector is longer than 0 return Some, otherwise None
        if !cmd_vec.is_empty() {
            Pending::Some(cmd_vec)
        }
        else {
            Pending::None
        }
    }

    /// Get the number of commands remaining in the script
    pub fn get_num_cmds(&self) -> usize {
        self.cmds.len()
    }

    /// Get the length of the script in seconds
    pub fn get_duration(&self) -> f64 {
        match self.cmds.back() {
            Some(c) => c.exec_time_s,
            None => 0f64
        }
    }
}
