//! Implementations for the DriveCtrl state structure

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::{info, trace, warn};
use serde::Serialize;

// Internal
use super::{calc_arcade, DriveCtrlError, Params};
use crate::chassis::Gamepad;
use util::{
    params,
    module::State,
    archive::{Archived, Archiver, ArchiveError},
    session::Session};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Drive control module state
#[derive(Default)]
pub struct DriveCtrl {
    pub(crate) params: Option<Params>,

    input: InputData,
    output: OutputData,
    report: StatusReport,
    arch: Archiver,
}

/// Input data to drive control: the gamepad axes assigned to driving.
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
pub struct InputData {
    /// Forward demand, `[-127, 127]`.
    pub forward: i32,

    /// Turn demand, `[-127, 127]`.
    pub turn: i32,
}

/// Side voltages to be sent to the drivetrain motor groups.
#[derive(Clone, Copy, Default, Serialize, Debug, PartialEq, Eq)]
pub struct OutputData {
    pub left: i32,
    pub right: i32,
}

/// Status report for DriveCtrl processing.
#[derive(Clone, Copy, Default, Serialize, Debug, PartialEq, Eq)]
pub struct StatusReport {
    pub left_limited: bool,
    pub right_limited: bool,
}

/// One archived DriveCtrl cycle.
#[derive(Serialize)]
struct ArchRecord {
    forward: i32,
    turn: i32,
    left: i32,
    right: i32,
    left_limited: bool,
    right_limited: bool,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl State for DriveCtrl {
    type InitData = &'static str;
    type InitError = DriveCtrlError;

    type InputData = InputData;
    type OutputData = OutputData;
    type StatusReport = StatusReport;
    type ProcError = DriveCtrlError;

    /// Initialise the DriveCtrl module.
    ///
    /// Expected init data is the path to the parameter file
    fn init(&mut self, init_data: Self::InitData, session: &Session)
        -> Result<(), Self::InitError>
    {
        let params: Params = params::load(init_data)
            .map_err(DriveCtrlError::ParamLoadError)?;

        self.arch = Archiver::from_path(session, "drive_ctrl/output.csv")
            .map_err(DriveCtrlError::ArchiveError)?;

        self.set_params(params)
    }

    /// Perform cyclic processing of drive control.
    fn proc(&mut self, input_data: &Self::InputData)
        -> Result<(Self::OutputData, Self::StatusReport), Self::ProcError>
    {
        let params = self.params.as_ref().ok_or(DriveCtrlError::NotInitialised)?;

        // Clear the status report
        let mut report = StatusReport::default();

        let output = calc_arcade(input_data.forward, input_data.turn, params, &mut report);

        if report.left_limited || report.right_limited {
            trace!("DriveCtrl output limited: {:?}", report);
        }

        trace!("DriveCtrl output: left {}, right {}", output.left, output.right);

        self.input = *input_data;
        self.output = output;
        self.report = report;

        Ok((output, report))
    }
}

impl Archived for DriveCtrl {
    fn write(&mut self) -> Result<(), ArchiveError> {
        self.arch.serialise(ArchRecord {
            forward: self.input.forward,
            turn: self.input.turn,
            left: self.output.left,
            right: self.output.right,
            left_limited: self.report.left_limited,
            right_limited: self.report.right_limited,
        })
    }
}

impl DriveCtrl {

    /// Create a drive controller from already loaded parameters, without an
    /// archive.
    pub fn new(params: Params) -> Result<Self, DriveCtrlError> {
        let mut dc = Self::default();
        dc.set_params(params)?;
        Ok(dc)
    }

    /// Read the driving axes from the gamepad.
    pub fn read_input(&self, gamepad: &dyn Gamepad) -> Result<InputData, DriveCtrlError> {
        let params = self.params.as_ref().ok_or(DriveCtrlError::NotInitialised)?;

        Ok(InputData {
            forward: gamepad.get_analog(params.forward_axis),
            turn: gamepad.get_analog(params.turn_axis),
        })
    }

    /// True if an archive file has been set up for this module.
    pub fn is_archiving(&self) -> bool {
        self.arch.is_initialised()
    }

    fn set_params(&mut self, params: Params) -> Result<(), DriveCtrlError> {
        if let Err(e) = params.validate() {
            warn!("Rejected DriveCtrl parameters: {}", e);
            return Err(e);
        }

        info!(
            "DriveCtrl using {:?} for forward and {:?} for turn (deadband {})",
            params.forward_axis, params.turn_axis, params.deadband
        );
        self.params = Some(params);

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::chassis::Axis;
    use crate::sim::{GamepadState, ScriptedGamepad};

    #[test]
    fn test_proc_before_init() {
        let mut dc = DriveCtrl::default();
        assert!(matches!(
            dc.proc(&InputData::default()),
            Err(DriveCtrlError::NotInitialised)
        ));
    }

    #[test]
    fn test_reads_assigned_axes() {
        let dc = DriveCtrl::new(Params {
            forward_axis: Axis::RightY,
            turn_axis: Axis::LeftX,
            ..Params::default()
        }).unwrap();

        let pad = ScriptedGamepad::new();
        pad.set(GamepadState { left_x: -30, left_y: 99, right_x: 99, right_y: 70 });

        assert_eq!(dc.read_input(&pad).unwrap(), InputData { forward: 70, turn: -30 });
    }

    #[test]
    fn test_proc_mixes_input() {
        let mut dc = DriveCtrl::new(Params::default()).unwrap();
        let (out, report) = dc.proc(&InputData { forward: 100, turn: 50 }).unwrap();

        assert_eq!(out, OutputData { left: 127, right: 50 });
        assert!(report.left_limited);
        assert!(!dc.is_archiving());
    }

    #[test]
    fn test_rejects_shared_axis() {
        assert!(matches!(
            DriveCtrl::new(Params {
                forward_axis: Axis::LeftY,
                turn_axis: Axis::LeftY,
                ..Params::default()
            }),
            Err(DriveCtrlError::InvalidParams(_))
        ));
    }
}
