//! Motion control module state

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::{debug, info, trace, warn};
use serde::Serialize;

// Internal
use super::{Motion, MotionCtrlError, MotionOutcome, Params};
use crate::chassis::{Pose, MAX_MOTOR_CMD};
use crate::pid::{ClosedLoopController, ErrorKind};
use util::{
    params,
    module::State,
    archive::{Archived, Archiver, ArchiveError},
    session::Session};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Motion control module state
#[derive(Default)]
pub struct MotionCtrl {
    params: Option<Params>,

    /// Executing mode
    mode: MotionMode,

    /// Controllers, built once the parameters are known
    controllers: Option<Controllers>,

    /// Pose at the start of the current motion
    start_pose: Pose,

    /// Time spent on the current motion
    ///
    /// Units: milliseconds
    elapsed_ms: f64,

    /// Timeout of the current motion
    ///
    /// Units: milliseconds
    timeout_ms: f64,

    output: OutputData,
    report: StatusReport,
    arch: Archiver,
}

#[derive(Debug, Clone)]
struct Controllers {
    linear: ClosedLoopController,
    angular: ClosedLoopController,
}

/// Input data to motion control.
#[derive(Debug, Default, Clone, Copy)]
pub struct InputData {
    /// A new motion to start, abandoning any current one, or `None` to carry
    /// on.
    pub cmd: Option<Motion>,

    /// The current pose from the chassis.
    pub pose: Pose,

    /// Time since the previous cycle.
    ///
    /// Units: milliseconds
    pub dt_ms: f64,
}

/// Side voltages to be sent to the drivetrain motor groups.
#[derive(Clone, Copy, Default, Serialize, Debug, PartialEq, Eq)]
pub struct OutputData {
    pub left: i32,
    pub right: i32,
}

/// Status report for MotionCtrl processing.
#[derive(Clone, Copy, Default, Serialize, Debug, PartialEq)]
pub struct StatusReport {
    /// Mode after this cycle's processing
    pub mode: MotionMode,

    /// Error of the controller driving the current motion
    pub error: f64,

    /// Set on the cycle a motion ends
    pub outcome: Option<MotionOutcome>,

    /// True if a side command had to be limited to `max_cmd`
    pub output_limited: bool,
}

/// The possible modes of execution of MotionCtrl.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MotionMode {
    Idle,
    Driving,
    Turning,
}

/// One archived MotionCtrl cycle.
#[derive(Serialize)]
struct ArchRecord {
    mode: MotionMode,
    elapsed_ms: f64,
    error: f64,
    lin_target: f64,
    ang_target: f64,
    lin_output: f64,
    ang_output: f64,
    left: i32,
    right: i32,
    settled: bool,
    timed_out: bool,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for MotionMode {
    fn default() -> Self {
        MotionMode::Idle
    }
}

impl State for MotionCtrl {
    type InitData = &'static str;
    type InitError = MotionCtrlError;

    type InputData = InputData;
    type OutputData = OutputData;
    type StatusReport = StatusReport;
    type ProcError = MotionCtrlError;

    /// Initialise the MotionCtrl module.
    ///
    /// Expected init data is the path to the parameter file
    fn init(&mut self, init_data: Self::InitData, session: &Session)
        -> Result<(), Self::InitError>
    {
        let params: Params = params::load(init_data)
            .map_err(MotionCtrlError::ParamLoadError)?;

        self.arch = Archiver::from_path(session, "motion_ctrl/status.csv")
            .map_err(MotionCtrlError::ArchiveError)?;

        self.set_params(params)
    }

    /// Perform cyclic processing of motion control.
    fn proc(&mut self, input_data: &Self::InputData)
        -> Result<(Self::OutputData, Self::StatusReport), Self::ProcError>
    {
        if self.controllers.is_none() {
            return Err(MotionCtrlError::NotInitialised);
        }

        self.report = StatusReport::default();

        if let Some(cmd) = input_data.cmd {
            self.start(cmd, input_data.pose)?;
        }

        let output = match self.mode {
            MotionMode::Idle => OutputData::default(),
            MotionMode::Driving | MotionMode::Turning => self.step(input_data)?,
        };

        self.output = output;
        self.report.mode = self.mode;

        trace!(
            "MotionCtrl {:?}: error {:.3}, output ({}, {})",
            self.mode, self.report.error, output.left, output.right
        );

        Ok((output, self.report))
    }
}

impl Archived for MotionCtrl {
    fn write(&mut self) -> Result<(), ArchiveError> {
        let (lin_target, ang_target, lin_output, ang_output) = match self.controllers {
            Some(ref c) => (
                c.linear.target(),
                c.angular.target(),
                c.linear.state().previous_output,
                c.angular.state().previous_output,
            ),
            None => (0.0, 0.0, 0.0, 0.0)
        };

        self.arch.serialise(ArchRecord {
            mode: self.report.mode,
            elapsed_ms: self.elapsed_ms,
            error: self.report.error,
            lin_target,
            ang_target,
            lin_output,
            ang_output,
            left: self.output.left,
            right: self.output.right,
            settled: self.report.outcome == Some(MotionOutcome::Settled),
            timed_out: self.report.outcome == Some(MotionOutcome::TimedOut),
        })
    }
}

impl MotionCtrl {

    /// Create a motion controller from already loaded parameters, without an
    /// archive.
    pub fn new(params: Params) -> Result<Self, MotionCtrlError> {
        let mut mc = Self::default();
        mc.set_params(params)?;
        Ok(mc)
    }

    /// Abandon the current motion, if any.
    pub fn abort(&mut self) {
        if self.mode != MotionMode::Idle {
            warn!("Aborting {:?} motion after {:.0} ms", self.mode, self.elapsed_ms);
        }
        self.mode = MotionMode::Idle;
        self.output = OutputData::default();
    }

    pub fn mode(&self) -> MotionMode {
        self.mode
    }

    pub fn is_idle(&self) -> bool {
        self.mode == MotionMode::Idle
    }

    fn set_params(&mut self, params: Params) -> Result<(), MotionCtrlError> {
        if params.max_cmd <= 0 || params.max_cmd > MAX_MOTOR_CMD {
            return Err(MotionCtrlError::InvalidParams(format!(
                "max_cmd must be in (0, {}], found {}",
                MAX_MOTOR_CMD, params.max_cmd
            )));
        }

        self.controllers = Some(Controllers {
            linear: ClosedLoopController::new(params.linear, ErrorKind::Linear),
            angular: ClosedLoopController::new(params.angular, ErrorKind::Angular),
        });
        self.params = Some(params);

        Ok(())
    }

    /// Arm the controllers for a new motion.
    fn start(&mut self, cmd: Motion, pose: Pose) -> Result<(), MotionCtrlError> {
        if !cmd.is_valid() {
            return Err(MotionCtrlError::InvalidMotion(cmd));
        }

        let ctrls = self.controllers.as_mut().ok_or(MotionCtrlError::NotInitialised)?;

        if self.mode != MotionMode::Idle {
            warn!("Replacing unfinished {:?} motion with {:?}", self.mode, cmd);
        }

        self.mode = match cmd {
            Motion::Drive { distance_in, .. } => {
                ctrls.linear.set_target(distance_in);
                ctrls.angular.set_target(pose.theta);
                MotionMode::Driving
            },
            Motion::TurnTo { heading_deg, .. } => {
                ctrls.angular.set_target(heading_deg);
                MotionMode::Turning
            }
        };

        self.start_pose = pose;
        self.elapsed_ms = 0.0;
        self.timeout_ms = cmd.timeout_ms();

        info!("Starting motion {:?} from {:?}", cmd, pose);

        Ok(())
    }

    /// Run the controllers for the current motion.
    fn step(&mut self, input: &InputData) -> Result<OutputData, MotionCtrlError> {
        let max_cmd = self.params.as_ref().ok_or(MotionCtrlError::NotInitialised)?.max_cmd;
        let ctrls = self.controllers.as_mut().ok_or(MotionCtrlError::NotInitialised)?;

        if input.dt_ms > 0.0 {
            self.elapsed_ms += input.dt_ms;
        }

        let (forward, turn, settled) = match self.mode {
            MotionMode::Driving => {
                let along = input.pose.dist_along(&self.start_pose);
                self.report.error = ctrls.linear.error(along);
                let forward = ctrls.linear.compute(along, input.dt_ms);
                let turn = ctrls.angular.compute(input.pose.theta, input.dt_ms);
                (forward, turn, ctrls.linear.settled())
            },
            MotionMode::Turning => {
                self.report.error = ctrls.angular.error(input.pose.theta);
                let turn = ctrls.angular.compute(input.pose.theta, input.dt_ms);
                (0.0, turn, ctrls.angular.settled())
            },
            MotionMode::Idle => return Ok(OutputData::default())
        };

        if settled {
            self.finish(MotionOutcome::Settled);
            return Ok(OutputData::default());
        }

        if self.elapsed_ms >= self.timeout_ms {
            self.finish(MotionOutcome::TimedOut);
            return Ok(OutputData::default());
        }

        let (left, left_limited) = to_cmd(forward + turn, max_cmd);
        let (right, right_limited) = to_cmd(forward - turn, max_cmd);
        self.report.output_limited = left_limited || right_limited;

        Ok(OutputData { left, right })
    }

    fn finish(&mut self, outcome: MotionOutcome) {
        match outcome {
            MotionOutcome::Settled => info!(
                "{:?} motion settled after {:.0} ms (error {:.3})",
                self.mode, self.elapsed_ms, self.report.error
            ),
            MotionOutcome::TimedOut => warn!(
                "{:?} motion timed out after {:.0} ms (error {:.3})",
                self.mode, self.elapsed_ms, self.report.error
            ),
        }

        self.report.outcome = Some(outcome);
        self.mode = MotionMode::Idle;
        debug!("MotionCtrl idle");
    }
}

/// Round and limit a controller output to a side voltage.
fn to_cmd(value: f64, max_cmd: i32) -> (i32, bool) {
    let max = max_cmd as f64;
    if value > max {
        (max_cmd, true)
    }
    else if value < -max {
        (-max_cmd, true)
    }
    else {
        (value.round() as i32, false)
    }
}
