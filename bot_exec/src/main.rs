//! Main robot executable entry point.
//!
//! # Architecture
//!
//! The general execution methodology consists of:
//!
//!     - Initialise the session, logging and parameters
//!     - Wire the hardware handles into the robot context
//!     - Run the calibration sequence
//!     - Optionally run the autonomous routine
//!     - Operator control loop, every cycle:
//!         - Gamepad input acquisition
//!         - Drive control processing
//!         - Drivetrain commanding
//!
//! Every loop is a single task woken on a fixed period, the only place it
//! waits is at the end of each cycle.
//!
//! Off-robot the hardware is provided by the simulated drivetrain and the
//! gamepad is replayed from a drive script.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::{debug, info, warn};
use std::path::PathBuf;
use std::thread;
use std::time::{Duration, Instant};
use color_eyre::{Report, eyre::{WrapErr, eyre}};
use structopt::StructOpt;

// Internal
use bot_lib::{
    drive_ctrl::DriveCtrl,
    motion_ctrl::MotionCtrl,
    params::BotExecParams,
    robot::{Hardware, Robot},
    sim::{GamepadState, ScriptedGamepad, Side, SimPlant},
};
use util::{
    archive::Archived,
    logger::{logger_init, LevelFilter},
    module::State,
    script_interpreter::{Pending, ScriptInterpreter},
    session::Session,
    time::std_duration_to_millis,
};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

#[derive(Debug, StructOpt)]
#[structopt(name = "bot_exec", about = "Drive the robot from a gamepad script")]
struct Opts {
    /// Drive script replayed as gamepad input during operator control
    #[structopt(parse(from_os_str))]
    script: Option<PathBuf>,

    /// Run the autonomous routine before operator control
    #[structopt(long)]
    auto: bool,

    /// Minimum log level (info, debug or trace)
    #[structopt(long, default_value = "debug")]
    log_level: LevelFilter,

    /// Length of operator control when no script is given
    #[structopt(long, default_value = "10")]
    teleop_s: f64,
}

/// Tracks the fixed period of the control loop.
struct CycleTimer {
    period: Duration,
    max_consec_overruns: u64,
    num_consec_overruns: u64,
    last_start: Option<Instant>,
    cycle_start: Instant,
}

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Executable main function, entry point.
fn main() -> Result<(), Report> {

    color_eyre::install()?;

    let opts = Opts::from_args();

    // ---- EARLY INITIALISATION ----

    // Initialise session
    let session = Session::new(
        "bot_exec",
        "sessions"
    ).wrap_err("Failed to create the session")?;

    // Initialise logger
    logger_init(opts.log_level, &session)
        .wrap_err("Failed to initialise logging")?;

    // Log information on this execution.
    info!("Drivebot Robot Executable\n");
    info!("Session directory: {:?}\n", session.session_root);
    debug!("CLI options: {:?}", opts);

    // ---- LOAD PARAMETERS ----

    let exec_params: BotExecParams = util::params::load(
        "bot_exec.toml"
    ).wrap_err("Could not load exec params")?;

    info!("Exec parameters loaded");

    // ---- INITIALISE DRIVE SCRIPT ----

    let mut script: Option<ScriptInterpreter<GamepadState>> = match opts.script {
        Some(ref path) => {
            info!("Loading drive script from {:?}", path);

            let si = ScriptInterpreter::new(path)
                .wrap_err("Failed to load drive script")?;

            info!(
                "Loaded script lasts {:.02} s and contains {} entries\n",
                si.get_duration(),
                si.get_num_cmds()
            );

            Some(si)
        },
        None => {
            info!(
                "No drive script provided, gamepad will stay centred for {:.1} s\n",
                opts.teleop_s
            );
            None
        }
    };

    // ---- INITIALISE MODULES ----

    info!("Initialising modules...");

    let mut drive_ctrl = DriveCtrl::default();
    drive_ctrl.init("drive_ctrl.toml", &session)
        .wrap_err("Failed to initialise DriveCtrl")?;
    info!("DriveCtrl init complete");

    let mut motion_ctrl = MotionCtrl::default();
    motion_ctrl.init("motion_ctrl.toml", &session)
        .wrap_err("Failed to initialise MotionCtrl")?;
    info!("MotionCtrl init complete");

    info!("Module initialisation complete\n");

    // ---- WIRE HARDWARE ----

    let plant = SimPlant::new(exec_params.sim.clone());
    let gamepad = ScriptedGamepad::new();

    let mut robot = Robot::new(
        Hardware {
            left_motors: Box::new(plant.motor_group(Side::Left)),
            right_motors: Box::new(plant.motor_group(Side::Right)),
            inertial: Box::new(plant.inertial()),
            chassis: Box::new(plant.chassis()),
            gamepad: Box::new(gamepad.clone()),
        },
        drive_ctrl,
        motion_ctrl
    );

    info!("Hardware wired to simulated drivetrain");

    // ---- CALIBRATION ----

    robot.calibrate(&exec_params.calib, |d| {
        thread::sleep(d);
        plant.step(std_duration_to_millis(d));
    }).wrap_err("Calibration failed")?;

    // ---- AUTONOMOUS ----

    let mut timer = CycleTimer::new(&exec_params);

    if opts.auto {
        info!("Begining autonomous routine ({} motions)\n", exec_params.auto_routine.len());

        for (i, motion) in exec_params.auto_routine.iter().enumerate() {
            let mut cmd = Some(*motion);

            loop {
                let dt_ms = timer.start();

                plant.step(dt_ms);
                let (_, report) = robot.motion_cycle(cmd.take(), dt_ms)
                    .wrap_err("Motion control failed")?;

                if let Err(e) = robot.motion_ctrl.write() {
                    warn!("Could not archive MotionCtrl: {}", e);
                }

                if let Some(outcome) = report.outcome {
                    info!("Motion {} finished: {:?}, pose {:?}", i, outcome, robot.pose());
                    break;
                }

                timer.wait()?;
            }
        }

        robot.stop();
        info!("Autonomous routine complete\n");
    }

    // ---- OPERATOR CONTROL ----

    info!("Begining operator control\n");

    let teleop_start = Instant::now();

    loop {
        let dt_ms = timer.start();
        let elapsed_s = teleop_start.elapsed().as_secs_f64();

        // ---- GAMEPAD INPUT ----

        match script {
            Some(ref mut si) => match si.get_pending(elapsed_s) {
                Pending::None => (),
                Pending::Some(states) => {
                    // Only the most recent state matters to the gamepad
                    if let Some(s) = states.last() {
                        debug!("Gamepad: {:?}", s);
                        gamepad.set(*s);
                    }
                },
                Pending::EndOfScript => {
                    info!("End of drive script reached");
                    break;
                }
            },
            None => if elapsed_s >= opts.teleop_s {
                break;
            }
        }

        // ---- PROCESSING ----

        plant.step(dt_ms);

        robot.teleop_cycle()
            .wrap_err("Drive control failed")?;

        if let Err(e) = robot.drive_ctrl.write() {
            warn!("Could not archive DriveCtrl: {}", e);
        }

        // ---- CYCLE MANAGEMENT ----

        timer.wait()?;
    }

    robot.stop();

    info!("Final pose: {:?}", robot.pose());
    info!("End of execution");

    Ok(())
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl CycleTimer {
    fn new(params: &BotExecParams) -> Self {
        Self {
            period: Duration::from_millis(params.cycle_period_ms),
            max_consec_overruns: params.max_consec_overruns,
            num_consec_overruns: 0,
            last_start: None,
            cycle_start: Instant::now(),
        }
    }

    /// Mark the start of a cycle, returning the time since the last one.
    ///
    /// The first cycle reports the nominal period.
    fn start(&mut self) -> f64 {
        let now = Instant::now();
        let dt = match self.last_start {
            Some(t) => now - t,
            None => self.period,
        };

        self.last_start = Some(now);
        self.cycle_start = now;

        std_duration_to_millis(dt)
    }

    /// Sleep until the end of the cycle period.
    fn wait(&mut self) -> Result<(), Report> {
        let cycle_dur = Instant::now() - self.cycle_start;

        match self.period.checked_sub(cycle_dur) {
            Some(d) => {
                self.num_consec_overruns = 0;
                thread::sleep(d);
            },
            None => {
                warn!(
                    "Cycle overran by {:.06} s",
                    (cycle_dur - self.period).as_secs_f64()
                );
                self.num_consec_overruns += 1;

                if self.num_consec_overruns > self.max_consec_overruns {
                    return Err(eyre!(
                        "{} consecutive cycle overruns", self.num_consec_overruns
                    ));
                }
            }
        }

        Ok(())
    }
}
