//! Run the modules inside a real session, loading the shipped parameter
//! files and archiving each cycle.
//!
//! The session epoch and logger are process wide, so everything lives in a
//! single test.

use std::fs;

use bot_lib::{
    chassis::Pose,
    drive_ctrl::{self, DriveCtrl},
    motion_ctrl::{self, Motion, MotionCtrl},
};
use util::{
    archive::Archived,
    host::SW_ROOT_ENV_VAR,
    logger::{logger_init, LevelFilter},
    module::State,
    session::{self, Session},
};

/// Split an archive into its header and rows of fields.
fn read_archive(path: std::path::PathBuf) -> (Vec<String>, Vec<Vec<String>>) {
    let contents = fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Cannot read {:?}: {}", path, e));
    let mut lines = contents.lines()
        .map(|l| l.split(',').map(String::from).collect::<Vec<_>>());

    let header = lines.next().expect("archive has no header");
    (header, lines.collect())
}

#[test]
fn test_session_modules_archive_each_cycle() {
    std::env::set_var(SW_ROOT_ENV_VAR, concat!(env!("CARGO_MANIFEST_DIR"), "/.."));

    let mut sessions_root = std::env::temp_dir();
    sessions_root.push(format!("drivebot_sessions_{}", std::process::id()));

    let session = Session::new_in("bot_exec_test", sessions_root.clone()).unwrap();
    assert!(session.session_root.starts_with(&sessions_root));
    assert!(session.arch_root.is_dir());
    assert!(session::get_epoch().is_ok());
    assert!(session::get_elapsed_seconds() >= 0.0);

    // A second session in the same process would share the epoch
    assert!(Session::new_in("bot_exec_test", sessions_root.clone()).is_err());

    logger_init(LevelFilter::Debug, &session).unwrap();
    assert!(session.log_file_path.is_file());

    // ---- DRIVE CONTROL ----

    let mut dc = DriveCtrl::default();
    dc.init("drive_ctrl.toml", &session).unwrap();
    assert!(dc.is_archiving());

    let inputs = [
        drive_ctrl::InputData { forward: 100, turn: 0 },
        drive_ctrl::InputData { forward: 3, turn: 0 },
        drive_ctrl::InputData { forward: 100, turn: 60 },
    ];
    for input in inputs.iter() {
        dc.proc(input).unwrap();
        dc.write().unwrap();
    }

    let (header, rows) = read_archive(session.arch_root.join("drive_ctrl/output.csv"));
    assert_eq!(header, vec!["forward", "turn", "left", "right", "left_limited", "right_limited"]);
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0], vec!["100", "0", "100", "100", "false", "false"]);
    // Inside the deadband of 5 from drive_ctrl.toml
    assert_eq!(rows[1], vec!["3", "0", "0", "0", "false", "false"]);
    assert_eq!(rows[2], vec!["100", "60", "127", "40", "true", "false"]);

    // ---- MOTION CONTROL ----

    let mut mc = MotionCtrl::default();
    mc.init("motion_ctrl.toml", &session).unwrap();

    let mut cmd = Some(Motion::Drive { distance_in: 24.0, timeout_ms: 3000.0 });
    for _ in 0..3 {
        mc.proc(&motion_ctrl::InputData { cmd: cmd.take(), pose: Pose::default(), dt_ms: 20.0 })
            .unwrap();
        mc.write().unwrap();
    }
    mc.abort();
    mc.proc(&motion_ctrl::InputData { cmd: None, pose: Pose::default(), dt_ms: 20.0 }).unwrap();
    mc.write().unwrap();

    let (header, rows) = read_archive(session.arch_root.join("motion_ctrl/status.csv"));
    assert_eq!(header, vec![
        "mode", "elapsed_ms", "error", "lin_target", "ang_target", "lin_output",
        "ang_output", "left", "right", "settled", "timed_out",
    ]);
    assert_eq!(rows.len(), 4);

    // First tick of the drive is bounded by the slew limit of 5 per ms
    assert_eq!(rows[0][0], "Driving");
    assert_eq!(rows[0][3].parse::<f64>().unwrap(), 24.0);
    assert_eq!(rows[0][5].parse::<f64>().unwrap(), 100.0);
    assert_eq!(rows[0][7..9].to_vec(), vec!["100", "100"]);
    assert_eq!(rows[2][1].parse::<f64>().unwrap(), 60.0);

    // Aborted, so idle and silent
    assert_eq!(rows[3][0], "Idle");
    assert_eq!(rows[3][7..].to_vec(), vec!["0", "0", "false", "false"]);

    fs::remove_dir_all(&sessions_root).ok();
}
