use super::*;
use log::{Level, Metadata, Record};
use serial_test::serial;
use std::fs;

#[test]
#[serial]
fn get_level_from_env_parses_cases() {
    let cases: &[(Option<&str>, Level)] = &[
        (None, Level::Warn),
        (Some("debug"), Level::Debug),
        (Some("INFO"), Level::Info),
        (Some("error"), Level::Error),
        (Some("trace"), Level::Trace),
        (Some("garbage"), Level::Warn),
        (Some("off"), Level::Warn),
    ];

    for (value, expected) in cases {
        match value {
            Some(v) => unsafe { std::env::set_var(PROGRAM_LOG_LEVEL, v) },
            None => unsafe { std::env::remove_var(PROGRAM_LOG_LEVEL) },
        }

        let lvl = get_level_from_env();
        assert_eq!(
            lvl, *expected,
            "env {:?} should yield level {:?}, got {:?}",
            value, expected, lvl
        );
    }

    unsafe { std::env::remove_var(PROGRAM_LOG_LEVEL) };
}

#[test]
fn enabled_respects_level_threshold() {
    let levels = [
        Level::Error,
        Level::Warn,
        Level::Info,
        Level::Debug,
        Level::Trace,
    ];

    for logger_level in levels {
        let logger = Logger {
            level: logger_level,
            target: LogTarget::Stderr,
        };

        for record_level in levels {
            let meta = Metadata::builder()
                .level(record_level)
                .target("test_target")
                .build();

            assert_eq!(
                logger.enabled(&meta),
                record_level <= logger_level,
                "logger level {:?}, record level {:?}",
                logger_level,
                record_level
            );
        }
    }
}

#[test]
fn file_logger_appends_formatted_lines() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = dir.path().join("daemon.log");
    let file = fs::File::create(&path).expect("create log file");

    let logger = Logger {
        level: Level::Info,
        target: LogTarget::File(Mutex::new(file)),
    };

    let cases = [
        (Level::Info, "rendered generation 3"),
        (Level::Debug, "filtered out"),
        (Level::Error, "stat failed"),
    ];

    for (lvl, msg) in &cases {
        let args = format_args!("{msg}");
        let record = Record::builder()
            .level(*lvl)
            .target("session")
            .args(args)
            .build();
        logger.log(&record);
    }
    logger.flush();

    let contents = fs::read_to_string(&path).expect("read log file");
    let lines: Vec<&str> = contents.lines().collect();

    assert_eq!(lines.len(), 2, "debug record should be filtered: {contents}");
    assert!(lines[0].ends_with("INFO [session] rendered generation 3"));
    assert!(lines[1].ends_with("ERROR [session] stat failed"));
}

#[test]
#[serial]
fn init_with_file_creates_the_log_directory() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = dir.path().join("logs").join("daemon.log");

    init_with_file(&path).expect("install file logger");
    assert!(path.exists());

    // A second install is a no-op.
    init_with_file(&path).expect("second install");
}
