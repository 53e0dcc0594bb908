//! Application logging around a demo run
//!
//! The global logger can only be installed once per process, so every test
//! touching it runs serially.

use consumer_pool::app::demo::{self, DemoSettings};
use consumer_pool::core::logging::{init_logging, set_log_level, LogFormat};
use serial_test::serial;
use std::fs;
use std::sync::OnceLock;
use tempfile::TempDir;

static APP_LOG_DIR: OnceLock<TempDir> = OnceLock::new();

fn app_log_dir() -> &'static TempDir {
    APP_LOG_DIR.get_or_init(|| {
        let dir = TempDir::new().unwrap();
        let app_log = dir.path().join("app.log");
        init_logging(Some("debug"), LogFormat::Json, Some(&app_log), false)
            .expect("logger initialises once");
        dir
    })
}

#[test]
#[serial]
fn test_demo_run_with_application_logging() {
    let log_dir = app_log_dir();
    let out_dir = TempDir::new().unwrap();
    let settings = DemoSettings {
        output: out_dir.path().join("demo.log"),
        workers: 2,
        count: 20,
        forced: false,
    };

    let report = demo::run(&settings).unwrap();
    assert_eq!(report.accepted, 20);
    assert_eq!(fs::read_to_string(&settings.output).unwrap().lines().count(), 20);

    log::logger().flush();
    let app_logs: Vec<_> = fs::read_dir(log_dir.path()).unwrap().collect();
    assert!(!app_logs.is_empty(), "application log file should exist");
}

#[test]
#[serial]
fn test_log_level_changes_at_runtime() {
    app_log_dir();
    set_log_level("warn").unwrap();
    log::debug!("suppressed at warn");
    set_log_level("debug").unwrap();
    log::debug!("visible again");
}
