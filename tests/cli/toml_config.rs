//! Configuration file tests

use clap::Parser;
use consumer_pool::app::cli::{load_config, resolve, Args, ConfigError};
use consumer_pool::core::logging::LogFormat;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

fn write_config(dir: &TempDir, contents: &str) -> PathBuf {
    let path = dir.path().join("consumer-pool.toml");
    fs::write(&path, contents).unwrap();
    path
}

#[test]
fn test_config_file_values_applied() {
    let dir = TempDir::new().unwrap();
    let path = write_config(
        &dir,
        r#"
log-file = "from-config.log"
workers = 4
count = 40
log-level = "debug"
log-format = "ext"
"#,
    );

    let file = load_config(Some(&path)).unwrap();
    assert!(file.is_some());

    let args = Args::try_parse_from(["consumer-pool"]).unwrap();
    let settings = resolve(&args, file).unwrap();
    assert_eq!(settings.demo.output, PathBuf::from("from-config.log"));
    assert_eq!(settings.demo.workers, 4);
    assert_eq!(settings.demo.count, 40);
    assert_eq!(settings.log_level, "debug");
    assert_eq!(settings.log_format, LogFormat::Ext);
}

#[test]
fn test_command_line_overrides_config_file() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "workers = 4\nforce = false\nlog-format = \"json\"\n");

    let args = Args::try_parse_from([
        "consumer-pool",
        "--workers",
        "2",
        "--force",
        "--log-format",
        "text",
    ])
    .unwrap();
    let settings = resolve(&args, load_config(Some(&path)).unwrap()).unwrap();
    assert_eq!(settings.demo.workers, 2);
    assert!(settings.demo.forced);
    assert_eq!(settings.log_format, LogFormat::Text);
}

#[test]
fn test_malformed_config_reported() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "workers = \"four\"\n");
    assert!(matches!(
        load_config(Some(&path)),
        Err(ConfigError::Parse { .. })
    ));
}

#[test]
fn test_missing_config_file_reported() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("absent.toml");
    let err = load_config(Some(&missing)).unwrap_err();
    assert!(matches!(err, ConfigError::NotFound { .. }));
    assert!(err.to_string().contains("absent.toml"));
}
