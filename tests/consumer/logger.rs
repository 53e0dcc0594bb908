//! File logger built on a consumer

use consumer_pool::app::demo::{self, entry_text, DemoSettings};
use consumer_pool::log_line;
use consumer_pool::logger::{LoggerError, SimpleLogger};
use consumer_pool::queue::QueueError;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::thread;
use tempfile::TempDir;

fn texts(path: &Path) -> Vec<String> {
    fs::read_to_string(path)
        .unwrap()
        .lines()
        .map(|l| l.split_once('\t').expect("tab separated").1.to_string())
        .collect()
}

#[test]
fn test_demo_lines_in_order() {
    let dir = TempDir::new().unwrap();
    let settings = DemoSettings {
        output: dir.path().join("test.log"),
        ..DemoSettings::default()
    };

    let report = demo::run(&settings).unwrap();
    assert_eq!(report.accepted, 10);

    let expected: Vec<String> = (1..=10).map(entry_text).collect();
    assert_eq!(texts(&settings.output), expected);
    assert_eq!(expected[0], "New log entry: 1.");
}

#[test]
fn test_timestamp_layout() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("stamp.log");
    let logger = SimpleLogger::new();

    logger.start(&path).unwrap();
    log_line!(logger, "checking {}", "layout").unwrap();
    logger.stop(false).unwrap();

    let content = fs::read_to_string(&path).unwrap();
    let line = content.lines().next().unwrap();
    let (stamp, text) = line.split_once('\t').unwrap();
    assert_eq!(text, "checking layout");
    assert!(
        chrono::NaiveDateTime::parse_from_str(stamp, "%Y-%m-%d %H:%M:%S").is_ok(),
        "unexpected timestamp {:?}",
        stamp
    );
}

#[test]
fn test_concurrent_writers_share_logger() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("shared.log");
    let logger = Arc::new(SimpleLogger::new());
    logger.start(&path).unwrap();

    let writers: Vec<_> = (0..4)
        .map(|w| {
            let logger = logger.clone();
            thread::spawn(move || {
                for n in 0..25 {
                    log_line!(logger, "writer {} line {}", w, n).unwrap();
                }
            })
        })
        .collect();
    for writer in writers {
        writer.join().unwrap();
    }
    logger.stop(false).unwrap();

    let lines = texts(&path);
    assert_eq!(lines.len(), 100);
    // One worker keeps each writer's own lines in order
    for w in 0..4 {
        let prefix = format!("writer {} ", w);
        let own: Vec<&String> = lines.iter().filter(|l| l.starts_with(&prefix)).collect();
        let expected: Vec<String> = (0..25).map(|n| format!("writer {} line {}", w, n)).collect();
        assert_eq!(own, expected.iter().collect::<Vec<_>>());
    }
}

#[test]
fn test_errors_surface_through_logger() {
    let logger = SimpleLogger::new();
    assert!(matches!(logger.start(""), Err(LoggerError::EmptyPath)));
    assert!(matches!(
        log_line!(logger, "nobody listening"),
        Err(LoggerError::Queue(QueueError::NotRunning))
    ));
    // Stopping a logger that never started is a no-op
    logger.stop(false).unwrap();
}
