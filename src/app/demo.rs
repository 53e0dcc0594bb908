//! Logger demo: commit numbered lines, then shut down

use crate::log_line;
use crate::logger::{LoggerResult, SimpleLogger};
use crate::queue::api::LogEventSink;
use std::path::PathBuf;
use std::sync::Arc;

pub const DEFAULT_OUTPUT: &str = "test.log";
pub const DEFAULT_WORKERS: usize = 1;
pub const DEFAULT_COUNT: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DemoSettings {
    pub output: PathBuf,
    pub workers: usize,
    pub count: usize,
    pub forced: bool,
}

impl Default for DemoSettings {
    fn default() -> Self {
        Self {
            output: PathBuf::from(DEFAULT_OUTPUT),
            workers: DEFAULT_WORKERS,
            count: DEFAULT_COUNT,
            forced: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DemoReport {
    pub accepted: usize,
    pub rejected: usize,
}

/// Line text for entry `n`
pub fn entry_text(n: usize) -> String {
    format!("New log entry: {}.", n)
}

pub fn run(settings: &DemoSettings) -> LoggerResult<DemoReport> {
    let logger =
        SimpleLogger::with_event_sink(Arc::new(LogEventSink)).workers(settings.workers);
    logger.start(&settings.output)?;
    log::info!(
        "writing {} line(s) to {} with {} worker(s)",
        settings.count,
        settings.output.display(),
        settings.workers
    );

    let mut report = DemoReport::default();
    for n in 1..=settings.count {
        match log_line!(logger, "{}", entry_text(n)) {
            Ok(()) => report.accepted += 1,
            Err(e) => {
                log::warn!("line {} rejected: {}", n, e);
                report.rejected += 1;
            }
        }
    }

    if settings.forced {
        log::info!("forcing shutdown with {} line(s) pending", logger.pending());
    }
    logger.stop(settings.forced)?;
    Ok(report)
}
