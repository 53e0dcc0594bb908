//! Asynchronous file logger built on a single [`Consumer`]
//!
//! [`SimpleLogger`] is a thin façade: callers format and timestamp a line,
//! the consumer queues it, and a [`FileSink`] worker appends it to the target
//! file. The façade owns no threads or locks of its own.
//!
//! ```rust,no_run
//! use consumer_pool::log_line;
//! use consumer_pool::logger::SimpleLogger;
//!
//! let logger = SimpleLogger::new();
//! logger.start("app.log")?;
//! log_line!(logger, "New log entry: {}.", 1)?;
//! logger.stop(false)?;
//! # Ok::<(), consumer_pool::logger::LoggerError>(())
//! ```

mod record;
mod sink;

pub use record::LogRecord;
pub use sink::FileSink;

use crate::core::error_handling::ContextualError;
use crate::core::time::{SystemTimeProvider, TimeProvider};
use crate::queue::api::{Consumer, EventSink, QueueError};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    #[error("log file path is empty")]
    EmptyPath,

    #[error("log message is empty")]
    EmptyMessage,

    #[error(transparent)]
    Queue(#[from] QueueError),
}

impl ContextualError for LoggerError {
    fn is_user_actionable(&self) -> bool {
        match self {
            LoggerError::EmptyPath | LoggerError::EmptyMessage => true,
            LoggerError::Queue(e) => e.is_user_actionable(),
        }
    }

    fn user_message(&self) -> Option<&str> {
        match self {
            LoggerError::EmptyPath => Some("An output log file path is required"),
            LoggerError::EmptyMessage => Some("Log messages must not be empty"),
            LoggerError::Queue(e) => e.user_message(),
        }
    }
}

pub type LoggerResult<T> = Result<T, LoggerError>;

/// Queue-backed logger writing timestamped lines to one file
pub struct SimpleLogger {
    sink: Arc<FileSink>,
    consumer: Consumer<LogRecord>,
    clock: Arc<dyn TimeProvider>,
    workers: usize,
}

impl SimpleLogger {
    /// One worker, wall-clock timestamps
    pub fn new() -> Self {
        Self::build(FileSink::new(), Arc::new(SystemTimeProvider), None)
    }

    pub fn with_time_provider(clock: Arc<dyn TimeProvider>) -> Self {
        Self::build(FileSink::new(), clock, None)
    }

    pub fn with_event_sink(events: Arc<dyn EventSink>) -> Self {
        Self::build(FileSink::new(), Arc::new(SystemTimeProvider), Some(events))
    }

    fn build(
        sink: FileSink,
        clock: Arc<dyn TimeProvider>,
        events: Option<Arc<dyn EventSink>>,
    ) -> Self {
        let sink = Arc::new(sink);
        let mut builder = Consumer::builder(sink.clone()).name("logger");
        if let Some(events) = events {
            builder = builder.event_sink(events);
        }
        Self {
            sink,
            consumer: builder.build(),
            clock,
            workers: 1,
        }
    }

    /// Number of writer threads used by subsequent starts
    ///
    /// More than one worker keeps every line intact but no longer preserves
    /// commit order in the file.
    pub fn workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    /// Open `path` for appending and start the writer
    ///
    /// Starting an already running logger is a no-op and keeps the current
    /// destination.
    pub fn start(&self, path: impl AsRef<Path>) -> LoggerResult<()> {
        let path = path.as_ref();
        if path.as_os_str().is_empty() {
            return Err(LoggerError::EmptyPath);
        }
        if self.consumer.has_started() {
            log::debug!("logger already writing to {:?}", self.sink.path());
            return Ok(());
        }

        self.sink.set_path(path)?;
        self.consumer.start(self.workers).map_err(|e| {
            if e.is_start_rejection() {
                log::warn!("log file {} not opened: {}", path.display(), e);
            }
            LoggerError::from(e)
        })
    }

    /// Stop writing; a graceful stop flushes every queued line first
    pub fn stop(&self, forced: bool) -> LoggerResult<()> {
        self.consumer.stop(forced)?;
        Ok(())
    }

    /// Queue one formatted line
    ///
    /// The timestamp is taken here, on the caller's thread.
    pub fn commit(&self, args: fmt::Arguments<'_>) -> LoggerResult<()> {
        let text = match args.as_str() {
            Some(s) => s.to_string(),
            None => args.to_string(),
        };
        if text.is_empty() {
            return Err(LoggerError::EmptyMessage);
        }

        let record = LogRecord::new(self.clock.system_time(), text);
        self.consumer.commit(record)?;
        Ok(())
    }

    pub fn has_started(&self) -> bool {
        self.consumer.has_started()
    }

    pub fn path(&self) -> Option<PathBuf> {
        self.sink.path()
    }

    pub fn pending(&self) -> usize {
        self.consumer.pending()
    }
}

impl Default for SimpleLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for SimpleLogger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SimpleLogger")
            .field("path", &self.sink.path())
            .field("started", &self.has_started())
            .field("workers", &self.workers)
            .finish()
    }
}

/// Format and commit a line to a [`SimpleLogger`]
///
/// Expands to `logger.commit(format_args!(...))` and yields its result.
#[macro_export]
macro_rules! log_line {
    ($logger:expr, $($arg:tt)+) => {
        $logger.commit(::std::format_args!($($arg)+))
    };
}
