//! File destination bound to the logger's consumer

use super::record::LogRecord;
use crate::core::sync::handle_rwlock_write;
use crate::core::time::TIMESTAMP_FORMAT;
use crate::queue::api::{
    ConsumerHandle, ConsumerHandler, HookError, HookResult, QueueError, QueueResult,
};
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, RwLock};

/// Appends one line per record to a file
///
/// The file is opened in append mode when the consumer starts and closed when
/// it stops. Writes are serialized by the writer lock, so several workers may
/// share one sink.
pub struct FileSink {
    path: RwLock<Option<PathBuf>>,
    writer: Mutex<Option<BufWriter<File>>>,
    timestamp_format: String,
}

impl FileSink {
    pub fn new() -> Self {
        Self::with_timestamp_format(TIMESTAMP_FORMAT)
    }

    pub fn with_timestamp_format(format: impl Into<String>) -> Self {
        Self {
            path: RwLock::new(None),
            writer: Mutex::new(None),
            timestamp_format: format.into(),
        }
    }

    /// Destination used by the next start
    pub fn set_path(&self, path: &Path) -> QueueResult<()> {
        let mut slot = handle_rwlock_write(self.path.write(), |message| {
            QueueError::Poisoned { message }
        })?;
        *slot = Some(path.to_path_buf());
        Ok(())
    }

    pub fn path(&self) -> Option<PathBuf> {
        self.path.read().ok().and_then(|slot| slot.clone())
    }

    pub fn is_open(&self) -> bool {
        self.writer.lock().map(|w| w.is_some()).unwrap_or(false)
    }

    fn lock_writer(&self) -> Result<std::sync::MutexGuard<'_, Option<BufWriter<File>>>, HookError> {
        self.writer
            .lock()
            .map_err(|e| HookError::new(format!("log writer lock poisoned: {}", e)))
    }
}

impl Default for FileSink {
    fn default() -> Self {
        Self::new()
    }
}

impl ConsumerHandler<LogRecord> for FileSink {
    fn on_start(&self, _consumer: &ConsumerHandle<LogRecord>) -> HookResult {
        let path = self
            .path()
            .filter(|p| !p.as_os_str().is_empty())
            .ok_or_else(|| HookError::new("no log file path set"))?;

        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        *self.lock_writer()? = Some(BufWriter::new(file));
        log::debug!("opened log file {}", path.display());
        Ok(())
    }

    fn on_consume(&self, _consumer: &ConsumerHandle<LogRecord>, record: &LogRecord) -> HookResult {
        let mut guard = self.lock_writer()?;
        let writer = guard
            .as_mut()
            .ok_or_else(|| HookError::new("log file is not open"))?;
        writeln!(writer, "{}", record.to_line(&self.timestamp_format))?;
        writer.flush()?;
        Ok(())
    }

    fn on_stop(&self, _consumer: &ConsumerHandle<LogRecord>, forced: bool) -> HookResult {
        if let Some(mut writer) = self.lock_writer()?.take() {
            writer.flush()?;
            log::debug!("closed log file (forced: {})", forced);
        }
        Ok(())
    }
}
