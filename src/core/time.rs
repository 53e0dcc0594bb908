//! Time provider abstraction for testable time-dependent logic

#[cfg(test)]
use std::sync::{Arc, Mutex};
#[cfg(test)]
use std::time::Duration;
use std::time::SystemTime;

use chrono::{DateTime, Local};

/// Default layout for wall-clock timestamps written by the demo logger
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Abstraction over system time for testable timestamps
pub trait TimeProvider: Send + Sync {
    /// Get the current system time (for timestamps)
    fn system_time(&self) -> SystemTime;
}

/// Production time provider using actual system time
#[derive(Debug, Default, Clone)]
pub struct SystemTimeProvider;

impl TimeProvider for SystemTimeProvider {
    fn system_time(&self) -> SystemTime {
        SystemTime::now()
    }
}

/// Format a timestamp in local time using a chrono format string
pub fn format_local(time: SystemTime, format: &str) -> String {
    DateTime::<Local>::from(time).format(format).to_string()
}

/// Mock time provider for deterministic testing
#[derive(Clone)]
#[cfg(test)]
pub struct MockTimeProvider {
    current_system_time: Arc<Mutex<SystemTime>>,
}

#[cfg(test)]
impl MockTimeProvider {
    /// Create a new mock time provider starting at the given time
    pub fn new(start: SystemTime) -> Self {
        Self {
            current_system_time: Arc::new(Mutex::new(start)),
        }
    }

    pub fn advance_time(&self, duration: Duration) {
        let mut system_time = self.current_system_time.lock().unwrap();
        *system_time += duration;
    }

    pub fn set_system_time(&self, system_time: SystemTime) {
        let mut current = self.current_system_time.lock().unwrap();
        *current = system_time;
    }
}

#[cfg(test)]
impl TimeProvider for MockTimeProvider {
    fn system_time(&self) -> SystemTime {
        *self.current_system_time.lock().unwrap()
    }
}
