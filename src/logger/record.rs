//! Log record carried through the consumer queue

use crate::core::time::format_local;
use std::time::SystemTime;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRecord {
    pub timestamp: SystemTime,
    pub text: String,
}

impl LogRecord {
    pub fn new(timestamp: SystemTime, text: impl Into<String>) -> Self {
        Self {
            timestamp,
            text: text.into(),
        }
    }

    /// Render as `<local timestamp>\t<text>`, without a trailing newline
    pub fn to_line(&self, timestamp_format: &str) -> String {
        format!(
            "{}\t{}",
            format_local(self.timestamp, timestamp_format),
            self.text
        )
    }
}
