//! Generic error handling utilities
//!
//! Provides unified error reporting that works across the crate's error types
//! while keeping user-facing messages short.

use crate::queue::QueueError;

/// Trait for errors that can distinguish between user-actionable and system errors
///
/// When `is_user_actionable()` returns `true`, `user_message()` should return
/// `Some(message)` with a helpful, actionable message. When it returns
/// `false`, `user_message()` should return `None`.
pub trait ContextualError: std::error::Error {
    /// Returns true if this error contains a specific, user-actionable message
    /// that should be displayed directly to the user
    ///
    /// Examples of user-actionable errors:
    /// - Invalid worker counts
    /// - Missing or empty output paths
    /// - Configuration errors with clear fixes
    ///
    /// Examples of system errors:
    /// - IO failures
    /// - Thread spawn failures
    /// - Lock poisoning
    fn is_user_actionable(&self) -> bool;

    /// Returns the specific user message if this is a user-actionable error
    fn user_message(&self) -> Option<&str>;
}

impl ContextualError for QueueError {
    fn is_user_actionable(&self) -> bool {
        self.user_message().is_some()
    }

    fn user_message(&self) -> Option<&str> {
        match self {
            QueueError::ZeroWorkers => Some("At least one worker thread is required"),
            QueueError::MissingConsumeHook => Some("No consume hook was configured"),
            QueueError::NotRunning => Some("The consumer is not running"),
            _ => None,
        }
    }
}

/// Log errors with appropriate detail level based on error specificity
///
/// - User-actionable errors show their specific message
/// - System errors show the operation context, with details at debug level
///
/// # Examples
/// ```rust,no_run
/// use consumer_pool::core::error_handling::log_error_with_context;
/// use consumer_pool::queue::QueueError;
///
/// // User-actionable error shows specific message
/// log_error_with_context(&QueueError::ZeroWorkers, "Starting consumer");
/// // Logs: "FATAL: At least one worker thread is required"
///
/// // System error shows generic context with debug details
/// let poisoned = QueueError::Poisoned { message: "mutex poisoned".to_string() };
/// log_error_with_context(&poisoned, "Stopping consumer");
/// // Logs: "FATAL: Stopping consumer - mutex poisoned"
/// ```
pub fn log_error_with_context<E: ContextualError + std::fmt::Display + std::fmt::Debug>(
    error: &E,
    operation_context: &str,
) {
    if error.is_user_actionable() {
        if let Some(user_msg) = error.user_message() {
            log::error!("FATAL: {}", user_msg);
        } else {
            log::error!("FATAL: {}", operation_context);
        }
    } else {
        log::error!("FATAL: {} - {}", operation_context, error);
    }
    log::debug!("DETAIL: {}", error);
    log::debug!("DEBUG_DETAILS: {:?}", error);
}
