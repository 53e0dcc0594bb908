//! Queue Error Types

use crate::queue::handler::HookError;

#[derive(Debug, thiserror::Error)]
pub enum QueueError {
    #[error("Cannot start with zero workers")]
    ZeroWorkers,

    #[error("No consume hook bound to the consumer")]
    MissingConsumeHook,

    #[error("Start hook rejected the start: {source}")]
    StartHookFailed {
        #[source]
        source: HookError,
    },

    #[error("Failed to spawn worker thread {index}: {source}")]
    SpawnFailed {
        index: usize,
        #[source]
        source: std::io::Error,
    },

    #[error("Consumer is not running")]
    NotRunning,

    #[error("Stop hook reported a failure (forced: {forced}): {source}")]
    StopHookFailed {
        forced: bool,
        #[source]
        source: HookError,
    },

    #[error("{message}")]
    Poisoned { message: String },
}

impl QueueError {
    /// True for the errors that leave a stopped instance stopped after `start`
    pub fn is_start_rejection(&self) -> bool {
        matches!(
            self,
            QueueError::ZeroWorkers
                | QueueError::MissingConsumeHook
                | QueueError::StartHookFailed { .. }
                | QueueError::SpawnFailed { .. }
        )
    }
}

/// Result type for queue operations
pub type QueueResult<T> = Result<T, QueueError>;
