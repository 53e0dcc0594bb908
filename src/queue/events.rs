//! Observability events for the worker pool
//!
//! A consumer reports what its workers are doing to an [`EventSink`]. The
//! default sink discards everything, and no sink can influence control flow.

use std::time::SystemTime;

/// Why a worker left its loop
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WorkerExit {
    /// Stop requested and the queue was empty
    Drained,
    /// Forced stop observed, remaining items left for discard
    Forced,
    /// The data lock was poisoned
    Poisoned,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConsumerEventType {
    Started { workers: usize },
    WorkerStarted { worker: usize },
    Consumed { worker: usize, ok: bool },
    WorkerExited { worker: usize, reason: WorkerExit },
    Stopped { forced: bool, discarded: usize },
}

#[derive(Clone, Debug)]
pub struct ConsumerEvent {
    pub event_type: ConsumerEventType,
    pub timestamp: SystemTime,
    pub consumer: String,
}

impl ConsumerEvent {
    pub fn new(event_type: ConsumerEventType, consumer: impl Into<String>) -> Self {
        Self {
            event_type,
            timestamp: SystemTime::now(),
            consumer: consumer.into(),
        }
    }
}

/// Receiver for [`ConsumerEvent`]s
///
/// Called synchronously from worker threads and from `start`/`stop`, so
/// implementations must be cheap and must not call back into the consumer's
/// lifecycle.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: &ConsumerEvent);
}

/// Sink that drops every event
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopEventSink;

impl EventSink for NoopEventSink {
    fn emit(&self, _event: &ConsumerEvent) {}
}

/// Sink that forwards events to the `log` facade at debug level
#[derive(Debug, Default, Clone, Copy)]
pub struct LogEventSink;

impl EventSink for LogEventSink {
    fn emit(&self, event: &ConsumerEvent) {
        let name = &event.consumer;
        match &event.event_type {
            ConsumerEventType::Started { workers } => {
                log::debug!("[{}] started with {} worker(s)", name, workers)
            }
            ConsumerEventType::WorkerStarted { worker } => {
                log::debug!("[{}] worker {} started", name, worker)
            }
            ConsumerEventType::Consumed { worker, ok } => {
                log::debug!("[{}] worker {} consumed an item, ok={}", name, worker, ok)
            }
            ConsumerEventType::WorkerExited { worker, reason } => {
                log::debug!("[{}] worker {} exited ({:?})", name, worker, reason)
            }
            ConsumerEventType::Stopped { forced, discarded } => log::debug!(
                "[{}] stopped, forced={} discarded={}",
                name,
                forced,
                discarded
            ),
        }
    }
}
