//! Worker-Pool Consumer
//!
//! A reusable single-queue, multi-worker consumption component with a
//! controlled start/stop lifecycle and pluggable consumption hooks.
//!
//! # Overview
//!
//! - **Any number of producers**: [`Consumer::commit`] and
//!   [`ConsumerHandle::commit`] may be called from any thread
//! - **Fixed worker pool**: `start(n)` spawns `n` OS threads sharing one
//!   unbounded FIFO queue
//! - **Pluggable hooks**: a [`ConsumerHandler`] object or a [`Callbacks`]
//!   closure set, chosen once at construction
//! - **Two shutdown flavours**: graceful (drain the queue first) or forced
//!   (discard the backlog)
//! - **Observability**: an optional [`EventSink`] sees worker start, every
//!   consume result, worker exit, and stop
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐     ┌──────────────┐     ┌──────────────┐
//! │  Producer A  │     │  Producer B  │     │  Producer C  │
//! └──────┬───────┘     └──────┬───────┘     └──────┬───────┘
//!        │ commit             │ commit             │ commit
//!        ▼                    ▼                    ▼
//! ┌─────────────────────────────────────────────────────────┐
//! │                      Consumer<T>                        │
//! │  lifecycle lock: start / stop / worker handles          │
//! │  data lock:  ┌───┬───┬───┬───┬───┐  stopped, forced     │
//! │              │ 1 │ 2 │ 3 │ 4 │...│                      │
//! │              └───┴───┴───┴───┴───┘                      │
//! └─────────┬────────────────┬────────────────┬─────────────┘
//!           │ pop_front      │ pop_front      │ pop_front
//!     ┌─────┴─────┐    ┌─────┴─────┐    ┌─────┴─────┐
//!     │ worker-0  │    │ worker-1  │    │ worker-2  │ ──► on_consume
//!     └───────────┘    └───────────┘    └───────────┘
//! ```
//!
//! # Example Usage
//!
//! ```rust
//! use consumer_pool::queue::{Callbacks, Consumer, QueueError};
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use std::sync::Arc;
//!
//! let consumed = Arc::new(AtomicUsize::new(0));
//! let counter = Arc::clone(&consumed);
//! let consumer = Consumer::with_callbacks(Callbacks::new().on_consume(move |_, _: &u64| {
//!     counter.fetch_add(1, Ordering::SeqCst);
//!     Ok(())
//! }));
//!
//! // Nothing is accepted before start
//! assert!(matches!(consumer.commit(0), Err(QueueError::NotRunning)));
//!
//! consumer.start(4).unwrap();
//! for i in 0..100 {
//!     consumer.commit(i).unwrap();
//! }
//!
//! // Graceful stop drains everything already queued
//! consumer.stop(false).unwrap();
//! assert_eq!(consumed.load(Ordering::SeqCst), 100);
//! ```

pub mod api;
mod consumer;
mod error;
mod events;
mod handler;
mod worker;

pub use consumer::{recommended_max_workers, Consumer, ConsumerBuilder, ConsumerHandle};
pub use error::{QueueError, QueueResult};
pub use events::{
    ConsumerEvent, ConsumerEventType, EventSink, LogEventSink, NoopEventSink, WorkerExit,
};
pub use handler::{Binding, Callbacks, ConsumerHandler, HookError, HookResult};

#[cfg(test)]
mod tests;
