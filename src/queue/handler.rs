//! Consumption hooks
//!
//! A consumer is bound to exactly one hook set at construction: either an
//! object implementing [`ConsumerHandler`], or a [`Callbacks`] value holding
//! independent closures. The choice is captured once in [`Binding`] and is
//! never re-examined per item.

use crate::queue::consumer::ConsumerHandle;
use std::any::Any;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

/// Failure reported by a hook
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct HookError {
    message: String,
}

impl HookError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<std::io::Error> for HookError {
    fn from(err: std::io::Error) -> Self {
        Self::new(err.to_string())
    }
}

/// Result returned by every hook
pub type HookResult = Result<(), HookError>;

/// Event handler driven by a [`Consumer`](crate::queue::Consumer)
///
/// Only `on_consume` must be provided. `on_start` and `on_stop` succeed by
/// default.
///
/// # Example
///
/// ```rust
/// use consumer_pool::queue::{Consumer, ConsumerHandle, ConsumerHandler, HookResult};
/// use std::sync::atomic::{AtomicUsize, Ordering};
/// use std::sync::Arc;
///
/// struct Counter(AtomicUsize);
///
/// impl ConsumerHandler<u32> for Counter {
///     fn on_consume(&self, _consumer: &ConsumerHandle<u32>, item: &u32) -> HookResult {
///         self.0.fetch_add(*item as usize, Ordering::SeqCst);
///         Ok(())
///     }
/// }
///
/// let counter = Arc::new(Counter(AtomicUsize::new(0)));
/// let consumer = Consumer::with_handler(counter.clone());
/// consumer.start(2).unwrap();
/// consumer.commit(40).unwrap();
/// consumer.commit(2).unwrap();
/// consumer.stop(false).unwrap();
/// assert_eq!(counter.0.load(Ordering::SeqCst), 42);
/// ```
pub trait ConsumerHandler<T>: Send + Sync {
    /// Called on the thread calling `start`, before any worker exists.
    /// An error aborts the start and leaves the consumer stopped.
    fn on_start(&self, _consumer: &ConsumerHandle<T>) -> HookResult {
        Ok(())
    }

    /// Called on a worker thread for every dequeued item. May run
    /// concurrently on several workers.
    fn on_consume(&self, consumer: &ConsumerHandle<T>, item: &T) -> HookResult;

    /// Called on the thread calling `stop`, after every worker has joined.
    /// The result is reported back but never reverses the stop.
    fn on_stop(&self, _consumer: &ConsumerHandle<T>, _forced: bool) -> HookResult {
        Ok(())
    }
}

pub type StartFn<T> = dyn Fn(&ConsumerHandle<T>) -> HookResult + Send + Sync;
pub type ConsumeFn<T> = dyn Fn(&ConsumerHandle<T>, &T) -> HookResult + Send + Sync;
pub type StopFn<T> = dyn Fn(&ConsumerHandle<T>, bool) -> HookResult + Send + Sync;

/// Closure based hook set
///
/// The consume closure is required for a successful start; the start and stop
/// closures default to success.
pub struct Callbacks<T> {
    consume: Option<Box<ConsumeFn<T>>>,
    start: Option<Box<StartFn<T>>>,
    stop: Option<Box<StopFn<T>>>,
}

impl<T> Callbacks<T> {
    pub fn new() -> Self {
        Self {
            consume: None,
            start: None,
            stop: None,
        }
    }

    pub fn on_consume<F>(mut self, f: F) -> Self
    where
        F: Fn(&ConsumerHandle<T>, &T) -> HookResult + Send + Sync + 'static,
    {
        self.consume = Some(Box::new(f));
        self
    }

    pub fn on_start<F>(mut self, f: F) -> Self
    where
        F: Fn(&ConsumerHandle<T>) -> HookResult + Send + Sync + 'static,
    {
        self.start = Some(Box::new(f));
        self
    }

    pub fn on_stop<F>(mut self, f: F) -> Self
    where
        F: Fn(&ConsumerHandle<T>, bool) -> HookResult + Send + Sync + 'static,
    {
        self.stop = Some(Box::new(f));
        self
    }

    pub fn has_consume(&self) -> bool {
        self.consume.is_some()
    }
}

impl<T> Default for Callbacks<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for Callbacks<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Callbacks")
            .field("consume", &self.consume.is_some())
            .field("start", &self.start.is_some())
            .field("stop", &self.stop.is_some())
            .finish()
    }
}

/// The hook set a consumer dispatches to
pub enum Binding<T> {
    Handler(Arc<dyn ConsumerHandler<T>>),
    Callbacks(Callbacks<T>),
}

impl<T> Binding<T> {
    pub(crate) fn can_consume(&self) -> bool {
        match self {
            Binding::Handler(_) => true,
            Binding::Callbacks(callbacks) => callbacks.has_consume(),
        }
    }

    /// Run the start hook; a panic is reported as a hook failure
    pub(crate) fn start(&self, consumer: &ConsumerHandle<T>) -> HookResult {
        isolated("on_start", || match self {
            Binding::Handler(handler) => handler.on_start(consumer),
            Binding::Callbacks(callbacks) => match &callbacks.start {
                Some(f) => f(consumer),
                None => Ok(()),
            },
        })
    }

    pub(crate) fn consume(&self, consumer: &ConsumerHandle<T>, item: &T) -> HookResult {
        match self {
            Binding::Handler(handler) => handler.on_consume(consumer, item),
            Binding::Callbacks(callbacks) => match &callbacks.consume {
                Some(f) => f(consumer, item),
                None => Err(HookError::new("no consume hook bound")),
            },
        }
    }

    /// Run the stop hook; a panic is reported as a hook failure
    pub(crate) fn stop(&self, consumer: &ConsumerHandle<T>, forced: bool) -> HookResult {
        isolated("on_stop", || match self {
            Binding::Handler(handler) => handler.on_stop(consumer, forced),
            Binding::Callbacks(callbacks) => match &callbacks.stop {
                Some(f) => f(consumer, forced),
                None => Ok(()),
            },
        })
    }
}

// Start and stop hooks run under the lifecycle lock, which a panic would poison
fn isolated(hook: &str, f: impl FnOnce() -> HookResult) -> HookResult {
    panic::catch_unwind(AssertUnwindSafe(f)).unwrap_or_else(|payload| {
        Err(HookError::new(format!(
            "{} hook panicked: {}",
            hook,
            panic_message(payload.as_ref())
        )))
    })
}

pub(crate) fn panic_message<'a>(payload: &'a (dyn Any + Send + 'static)) -> &'a str {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message
    } else {
        "non-string panic payload"
    }
}

impl<T, H> From<Arc<H>> for Binding<T>
where
    H: ConsumerHandler<T> + 'static,
{
    fn from(handler: Arc<H>) -> Self {
        Binding::Handler(handler)
    }
}

impl<T> From<Callbacks<T>> for Binding<T> {
    fn from(callbacks: Callbacks<T>) -> Self {
        Binding::Callbacks(callbacks)
    }
}

impl<T> fmt::Debug for Binding<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Binding::Handler(_) => f.write_str("Binding::Handler"),
            Binding::Callbacks(callbacks) => {
                f.debug_tuple("Binding::Callbacks").field(callbacks).finish()
            }
        }
    }
}
